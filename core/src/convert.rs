//! Text conversion for argument destinations.
//!
//! A [`Converter`] turns a command-line token into a destination value and
//! back, and may expose a closed set of legal inputs through
//! [`default_choices`](Converter::default_choices). [`DefaultConverter`]
//! covers the primitive types; callers implement [`Converter`] themselves
//! for restricted vocabularies.
//!
//! # Examples
//!
//! ```
//! use argbind_core::{ConversionError, Converter};
//!
//! struct OnOff;
//!
//! impl Converter<bool> for OnOff {
//!     fn from_str(&self, text: &str) -> Result<bool, ConversionError> {
//!         match text {
//!             "on" => Ok(true),
//!             "off" => Ok(false),
//!             other => Err(ConversionError::new(format!("expected 'on' or 'off', got '{other}'"))),
//!         }
//!     }
//!
//!     fn to_str(&self, value: &bool) -> String {
//!         if *value { "on".into() } else { "off".into() }
//!     }
//!
//!     fn default_choices(&self) -> Vec<String> {
//!         vec!["on".into(), "off".into()]
//!     }
//! }
//!
//! assert_eq!(OnOff.from_str("on"), Ok(true));
//! assert!(OnOff.from_str("yes").is_err());
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// A token could not be converted into the destination type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// `text` is not a well-formed value of `type_name`.
    pub fn invalid_value(text: &str, type_name: &str) -> Self {
        Self::new(format!("invalid {type_name} value '{text}'"))
    }

    /// `text` converted fine but is not one of `choices`.
    pub fn invalid_choice(text: &str, choices: &[String]) -> Self {
        Self::new(format!(
            "invalid choice '{text}' (choose from {})",
            choices.join(", ")
        ))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Bidirectional text conversion for one destination type.
pub trait Converter<T> {
    /// Converts a whole token. Trailing garbage or a partial parse is an error.
    fn from_str(&self, text: &str) -> Result<T, ConversionError>;

    /// Canonical textual form of `value`.
    fn to_str(&self, value: &T) -> String;

    /// Legal inputs, used as the argument's choices when none are set
    /// explicitly. Empty means unrestricted.
    fn default_choices(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Converter for the built-in destination types.
///
/// * numbers must consume the entire token;
/// * `bool` accepts `0`, `false`, `1`, `true` in any case;
/// * `String` and `PathBuf` pass the token through, empty included;
/// * `char` requires exactly one character.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConverter;

macro_rules! numeric_converter {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Converter<$ty> for DefaultConverter {
                fn from_str(&self, text: &str) -> Result<$ty, ConversionError> {
                    text.parse::<$ty>()
                        .map_err(|_| ConversionError::invalid_value(text, stringify!($ty)))
                }

                fn to_str(&self, value: &$ty) -> String {
                    value.to_string()
                }
            }
        )*
    };
}

numeric_converter!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl Converter<bool> for DefaultConverter {
    fn from_str(&self, text: &str) -> Result<bool, ConversionError> {
        match text.to_ascii_lowercase().as_str() {
            "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            _ => Err(ConversionError::new(format!(
                "unexpected value '{text}' (expected one of: {})",
                Converter::<bool>::default_choices(self).join(", ")
            ))),
        }
    }

    fn to_str(&self, value: &bool) -> String {
        let text = if *value { "true" } else { "false" };
        text.to_string()
    }

    fn default_choices(&self) -> Vec<String> {
        vec!["true".to_string(), "false".to_string()]
    }
}

impl Converter<String> for DefaultConverter {
    fn from_str(&self, text: &str) -> Result<String, ConversionError> {
        Ok(text.to_string())
    }

    fn to_str(&self, value: &String) -> String {
        value.clone()
    }
}

impl Converter<PathBuf> for DefaultConverter {
    fn from_str(&self, text: &str) -> Result<PathBuf, ConversionError> {
        Ok(PathBuf::from(text))
    }

    fn to_str(&self, value: &PathBuf) -> String {
        value.to_string_lossy().into_owned()
    }
}

impl Converter<char> for DefaultConverter {
    fn from_str(&self, text: &str) -> Result<char, ConversionError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConversionError::invalid_value(text, "char")),
        }
    }

    fn to_str(&self, value: &char) -> String {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T>(value: T)
    where
        T: PartialEq + std::fmt::Debug,
        DefaultConverter: Converter<T>,
    {
        let text = DefaultConverter.to_str(&value);
        assert_eq!(DefaultConverter.from_str(&text), Ok(value));
    }

    #[test]
    fn test_numbers_require_full_token() {
        let ok: Result<i32, _> = DefaultConverter.from_str("42");
        assert_eq!(ok, Ok(42));

        let trailing: Result<i32, _> = DefaultConverter.from_str("42abc");
        assert!(trailing.is_err());

        let partial: Result<f32, _> = DefaultConverter.from_str("1.5.2");
        assert!(partial.is_err());

        let empty: Result<u8, _> = DefaultConverter.from_str("");
        assert!(empty.is_err());

        let negative: Result<usize, _> = DefaultConverter.from_str("-1");
        assert!(negative.is_err());
    }

    #[test]
    fn test_bool_accepts_case_insensitive_words() {
        for text in ["1", "true", "TRUE", "True"] {
            assert_eq!(Converter::<bool>::from_str(&DefaultConverter, text), Ok(true));
        }
        for text in ["0", "false", "FaLsE"] {
            assert_eq!(Converter::<bool>::from_str(&DefaultConverter, text), Ok(false));
        }

        let err = Converter::<bool>::from_str(&DefaultConverter, "yes").unwrap_err();
        assert!(err.message().contains("expected one of: true, false"));
    }

    #[test]
    fn test_bool_default_choices() {
        assert_eq!(
            Converter::<bool>::default_choices(&DefaultConverter),
            vec!["true", "false"]
        );
        assert!(Converter::<String>::default_choices(&DefaultConverter).is_empty());
    }

    #[test]
    fn test_text_passes_through_including_empty() {
        let text: Result<String, _> = DefaultConverter.from_str("");
        assert_eq!(text, Ok(String::new()));

        let text: Result<String, _> = DefaultConverter.from_str("  spaced  ");
        assert_eq!(text.as_deref(), Ok("  spaced  "));
    }

    #[test]
    fn test_char_requires_single_character() {
        assert_eq!(Converter::<char>::from_str(&DefaultConverter, "x"), Ok('x'));
        assert!(Converter::<char>::from_str(&DefaultConverter, "xy").is_err());
        assert!(Converter::<char>::from_str(&DefaultConverter, "").is_err());
    }

    #[test]
    fn test_builtin_roundtrip() {
        roundtrip(-17i64);
        roundtrip(u64::MAX);
        roundtrip(0.1f64);
        roundtrip(3.25f32);
        roundtrip(true);
        roundtrip(false);
        roundtrip(String::from("hello world"));
        roundtrip(PathBuf::from("/tmp/a.txt"));
        roundtrip('z');
    }
}
