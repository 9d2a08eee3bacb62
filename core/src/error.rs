//! Error types for argument registration, parsing, and formatter configuration.
//!
//! [`ArgParseError`] is the single failure type threaded through both the
//! registration phase (`add_argument*`, builder mutators) and the parsing
//! phase (`Parser::parse`). Every variant carries a human-readable message;
//! [`ArgParseError::kind`] gives a fieldless discriminant for matching.

use thiserror::Error;

/// Errors raised while declaring arguments or parsing a token stream.
///
/// All of them are fail-fast: the first one ends the operation and no
/// destination is modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgParseError {
    /// Bad option name (dash count, empty name, long/short ordering), an
    /// invalid nargs character, choices the converter rejects, or an action
    /// the destination type cannot absorb.
    #[error("malformed argument specification: {0}")]
    MalformedSpec(String),

    /// The requested nargs is not allowed for the argument's action.
    #[error("action/nargs mismatch: {0}")]
    ActionNargsMismatch(String),

    /// Two arguments share an option string.
    #[error("duplicate option string: {0}")]
    DuplicateOption(String),

    /// A token failed type conversion or is not one of the permitted choices.
    #[error("{0}")]
    Conversion(String),

    /// Too few value tokens for an option, or a positional left unconsumed.
    #[error("{0}")]
    Arity(String),

    /// An option marked `required` was never given on the command line.
    #[error("missing required argument: {0}")]
    MissingRequired(String),

    /// A token matched no option string and no positional slot was free.
    #[error("unrecognized argument: {0}")]
    UnrecognizedToken(String),
}

/// Discriminant of [`ArgParseError`], without the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedSpec,
    ActionNargsMismatch,
    DuplicateOption,
    Conversion,
    Arity,
    MissingRequired,
    UnrecognizedToken,
}

impl ArgParseError {
    /// Returns which part of the taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedSpec(_) => ErrorKind::MalformedSpec,
            Self::ActionNargsMismatch(_) => ErrorKind::ActionNargsMismatch,
            Self::DuplicateOption(_) => ErrorKind::DuplicateOption,
            Self::Conversion(_) => ErrorKind::Conversion,
            Self::Arity(_) => ErrorKind::Arity,
            Self::MissingRequired(_) => ErrorKind::MissingRequired,
            Self::UnrecognizedToken(_) => ErrorKind::UnrecognizedToken,
        }
    }

    /// Returns the message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::MalformedSpec(msg)
            | Self::ActionNargsMismatch(msg)
            | Self::DuplicateOption(msg)
            | Self::Conversion(msg)
            | Self::Arity(msg)
            | Self::MissingRequired(msg)
            | Self::UnrecognizedToken(msg) => msg.as_str(),
        }
    }
}

/// Errors that can occur while loading or saving a
/// [`FormatterConfig`](crate::FormatterConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A value is out of its accepted range (e.g. a zero wrap width).
    #[error("invalid formatter config: {0}")]
    Invalid(String),
}

/// Convenience alias for results with [`ArgParseError`].
pub type Result<T> = std::result::Result<T, ArgParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let err = ArgParseError::DuplicateOption("-v".to_string());
        assert_eq!(err.kind(), ErrorKind::DuplicateOption);
        assert_eq!(err.message(), "-v");
        assert_eq!(err.to_string(), "duplicate option string: -v");
    }

    #[test]
    fn test_conversion_display_is_bare_message() {
        let err = ArgParseError::Conversion("argument --level: invalid choice '5'".to_string());
        assert_eq!(err.to_string(), "argument --level: invalid choice '5'");
    }
}
