//! Actions and arity (`nargs`) for declared arguments.
//!
//! An [`Action`] decides what happens to an argument's destination when
//! the argument is matched; [`Nargs`] decides how many value tokens are
//! consumed. The two must agree:
//!
//! | action | forced nargs | allowed overrides |
//! |---|---|---|
//! | `StoreTrue`, `StoreFalse`, `Count`, `Help`, `Version` | `0` | none |
//! | `Store` | `1` | `1`, `+` |
//! | `Append` | `*` | `*`, `+` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArgParseError;

/// The effect of matching an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Convert the value token(s) and overwrite the destination (the default).
    #[default]
    Store,
    /// Write `true`, consuming no value tokens.
    StoreTrue,
    /// Write `false`, consuming no value tokens.
    StoreFalse,
    /// Convert the value token(s) and extend the destination sequence.
    Append,
    /// Increment the destination by one per occurrence.
    Count,
    /// Stop parsing and report help text.
    Help,
    /// Stop parsing and report version text.
    Version,
}

impl Action {
    /// The nargs an argument is forced to when this action is set.
    pub fn default_nargs(self) -> Nargs {
        match self {
            Self::Store => Nargs::One,
            Self::Append => Nargs::ZeroOrMore,
            Self::StoreTrue | Self::StoreFalse | Self::Count | Self::Help | Self::Version => {
                Nargs::Zero
            }
        }
    }

    /// Whether `nargs` may be paired with this action.
    pub fn allows(self, nargs: Nargs) -> bool {
        match self {
            Self::Store => matches!(nargs, Nargs::One | Nargs::OneOrMore),
            Self::Append => matches!(nargs, Nargs::ZeroOrMore | Nargs::OneOrMore),
            Self::StoreTrue | Self::StoreFalse | Self::Count | Self::Help | Self::Version => {
                nargs == Nargs::Zero
            }
        }
    }

    /// Whether matching this action ends the parse immediately.
    pub fn short_circuits(self) -> bool {
        matches!(self, Self::Help | Self::Version)
    }

    /// Whether this action converts value tokens through the converter.
    pub fn takes_values(self) -> bool {
        matches!(self, Self::Store | Self::Append)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::StoreTrue => "store_true",
            Self::StoreFalse => "store_false",
            Self::Append => "append",
            Self::Count => "count",
            Self::Help => "help",
            Self::Version => "version",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arity contract for an argument's value tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Nargs {
    /// `'0'`: no value tokens.
    Zero,
    /// `'1'`: exactly one value token (the default).
    #[default]
    One,
    /// `'?'`: zero or one value token.
    ZeroOrOne,
    /// `'*'`: any number of value tokens.
    ZeroOrMore,
    /// `'+'`: at least one value token.
    OneOrMore,
}

impl Nargs {
    /// Minimum and maximum number of value tokens; `None` means unbounded.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::Nargs;
    ///
    /// assert_eq!(Nargs::One.bounds(), (1, Some(1)));
    /// assert_eq!(Nargs::OneOrMore.bounds(), (1, None));
    /// ```
    pub fn bounds(self) -> (usize, Option<usize>) {
        match self {
            Self::Zero => (0, Some(0)),
            Self::One => (1, Some(1)),
            Self::ZeroOrOne => (0, Some(1)),
            Self::ZeroOrMore => (0, None),
            Self::OneOrMore => (1, None),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Zero => '0',
            Self::One => '1',
            Self::ZeroOrOne => '?',
            Self::ZeroOrMore => '*',
            Self::OneOrMore => '+',
        }
    }
}

impl TryFrom<char> for Nargs {
    type Error = ArgParseError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '0' => Ok(Self::Zero),
            '1' => Ok(Self::One),
            '?' => Ok(Self::ZeroOrOne),
            '*' => Ok(Self::ZeroOrMore),
            '+' => Ok(Self::OneOrMore),
            other => Err(ArgParseError::MalformedSpec(format!(
                "invalid nargs '{other}' (must be one of '0', '1', '?', '*', '+')"
            ))),
        }
    }
}

impl FromStr for Nargs {
    type Err = ArgParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(ArgParseError::MalformedSpec(format!(
                "invalid nargs '{s}' (must be a single character)"
            ))),
        }
    }
}

impl fmt::Display for Nargs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_nargs_table() {
        assert!(Action::Store.allows(Nargs::One));
        assert!(Action::Store.allows(Nargs::OneOrMore));
        assert!(!Action::Store.allows(Nargs::ZeroOrOne));
        assert!(!Action::Store.allows(Nargs::ZeroOrMore));

        assert!(Action::Append.allows(Nargs::ZeroOrMore));
        assert!(Action::Append.allows(Nargs::OneOrMore));
        assert!(!Action::Append.allows(Nargs::One));

        for action in [Action::StoreTrue, Action::StoreFalse, Action::Count] {
            assert_eq!(action.default_nargs(), Nargs::Zero);
            assert!(action.allows(Nargs::Zero));
            assert!(!action.allows(Nargs::One));
        }
    }

    #[test]
    fn test_nargs_parse() {
        assert_eq!("+".parse::<Nargs>().unwrap(), Nargs::OneOrMore);
        assert_eq!(Nargs::try_from('?').unwrap(), Nargs::ZeroOrOne);

        let err = "x".parse::<Nargs>().unwrap_err();
        assert!(matches!(err, ArgParseError::MalformedSpec(_)));
        assert!("++".parse::<Nargs>().is_err());
    }

    #[test]
    fn test_nargs_display_roundtrip() {
        for n in [
            Nargs::Zero,
            Nargs::One,
            Nargs::ZeroOrOne,
            Nargs::ZeroOrMore,
            Nargs::OneOrMore,
        ] {
            assert_eq!(n.to_string().parse::<Nargs>().unwrap(), n);
        }
    }
}
