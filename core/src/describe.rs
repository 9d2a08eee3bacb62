//! Read-only snapshot of a parser's registry.
//!
//! [`Parser::describe`](crate::Parser::describe) copies everything a
//! formatter needs out of the registry so that help rendering never touches
//! the bound destinations. The snapshot is serde-serializable, which also
//! makes it usable as a machine-readable description of a command line.

use serde::{Deserialize, Serialize};

use crate::action::{Action, Nargs};
use crate::argument::ArgumentSpec;

/// Snapshot of a whole parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserDescription {
    pub prog: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub epilog: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Groups in creation order; the default group comes first.
    pub groups: Vec<GroupDescription>,
}

/// Snapshot of one argument group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDescription {
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub epilog: String,
    pub arguments: Vec<ArgumentInfo>,
}

/// Snapshot of one argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentInfo {
    /// Long option, or the bare name of a positional.
    pub long: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default)]
    pub help: String,
    pub metavar: String,
    pub nargs: Nargs,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub show_in_usage: bool,
    pub positional: bool,
}

impl ParserDescription {
    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Every argument, group by group.
    pub fn arguments(&self) -> impl Iterator<Item = &ArgumentInfo> {
        self.groups.iter().flat_map(|group| group.arguments.iter())
    }
}

impl ArgumentInfo {
    pub(crate) fn from_spec(spec: &ArgumentSpec<'_>) -> Self {
        Self {
            long: spec.long_option().to_string(),
            short: spec.short_option().map(str::to_string),
            help: spec.get_help().to_string(),
            metavar: spec.get_metavar().to_string(),
            nargs: spec.get_nargs(),
            action: spec.get_action(),
            choices: spec.get_choices().to_vec(),
            required: spec.is_required(),
            default_value: spec.get_default_value().map(str::to_string),
            show_in_usage: spec.is_shown_in_usage(),
            positional: spec.is_positional(),
        }
    }

    /// The metavar, replaced by `{a,b,c}` when the values are restricted.
    pub fn display_metavar(&self) -> String {
        if self.action.takes_values() && !self.choices.is_empty() {
            format!("{{{}}}", self.choices.join(","))
        } else {
            self.metavar.clone()
        }
    }

    /// What follows the option string in usage text, derived from nargs.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::{Action, ArgValue, Nargs, Parser};
    ///
    /// let mut files = ArgValue::<Vec<String>>::new();
    /// let mut parser = Parser::new("tool");
    /// parser
    ///     .add_argument(&mut files, "--file")?
    ///     .action(Action::Append)?
    ///     .nargs(Nargs::OneOrMore)?;
    ///
    /// let desc = parser.describe();
    /// let info = desc.arguments().next().unwrap();
    /// assert_eq!(info.usage_fragment(), " FILE [FILE]");
    /// # Ok::<(), argbind_core::ArgParseError>(())
    /// ```
    pub fn usage_fragment(&self) -> String {
        let metavar = self.display_metavar();
        match self.nargs {
            Nargs::Zero => String::new(),
            Nargs::One => format!(" {metavar}"),
            Nargs::ZeroOrOne => format!(" [{metavar}]"),
            Nargs::OneOrMore => format!(" {metavar} [{metavar}]"),
            Nargs::ZeroOrMore => format!(" [{metavar} [{metavar}...]]"),
        }
    }

    /// The entry for this argument in the one-line usage summary:
    /// `FILE`, `--level LEVEL`, or `[-v]` for optional options.
    pub fn usage_entry(&self) -> String {
        if self.positional {
            return self.display_metavar();
        }
        let name = self.short.as_deref().unwrap_or(&self.long);
        let entry = format!("{name}{}", self.usage_fragment());
        if self.required {
            entry
        } else {
            format!("[{entry}]")
        }
    }

    /// The left-hand column of a help row: `-l, --level LEVEL`.
    pub fn option_label(&self) -> String {
        if self.positional {
            return self.display_metavar();
        }
        let names = match &self.short {
            Some(short) => format!("{short}, {}", self.long),
            None => self.long.clone(),
        };
        format!("{names}{}", self.usage_fragment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(nargs: Nargs) -> ArgumentInfo {
        ArgumentInfo {
            long: "--input".to_string(),
            short: Some("-i".to_string()),
            help: String::new(),
            metavar: "INPUT".to_string(),
            nargs,
            action: Action::Store,
            choices: Vec::new(),
            required: false,
            default_value: None,
            show_in_usage: true,
            positional: false,
        }
    }

    #[test]
    fn test_usage_fragment_per_nargs() {
        assert_eq!(info(Nargs::Zero).usage_fragment(), "");
        assert_eq!(info(Nargs::One).usage_fragment(), " INPUT");
        assert_eq!(info(Nargs::ZeroOrOne).usage_fragment(), " [INPUT]");
        assert_eq!(info(Nargs::OneOrMore).usage_fragment(), " INPUT [INPUT]");
        assert_eq!(
            info(Nargs::ZeroOrMore).usage_fragment(),
            " [INPUT [INPUT...]]"
        );
    }

    #[test]
    fn test_choices_replace_metavar() {
        let mut arg = info(Nargs::One);
        arg.choices = vec!["fast".to_string(), "slow".to_string()];
        assert_eq!(arg.display_metavar(), "{fast,slow}");
        assert_eq!(arg.usage_fragment(), " {fast,slow}");

        arg.action = Action::StoreTrue;
        assert_eq!(arg.display_metavar(), "INPUT");
    }

    #[test]
    fn test_usage_entry_and_label() {
        let arg = info(Nargs::One);
        assert_eq!(arg.usage_entry(), "[-i INPUT]");
        assert_eq!(arg.option_label(), "-i, --input INPUT");

        let mut required = info(Nargs::One);
        required.short = None;
        required.required = true;
        assert_eq!(required.usage_entry(), "--input INPUT");

        let mut positional = info(Nargs::One);
        positional.long = "input".to_string();
        positional.short = None;
        positional.positional = true;
        assert_eq!(positional.usage_entry(), "INPUT");
        assert_eq!(positional.option_label(), "INPUT");
    }

    #[test]
    fn test_to_json_skips_empty_fields() {
        let desc = ParserDescription {
            prog: "tool".to_string(),
            description: String::new(),
            epilog: String::new(),
            version: None,
            groups: vec![GroupDescription {
                label: "arguments".to_string(),
                epilog: String::new(),
                arguments: vec![info(Nargs::One)],
            }],
        };

        let json = desc.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["prog"], "tool");
        assert!(value.get("description").is_none());
        assert_eq!(value["groups"][0]["arguments"][0]["action"], "store");
        assert_eq!(value["groups"][0]["arguments"][0]["short"], "-i");

        let back: ParserDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);
    }
}
