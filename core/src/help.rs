//! Help and usage rendering.
//!
//! A [`Formatter`] turns a [`ParserDescription`] into text. It never sees
//! the parser itself, so custom formatters cannot observe or modify bound
//! destinations. [`DefaultFormatter`] produces the familiar layout:
//!
//! ```text
//! usage: tool [-h] [-l LEVEL] FILE
//!
//! Process a file
//!
//! arguments:
//!   -h, --help            Show this help
//!   -l, --level LEVEL     Verbosity level (default: 1)
//!   FILE                  File to process
//! ```

use crate::config::FormatterConfig;
use crate::describe::{ArgumentInfo, ParserDescription};

/// Renders a parser description as text.
///
/// Each section method returns a complete, newline-terminated block (or an
/// empty string when the section has nothing to show).
/// [`format_help`](Formatter::format_help) concatenates the four sections.
pub trait Formatter {
    fn format_usage(&self, desc: &ParserDescription) -> String;

    fn format_description(&self, desc: &ParserDescription) -> String;

    fn format_arguments(&self, desc: &ParserDescription) -> String;

    fn format_epilog(&self, desc: &ParserDescription) -> String;

    fn format_help(&self, desc: &ParserDescription) -> String {
        let mut out = self.format_usage(desc);
        out.push_str(&self.format_description(desc));
        out.push_str(&self.format_arguments(desc));
        out.push_str(&self.format_epilog(desc));
        out
    }
}

/// Column-aligned, word-wrapped help output.
#[derive(Debug, Clone, Default)]
pub struct DefaultFormatter {
    config: FormatterConfig,
}

impl DefaultFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    fn paragraph(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        let mut out = String::from("\n");
        for line in wrap(text.trim(), self.config.width) {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    fn format_row(&self, arg: &ArgumentInfo, out: &mut String) {
        let indent = " ".repeat(self.config.indent);
        let label = arg.option_label();

        let mut help = arg.help.trim().to_string();
        if let Some(default) = &arg.default_value {
            if !help.is_empty() {
                help.push(' ');
            }
            help.push_str(&format!("(default: {default})"));
        }

        if help.is_empty() {
            out.push_str(&format!("{indent}{label}\n"));
            return;
        }

        let help_width = self.config.width.saturating_sub(self.config.help_position).max(1);
        let lines = wrap(&help, help_width);
        let pad = " ".repeat(self.config.help_position);
        let used = self.config.indent + label.chars().count();

        let mut rest = lines.iter();
        if used + 2 <= self.config.help_position {
            let first = rest.next().map(String::as_str).unwrap_or_default();
            let gap = " ".repeat(self.config.help_position - used);
            out.push_str(&format!("{indent}{label}{gap}{first}\n"));
        } else {
            out.push_str(&format!("{indent}{label}\n"));
        }
        for line in rest {
            out.push_str(&format!("{pad}{line}\n"));
        }
    }
}

impl Formatter for DefaultFormatter {
    fn format_usage(&self, desc: &ParserDescription) -> String {
        let prefix = format!("usage: {}", desc.prog);
        let continuation = " ".repeat(prefix.chars().count() + 1);

        let mut out = String::new();
        let mut line = prefix;
        for entry in desc.arguments().filter(|a| a.show_in_usage) {
            let entry = entry.usage_entry();
            if line.chars().count() + 1 + entry.chars().count() > self.config.width {
                out.push_str(&line);
                out.push('\n');
                line = continuation.clone();
                line.push_str(&entry);
            } else {
                line.push(' ');
                line.push_str(&entry);
            }
        }
        out.push_str(&line);
        out.push('\n');
        out
    }

    fn format_description(&self, desc: &ParserDescription) -> String {
        self.paragraph(&desc.description)
    }

    fn format_arguments(&self, desc: &ParserDescription) -> String {
        let mut out = String::new();
        for group in &desc.groups {
            if group.arguments.is_empty() {
                continue;
            }
            out.push_str(&format!("\n{}:\n", group.label));
            for arg in &group.arguments {
                self.format_row(arg, &mut out);
            }
            out.push_str(&self.paragraph(&group.epilog));
        }
        out
    }

    fn format_epilog(&self, desc: &ParserDescription) -> String {
        self.paragraph(&desc.epilog)
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
/// Explicit line breaks in `text` are kept.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source in text.lines() {
        let mut line = String::new();
        for word in source.split_whitespace() {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, Nargs};
    use crate::describe::GroupDescription;

    fn arg(long: &str, short: Option<&str>, help: &str) -> ArgumentInfo {
        let positional = !long.starts_with('-');
        ArgumentInfo {
            long: long.to_string(),
            short: short.map(str::to_string),
            help: help.to_string(),
            metavar: long.trim_start_matches('-').to_uppercase(),
            nargs: Nargs::One,
            action: Action::Store,
            choices: Vec::new(),
            required: positional,
            default_value: None,
            show_in_usage: true,
            positional,
        }
    }

    fn sample() -> ParserDescription {
        let mut verbose = arg("--verbose", Some("-v"), "Print more");
        verbose.action = Action::StoreTrue;
        verbose.nargs = Nargs::Zero;

        let mut level = arg("--level", Some("-l"), "Verbosity level");
        level.default_value = Some("1".to_string());

        ParserDescription {
            prog: "tool".to_string(),
            description: "Process a file".to_string(),
            epilog: "See the manual for more.".to_string(),
            version: None,
            groups: vec![
                GroupDescription {
                    label: "arguments".to_string(),
                    epilog: String::new(),
                    arguments: vec![verbose, level, arg("file", None, "File to process")],
                },
                GroupDescription {
                    label: "empty".to_string(),
                    epilog: String::new(),
                    arguments: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("a bb ccc dddd", 6), vec!["a bb", "ccc", "dddd"]);
        assert_eq!(wrap("averylongword x", 4), vec!["averylongword", "x"]);
        assert_eq!(wrap("one\ntwo", 80), vec!["one", "two"]);
    }

    #[test]
    fn test_usage_line() {
        let usage = DefaultFormatter::default().format_usage(&sample());
        assert_eq!(usage, "usage: tool [-v] [-l LEVEL] FILE\n");
    }

    #[test]
    fn test_usage_wraps_under_prog() {
        let config = FormatterConfig {
            width: 24,
            indent: 2,
            help_position: 10,
        };
        let usage = DefaultFormatter::new(config).format_usage(&sample());
        let lines: Vec<&str> = usage.lines().collect();
        assert_eq!(lines[0], "usage: tool [-v]");
        assert_eq!(lines[1], "            [-l LEVEL]");
        assert_eq!(lines[2], "            FILE");
    }

    #[test]
    fn test_hidden_from_usage() {
        let mut desc = sample();
        desc.groups[0].arguments[0].show_in_usage = false;
        let usage = DefaultFormatter::default().format_usage(&desc);
        assert!(!usage.contains("[-v]"));

        let help = DefaultFormatter::default().format_help(&desc);
        assert!(help.contains("-v, --verbose"));
    }

    #[test]
    fn test_help_layout() {
        let help = DefaultFormatter::default().format_help(&sample());
        let expected = "\
usage: tool [-v] [-l LEVEL] FILE

Process a file

arguments:
  -v, --verbose         Print more
  -l, --level LEVEL     Verbosity level (default: 1)
  FILE                  File to process

See the manual for more.
";
        assert_eq!(help, expected);
        assert!(!help.contains("empty:"));
    }

    #[test]
    fn test_long_label_moves_help_to_next_line() {
        let mut desc = sample();
        desc.groups[0].arguments = vec![arg(
            "--a-really-long-option-name",
            None,
            "Help text",
        )];
        let text = DefaultFormatter::default().format_arguments(&desc);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[2],
            "  --a-really-long-option-name A-REALLY-LONG-OPTION-NAME"
        );
        assert_eq!(lines[3], format!("{}Help text", " ".repeat(24)));
    }
}
