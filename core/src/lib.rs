//! Declarative command-line argument parsing into caller-owned variables.
//!
//! Callers declare typed destinations ([`ArgValue<T>`]), register one
//! [`ArgumentSpec`] per argument with a [`Parser`], and then parse a token
//! stream. Each destination records where its value came from
//! ([`Provenance`]): the command line, a declared default, an action's
//! implied value, or nowhere at all.
//!
//! - [`Parser`]: the registry of arguments and argument groups, and the
//!   entry point for parsing and help rendering.
//! - [`ArgumentSpec`]: names, help, [`Action`], [`Nargs`], choices and
//!   default of one argument, refined with chained mutators.
//! - [`Converter`]: text conversion per destination type, with
//!   [`DefaultConverter`] covering numbers, `bool`, `char`, `String` and
//!   `PathBuf`.
//! - [`Formatter`]: help and usage rendering from a [`ParserDescription`]
//!   snapshot, configured by [`FormatterConfig`].
//!
//! Parsing is all-or-nothing: on error no destination is modified.
//!
//! # Example
//!
//! ```
//! use argbind_core::*;
//!
//! let mut verbose = ArgValue::<bool>::new();
//! let mut level = ArgValue::<u8>::new();
//! let mut inputs = ArgValue::<Vec<String>>::new();
//! let mut output = ArgValue::<String>::new();
//!
//! let mut parser = Parser::new("convert").with_description("Convert files");
//! parser
//!     .add_argument(&mut verbose, ("--verbose", "-v"))?
//!     .action(Action::StoreTrue)?
//!     .help("Print progress");
//! parser
//!     .add_argument(&mut level, "--level")?
//!     .default_value("1")
//!     .choices(["0", "1", "2"])?;
//! parser
//!     .add_argument(&mut inputs, "--input")?
//!     .action(Action::Append)?
//!     .nargs(Nargs::OneOrMore)?;
//! parser.add_argument(&mut output, "output")?;
//!
//! let outcome = parser.parse(&["--input", "a.txt", "b.txt", "-v", "out.txt"])?;
//! assert_eq!(outcome, ParseOutcome::Parsed);
//! assert!(parser.format_usage().starts_with("usage: convert"));
//! drop(parser);
//!
//! assert!(*verbose);
//! assert_eq!(*level, 1);
//! assert_eq!(level.provenance(), Provenance::Default);
//! assert_eq!(*inputs, vec!["a.txt", "b.txt"]);
//! assert_eq!(*output, "out.txt");
//! # Ok::<(), ArgParseError>(())
//! ```

mod action;
mod argument;
mod binding;
mod config;
mod convert;
mod describe;
mod engine;
mod error;
mod help;
mod parser;
mod value;

pub use action::{Action, Nargs};
pub use argument::{ArgumentSpec, OptionNames};
pub use config::FormatterConfig;
pub use convert::{ConversionError, Converter, DefaultConverter};
pub use describe::{ArgumentInfo, GroupDescription, ParserDescription};
pub use engine::{ParseOutcome, looks_like_option};
pub use error::{ArgParseError, ConfigError, ErrorKind, Result};
pub use help::{DefaultFormatter, Formatter, wrap};
pub use parser::{ArgId, ArgumentGroup, DEFAULT_GROUP_LABEL, GroupId, Parser};
pub use value::{ArgValue, Destination, Provenance};
