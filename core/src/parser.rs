//! The argument registry.
//!
//! [`Parser`] owns every [`ArgumentSpec`] in an append-only arena and hands
//! out stable [`ArgId`] / [`GroupId`] handles. Groups only record which
//! arguments belong to them, in registration order, so adding an argument
//! anywhere never invalidates a handle obtained earlier.
//!
//! Option strings are unique across the whole parser; a collision is
//! reported by `add_argument*` as [`ArgParseError::DuplicateOption`] and the
//! registry is left unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::argument::{ArgumentSpec, OptionNames};
use crate::binding::Bound;
use crate::convert::{Converter, DefaultConverter};
use crate::describe::{ArgumentInfo, GroupDescription, ParserDescription};
use crate::engine::{self, ParseOutcome};
use crate::error::{ArgParseError, Result};
use crate::help::{DefaultFormatter, Formatter};
use crate::value::{ArgValue, Destination};

/// Label of the group `Parser::add_argument` adds to.
pub const DEFAULT_GROUP_LABEL: &str = "arguments";

/// Stable handle to an argument inside its [`Parser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArgId(usize);

impl ArgId {
    /// Position in the parser's argument arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stable handle to an argument group inside its [`Parser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(usize);

impl GroupId {
    /// The group created with every parser; target of [`Parser::add_argument`].
    pub const UNGROUPED: GroupId = GroupId(0);

    /// Position in the parser's group list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A display label plus the arguments registered under it.
#[derive(Debug, Clone)]
pub struct ArgumentGroup {
    id: GroupId,
    label: String,
    epilog: String,
    arguments: Vec<ArgId>,
}

impl ArgumentGroup {
    fn new(id: GroupId, label: String) -> Self {
        Self {
            id,
            label,
            epilog: String::new(),
            arguments: Vec::new(),
        }
    }

    /// Handle of this group.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Heading shown above the group's arguments.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Text shown after the group's arguments.
    pub fn epilog(&self) -> &str {
        &self.epilog
    }

    /// Handles of this group's arguments, in registration order.
    pub fn arguments(&self) -> &[ArgId] {
        &self.arguments
    }
}

/// Registry of argument specifications and entry point for parsing.
///
/// `'a` is the lifetime of the caller-owned [`ArgValue`] destinations bound
/// with `add_argument*`. Drop the parser (or let it go out of scope) before
/// reading those destinations.
///
/// # Examples
///
/// ```
/// use argbind_core::{Action, ArgValue, Nargs, ParseOutcome, Parser, Provenance};
///
/// #[derive(Default)]
/// struct Args {
///     file: ArgValue<String>,
///     count: ArgValue<Vec<u32>>,
///     verbose: ArgValue<bool>,
/// }
///
/// let mut args = Args::default();
/// let mut parser = Parser::new("tool").with_description("Process a file");
/// parser.add_argument(&mut args.file, "file")?.help("File to process");
/// parser
///     .add_argument(&mut args.count, "--count")?
///     .action(Action::Append)?
///     .nargs(Nargs::OneOrMore)?;
/// parser
///     .add_argument(&mut args.verbose, ("--verbose", "-v"))?
///     .action(Action::StoreTrue)?;
///
/// let outcome = parser.parse(&["a.txt", "--count", "1", "2", "3"])?;
/// assert_eq!(outcome, ParseOutcome::Parsed);
/// drop(parser);
///
/// assert_eq!(*args.file, "a.txt");
/// assert_eq!(*args.count, vec![1, 2, 3]);
/// assert!(!*args.verbose);
/// assert_eq!(args.verbose.provenance(), Provenance::Inferred);
/// # Ok::<(), argbind_core::ArgParseError>(())
/// ```
pub struct Parser<'a> {
    prog: String,
    description: String,
    epilog: String,
    version: Option<String>,
    groups: Vec<ArgumentGroup>,
    arguments: Vec<ArgumentSpec<'a>>,
    formatter: Box<dyn Formatter>,
}

impl<'a> Parser<'a> {
    /// Creates a parser with an empty default group labelled
    /// [`DEFAULT_GROUP_LABEL`].
    pub fn new(prog: impl Into<String>) -> Self {
        Self {
            prog: prog.into(),
            description: String::new(),
            epilog: String::new(),
            version: None,
            groups: vec![ArgumentGroup::new(
                GroupId::UNGROUPED,
                DEFAULT_GROUP_LABEL.to_string(),
            )],
            arguments: Vec::new(),
            formatter: Box::new(DefaultFormatter::default()),
        }
    }

    /// Sets the text shown between usage and arguments in help output.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the text shown after the argument list in help output.
    pub fn with_epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = epilog.into();
        self
    }

    /// Sets the text reported by a [`Version`](crate::Action::Version) argument.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Replaces the formatter used for help and usage text.
    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Renames the program shown in usage and help text.
    pub fn set_prog(&mut self, prog: impl Into<String>) -> &mut Self {
        self.prog = prog.into();
        self
    }

    /// Program name used in usage text.
    pub fn prog(&self) -> &str {
        &self.prog
    }

    /// Help description; empty if unset.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Help epilog; empty if unset.
    pub fn epilog(&self) -> &str {
        &self.epilog
    }

    /// Version text reported by a `Version` argument.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Creates a new, empty group and returns its handle.
    pub fn add_argument_group(&mut self, label: impl Into<String>) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(ArgumentGroup::new(id, label.into()));
        id
    }

    /// Sets the trailing text of a group.
    pub fn set_group_epilog(&mut self, group: GroupId, epilog: impl Into<String>) -> Result<()> {
        let group = self.group_entry_mut(group)?;
        group.epilog = epilog.into();
        Ok(())
    }

    /// Registers an argument in the default group using [`DefaultConverter`].
    ///
    /// # Errors
    ///
    /// [`ArgParseError::MalformedSpec`] for invalid names,
    /// [`ArgParseError::DuplicateOption`] if a name is already registered.
    pub fn add_argument<T>(
        &mut self,
        dest: &'a mut ArgValue<T>,
        names: impl OptionNames,
    ) -> Result<&mut ArgumentSpec<'a>>
    where
        T: Destination + 'a,
        DefaultConverter: Converter<T::Item>,
    {
        self.add_argument_to_with(GroupId::UNGROUPED, dest, names, DefaultConverter)
    }

    /// Registers an argument in the default group with a custom converter.
    pub fn add_argument_with<T, C>(
        &mut self,
        dest: &'a mut ArgValue<T>,
        names: impl OptionNames,
        converter: C,
    ) -> Result<&mut ArgumentSpec<'a>>
    where
        T: Destination + 'a,
        C: Converter<T::Item> + 'a,
    {
        self.add_argument_to_with(GroupId::UNGROUPED, dest, names, converter)
    }

    /// Registers an argument in `group` using [`DefaultConverter`].
    pub fn add_argument_to<T>(
        &mut self,
        group: GroupId,
        dest: &'a mut ArgValue<T>,
        names: impl OptionNames,
    ) -> Result<&mut ArgumentSpec<'a>>
    where
        T: Destination + 'a,
        DefaultConverter: Converter<T::Item>,
    {
        self.add_argument_to_with(group, dest, names, DefaultConverter)
    }

    /// Registers an argument in `group` with a custom converter.
    pub fn add_argument_to_with<T, C>(
        &mut self,
        group: GroupId,
        dest: &'a mut ArgValue<T>,
        names: impl OptionNames,
        converter: C,
    ) -> Result<&mut ArgumentSpec<'a>>
    where
        T: Destination + 'a,
        C: Converter<T::Item> + 'a,
    {
        self.group_entry_mut(group)?;

        let (long, short) = names.into_names();
        let id = ArgId(self.arguments.len());
        let binding = Box::new(Bound::new(dest, converter));
        let spec = ArgumentSpec::new(id, group, long, short, binding)?;

        for name in std::iter::once(spec.long_option()).chain(spec.short_option()) {
            if self.is_registered(name) {
                return Err(ArgParseError::DuplicateOption(format!(
                    "'{name}' is already registered"
                )));
            }
        }

        debug!(
            argument = %spec.display_name(),
            short = ?spec.short_option(),
            group = %self.groups[group.0].label,
            "Registered argument"
        );

        self.groups[group.0].arguments.push(id);
        self.arguments.push(spec);
        Ok(&mut self.arguments[id.0])
    }

    /// Looks up an argument by handle.
    pub fn argument(&self, id: ArgId) -> Option<&ArgumentSpec<'a>> {
        self.arguments.get(id.0)
    }

    /// Mutable access for further builder calls through a handle.
    pub fn argument_mut(&mut self, id: ArgId) -> Option<&mut ArgumentSpec<'a>> {
        self.arguments.get_mut(id.0)
    }

    /// All arguments, in registration order.
    pub fn arguments(&self) -> &[ArgumentSpec<'a>] {
        &self.arguments
    }

    pub(crate) fn arguments_mut(&mut self) -> &mut [ArgumentSpec<'a>] {
        &mut self.arguments
    }

    /// Looks up a group by handle.
    pub fn group(&self, id: GroupId) -> Option<&ArgumentGroup> {
        self.groups.get(id.0)
    }

    /// All groups in creation order; the default group comes first.
    pub fn groups(&self) -> &[ArgumentGroup] {
        &self.groups
    }

    /// Arguments of one group, in registration order.
    pub fn group_arguments(&self, id: GroupId) -> impl Iterator<Item = &ArgumentSpec<'a>> {
        self.groups
            .get(id.0)
            .into_iter()
            .flat_map(|g| g.arguments.iter())
            .map(|arg| &self.arguments[arg.0])
    }

    /// Finds the option (not positional) registered under `option`.
    pub fn find_option(&self, option: &str) -> Option<&ArgumentSpec<'a>> {
        self.arguments
            .iter()
            .find(|spec| spec.option_strings().any(|s| s == option))
    }

    /// Parses `tokens` (program name already removed) into the bound
    /// destinations.
    ///
    /// On error no destination is modified.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<ParseOutcome> {
        let tokens: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
        engine::parse(self, &tokens)
    }

    /// Parses the process arguments, skipping the program name.
    pub fn parse_env(&mut self) -> Result<ParseOutcome> {
        let tokens: Vec<String> = std::env::args().skip(1).collect();
        self.parse(tokens.as_slice())
    }

    /// Read-only snapshot of the registry for formatters and export.
    pub fn describe(&self) -> ParserDescription {
        ParserDescription {
            prog: self.prog.clone(),
            description: self.description.clone(),
            epilog: self.epilog.clone(),
            version: self.version.clone(),
            groups: self
                .groups
                .iter()
                .map(|group| GroupDescription {
                    label: group.label.clone(),
                    epilog: group.epilog.clone(),
                    arguments: group
                        .arguments
                        .iter()
                        .map(|id| ArgumentInfo::from_spec(&self.arguments[id.0]))
                        .collect(),
                })
                .collect(),
        }
    }

    /// Renders the one-line usage summary with the configured formatter.
    pub fn format_usage(&self) -> String {
        self.formatter.format_usage(&self.describe())
    }

    /// Renders the full help text with the configured formatter.
    pub fn format_help(&self) -> String {
        self.formatter.format_help(&self.describe())
    }

    fn is_registered(&self, name: &str) -> bool {
        self.arguments.iter().any(|spec| {
            spec.long_option() == name || spec.short_option() == Some(name)
        })
    }

    fn group_entry_mut(&mut self, id: GroupId) -> Result<&mut ArgumentGroup> {
        self.groups.get_mut(id.0).ok_or_else(|| {
            ArgParseError::MalformedSpec(format!("unknown argument group #{}", id.0))
        })
    }
}

impl fmt::Debug for Parser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("prog", &self.prog)
            .field("description", &self.description)
            .field("epilog", &self.epilog)
            .field("version", &self.version)
            .field("groups", &self.groups)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}
