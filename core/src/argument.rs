//! Declarative argument specifications.
//!
//! An [`ArgumentSpec`] is created by [`Parser::add_argument`](crate::Parser::add_argument)
//! and then refined with chained mutators:
//!
//! ```
//! use argbind_core::{Action, ArgValue, Parser};
//!
//! let mut level = ArgValue::<u8>::new();
//! let mut parser = Parser::new("tool");
//! parser
//!     .add_argument(&mut level, ("--level", "-l"))?
//!     .help("Verbosity level")
//!     .default_value("1")
//!     .choices(["0", "1", "2"])?;
//!
//! let spec = parser.find_option("-l").unwrap();
//! assert_eq!(spec.get_metavar(), "LEVEL");
//! assert_eq!(spec.get_action(), Action::Store);
//! # Ok::<(), argbind_core::ArgParseError>(())
//! ```

use std::fmt;

use tracing::trace;

use crate::action::{Action, Nargs};
use crate::binding::Binding;
use crate::error::{ArgParseError, Result};
use crate::parser::{ArgId, GroupId};

/// Names an argument is registered under.
///
/// Implemented for a single name (`"--verbose"`, `"-v"`, `"file"`) and for a
/// `(long, short)` pair (`("--verbose", "-v")`).
pub trait OptionNames {
    fn into_names(self) -> (String, Option<String>);
}

impl OptionNames for &str {
    fn into_names(self) -> (String, Option<String>) {
        (self.to_string(), None)
    }
}

impl OptionNames for String {
    fn into_names(self) -> (String, Option<String>) {
        (self, None)
    }
}

impl OptionNames for (&str, &str) {
    fn into_names(self) -> (String, Option<String>) {
        (self.0.to_string(), Some(self.1.to_string()))
    }
}

impl OptionNames for [&str; 2] {
    fn into_names(self) -> (String, Option<String>) {
        let [long, short] = self;
        (long.to_string(), Some(short.to_string()))
    }
}

/// Splits `name` into its leading dashes and the remainder.
pub(crate) fn split_leading_dashes(name: &str) -> (usize, &str) {
    let rest = name.trim_start_matches('-');
    (name.len() - rest.len(), rest)
}

/// Validates a `(long, short)` pair and returns the bare destination name.
///
/// A short name is optional; when given the long name must have two dashes
/// and the short name must be exactly `-x`.
pub(crate) fn validate_names(long: &str, short: Option<&str>) -> Result<String> {
    if long.is_empty() {
        return Err(ArgParseError::MalformedSpec(
            "argument name must be at least one character long".to_string(),
        ));
    }

    let (dashes, bare) = split_leading_dashes(long);
    if dashes > 2 {
        return Err(ArgParseError::MalformedSpec(format!(
            "more than two dashes in argument name '{long}'"
        )));
    }
    if bare.is_empty() {
        return Err(ArgParseError::MalformedSpec(format!(
            "argument name '{long}' has no characters after its dashes"
        )));
    }
    if dashes == 1 && bare.chars().count() != 1 {
        return Err(ArgParseError::MalformedSpec(format!(
            "single-dash option '{long}' must be exactly one character"
        )));
    }

    if let Some(short) = short.filter(|s| !s.is_empty()) {
        match dashes {
            0 => {
                return Err(ArgParseError::MalformedSpec(format!(
                    "positional argument '{long}' cannot have a short option '{short}'"
                )));
            }
            1 => {
                return Err(ArgParseError::MalformedSpec(format!(
                    "long option must be specified before short option ('{long}' is already short)"
                )));
            }
            _ => {}
        }
        let (short_dashes, short_bare) = split_leading_dashes(short);
        if short_dashes != 1 || short_bare.chars().count() != 1 {
            return Err(ArgParseError::MalformedSpec(format!(
                "short option '{short}' must be a single dash followed by one character"
            )));
        }
    }

    Ok(bare.to_string())
}

/// One argument's declarative descriptor.
///
/// Identity (long and short names) is fixed at registration; everything else
/// may be adjusted through the chained mutators. Positional-ness is derived:
/// an argument is positional iff its long name has no leading dash.
pub struct ArgumentSpec<'a> {
    id: ArgId,
    group: GroupId,
    long: String,
    short: Option<String>,
    dest: String,
    help: String,
    metavar: String,
    nargs: Nargs,
    action: Action,
    choices: Vec<String>,
    explicit_choices: bool,
    required: bool,
    default_value: Option<String>,
    show_in_usage: bool,
    binding: Box<dyn Binding + 'a>,
}

impl<'a> ArgumentSpec<'a> {
    pub(crate) fn new(
        id: ArgId,
        group: GroupId,
        long: String,
        short: Option<String>,
        binding: Box<dyn Binding + 'a>,
    ) -> Result<Self> {
        let short = short.filter(|s| !s.is_empty());
        let dest = validate_names(&long, short.as_deref())?;
        let metavar = dest.to_uppercase();
        let choices = binding.default_choices();

        Ok(Self {
            id,
            group,
            long,
            short,
            dest,
            help: String::new(),
            metavar,
            nargs: Nargs::One,
            action: Action::Store,
            choices,
            explicit_choices: false,
            required: false,
            default_value: None,
            show_in_usage: true,
            binding,
        })
    }

    /// Sets the help text.
    pub fn help(&mut self, help: impl Into<String>) -> &mut Self {
        self.help = help.into();
        self
    }

    /// Sets the placeholder shown for the argument's values.
    pub fn metavar(&mut self, metavar: impl Into<String>) -> &mut Self {
        self.metavar = metavar.into();
        self
    }

    /// Restricts accepted values. Each choice must convert with the
    /// argument's converter and is stored in its canonical form, so `"1.0"`
    /// for an `f64` destination is kept as `"1"`.
    ///
    /// # Errors
    ///
    /// [`ArgParseError::MalformedSpec`] if a choice fails conversion.
    pub fn choices<I, S>(&mut self, choices: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut canonical: Vec<String> = Vec::new();
        for choice in choices {
            let choice = choice.into();
            let text = self.binding.canonicalize(&choice).map_err(|e| {
                ArgParseError::MalformedSpec(format!(
                    "choice '{choice}' for {} is invalid: {e}",
                    self.display_name()
                ))
            })?;
            if !canonical.contains(&text) {
                canonical.push(text);
            }
        }
        self.choices = canonical;
        self.explicit_choices = true;
        Ok(self)
    }

    /// Sets the action and forces the matching nargs. Positionals always
    /// keep nargs `'1'`.
    ///
    /// # Errors
    ///
    /// [`ArgParseError::MalformedSpec`] if the destination type cannot absorb
    /// `action`, or if a positional argument is given a flag-style action.
    pub fn action(&mut self, action: Action) -> Result<&mut Self> {
        if self.is_positional() && !action.takes_values() {
            return Err(ArgParseError::MalformedSpec(format!(
                "positional argument '{}' cannot use action {action}",
                self.long
            )));
        }
        if !self.binding.supports(action) {
            return Err(ArgParseError::MalformedSpec(format!(
                "action {action} is not supported by the destination of {}",
                self.display_name()
            )));
        }
        self.action = action;
        self.nargs = if self.is_positional() {
            Nargs::One
        } else {
            action.default_nargs()
        };
        trace!(argument = %self.display_name(), %action, nargs = %self.nargs, "Set action");
        Ok(self)
    }

    /// Overrides the arity.
    ///
    /// # Errors
    ///
    /// [`ArgParseError::ActionNargsMismatch`] if `nargs` is not allowed for
    /// the current action, or if anything but `'1'` is requested for a
    /// positional argument.
    pub fn nargs(&mut self, nargs: Nargs) -> Result<&mut Self> {
        if self.is_positional() {
            if nargs != Nargs::One {
                return Err(ArgParseError::ActionNargsMismatch(format!(
                    "positional argument '{}' consumes exactly one token (nargs '{nargs}' given)",
                    self.long
                )));
            }
            return Ok(self);
        }
        if !self.action.allows(nargs) {
            return Err(ArgParseError::ActionNargsMismatch(format!(
                "nargs '{nargs}' is not allowed with action {} for {}",
                self.action,
                self.display_name()
            )));
        }
        self.nargs = nargs;
        Ok(self)
    }

    /// Marks an option as required. Positional arguments are always required.
    pub fn required(&mut self, required: bool) -> &mut Self {
        self.required = required;
        self
    }

    /// Sets the textual default, converted at the start of every parse.
    pub fn default_value(&mut self, value: impl Into<String>) -> &mut Self {
        self.default_value = Some(value.into());
        self
    }

    /// Whether the argument appears in the one-line usage summary.
    pub fn show_in_usage(&mut self, show: bool) -> &mut Self {
        self.show_in_usage = show;
        self
    }
}

impl<'a> ArgumentSpec<'a> {
    /// Handle of this argument inside its parser.
    pub fn id(&self) -> ArgId {
        self.id
    }

    /// Group the argument was registered in.
    pub fn group_id(&self) -> GroupId {
        self.group
    }

    /// Long option as registered (`--level`), or the positional name.
    pub fn long_option(&self) -> &str {
        &self.long
    }

    /// Short option (`-l`), if any.
    pub fn short_option(&self) -> Option<&str> {
        self.short.as_deref()
    }

    /// Name with its dashes stripped.
    pub fn dest(&self) -> &str {
        &self.dest
    }

    /// Help text; empty if none was set.
    pub fn get_help(&self) -> &str {
        &self.help
    }

    /// Value placeholder; defaults to the uppercased destination name.
    pub fn get_metavar(&self) -> &str {
        &self.metavar
    }

    /// Current arity.
    pub fn get_nargs(&self) -> Nargs {
        self.nargs
    }

    /// Current action.
    pub fn get_action(&self) -> Action {
        self.action
    }

    /// Permitted values in canonical form; empty means unrestricted.
    pub fn get_choices(&self) -> &[String] {
        &self.choices
    }

    /// Whether the choices were set by the caller rather than taken from the
    /// converter.
    pub fn has_explicit_choices(&self) -> bool {
        self.explicit_choices
    }

    /// Whether the argument must be given. Always true for positionals.
    pub fn is_required(&self) -> bool {
        self.required || self.is_positional()
    }

    /// Textual default, converted at the start of every parse.
    pub fn get_default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Whether the argument is listed in the usage summary.
    pub fn is_shown_in_usage(&self) -> bool {
        self.show_in_usage
    }

    /// True when the long name has no leading dash.
    pub fn is_positional(&self) -> bool {
        !self.long.starts_with('-')
    }

    /// Every string that triggers this argument on the command line.
    pub fn option_strings(&self) -> impl Iterator<Item = &str> {
        let long = (!self.is_positional()).then_some(self.long.as_str());
        long.into_iter().chain(self.short.as_deref())
    }

    /// Long option, or the bare name of a positional. Used in messages.
    pub fn display_name(&self) -> &str {
        &self.long
    }

    pub(crate) fn binding(&self) -> &dyn Binding {
        self.binding.as_ref()
    }

    pub(crate) fn binding_mut(&mut self) -> &mut (dyn Binding + 'a) {
        self.binding.as_mut()
    }
}

impl fmt::Debug for ArgumentSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentSpec")
            .field("id", &self.id)
            .field("long", &self.long)
            .field("short", &self.short)
            .field("action", &self.action)
            .field("nargs", &self.nargs)
            .field("choices", &self.choices)
            .field("required", &self.required)
            .field("default_value", &self.default_value)
            .finish_non_exhaustive()
    }
}
