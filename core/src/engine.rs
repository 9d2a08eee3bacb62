//! The token-consuming parse state machine.
//!
//! A parse runs in five steps:
//!
//! 1. every binding resets its staged value and declared defaults are seeded
//!    (`Provenance::Default`); flag/count actions without a default get their
//!    implied value (`Provenance::Inferred`);
//! 2. an option-string lookup and a FIFO queue of positionals are built;
//! 3. tokens are scanned left to right, each one either matching an option
//!    (which may consume following value tokens) or filling the next
//!    positional;
//! 4. leftover positionals and unspecified `required` options are rejected;
//! 5. staged values are committed to the destinations.
//!
//! Any error before step 5 rolls every binding back, so destinations are
//! either fully updated or untouched. A `Help` or `Version` argument ends the
//! scan at step 3 and jumps to step 5 without validating.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace};

use crate::action::Action;
use crate::argument::ArgumentSpec;
use crate::error::{ArgParseError, Result};
use crate::parser::{ArgId, Parser};
use crate::value::Provenance;

/// Successful result of [`Parser::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// All tokens were consumed and every destination was written.
    Parsed,
    /// A `Help` argument was matched; carries the rendered help text.
    Help(String),
    /// A `Version` argument was matched; carries the version text.
    Version(String),
}

/// Whether `token` has option syntax: `-x`, or `--` followed by at least one
/// non-dash character. Three or more leading dashes never count.
pub fn looks_like_option(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('-'), Some(c), None) => c != '-',
        (Some('-'), Some('-'), Some(c)) => c != '-',
        _ => false,
    }
}

enum Step {
    Continue,
    ShortCircuit(Action),
}

pub(crate) fn parse(parser: &mut Parser<'_>, tokens: &[&str]) -> Result<ParseOutcome> {
    let outcome = run(parser, tokens);

    match &outcome {
        Ok(result) => {
            commit(parser);
            debug!(tokens = tokens.len(), outcome = ?result, "Parse finished");
        }
        Err(err) => {
            for spec in parser.arguments_mut() {
                spec.binding_mut().rollback();
            }
            debug!(kind = ?err.kind(), error = %err, "Parse failed");
        }
    }

    outcome
}

fn run(parser: &mut Parser<'_>, tokens: &[&str]) -> Result<ParseOutcome> {
    seed_defaults(parser.arguments_mut())?;

    let (lookup, mut positionals) = build_lookup(parser.arguments())?;

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];

        if let Some(&id) = lookup.get(token) {
            let (consumed, step) = apply_option(parser, id, &tokens[i + 1..])?;
            i += 1 + consumed;

            if let Step::ShortCircuit(action) = step {
                debug!(option = token, %action, "Short-circuiting parse");
                return Ok(match action {
                    Action::Version => ParseOutcome::Version(version_text(parser)),
                    _ => ParseOutcome::Help(parser.format_help()),
                });
            }
            continue;
        }

        let Some(id) = positionals.pop_front() else {
            return Err(ArgParseError::UnrecognizedToken(token.to_string()));
        };
        let spec = &mut parser.arguments_mut()[id.index()];
        trace!(positional = %spec.display_name(), value = token, "Matched positional");
        stage(spec, &[token])?;
        i += 1;
    }

    if let Some(id) = positionals.front() {
        let spec = &parser.arguments()[id.index()];
        return Err(ArgParseError::Arity(format!(
            "missing required positional argument: {}",
            spec.display_name()
        )));
    }

    for spec in parser.arguments() {
        if spec.is_required()
            && !spec.is_positional()
            && spec.binding().staged_provenance() != Provenance::Specified
        {
            return Err(ArgParseError::MissingRequired(spec.display_name().to_string()));
        }
    }

    Ok(ParseOutcome::Parsed)
}

fn seed_defaults(specs: &mut [ArgumentSpec<'_>]) -> Result<()> {
    for spec in specs.iter_mut() {
        let action = spec.get_action();
        let default = spec.get_default_value().map(str::to_string);
        let choices = spec.get_choices().to_vec();
        let name = spec.display_name().to_string();

        let binding = spec.binding_mut();
        binding.begin();
        match default {
            Some(text) => {
                binding.seed(&text, &choices).map_err(|e| {
                    ArgParseError::Conversion(format!("default for argument {name}: {e}"))
                })?;
                trace!(argument = %name, default = %text, "Seeded default");
            }
            None => binding.infer(action),
        }
    }
    Ok(())
}

fn build_lookup(specs: &[ArgumentSpec<'_>]) -> Result<(HashMap<String, ArgId>, VecDeque<ArgId>)> {
    let mut lookup = HashMap::new();
    let mut positionals = VecDeque::new();

    for spec in specs {
        if spec.is_positional() {
            positionals.push_back(spec.id());
            continue;
        }
        for option in spec.option_strings() {
            if lookup.insert(option.to_string(), spec.id()).is_some() {
                return Err(ArgParseError::DuplicateOption(format!(
                    "'{option}' is registered more than once"
                )));
            }
        }
    }

    Ok((lookup, positionals))
}

/// Applies one matched option. Returns how many value tokens after the
/// option were consumed.
fn apply_option(parser: &mut Parser<'_>, id: ArgId, rest: &[&str]) -> Result<(usize, Step)> {
    let spec = &mut parser.arguments_mut()[id.index()];
    let action = spec.get_action();

    if !action.takes_values() {
        stage(spec, &[])?;
        trace!(option = %spec.display_name(), %action, "Matched flag");
        let step = if action.short_circuits() {
            Step::ShortCircuit(action)
        } else {
            Step::Continue
        };
        return Ok((0, step));
    }

    let (min, max) = spec.get_nargs().bounds();
    let values: Vec<&str> = rest
        .iter()
        .copied()
        .take(max.unwrap_or(usize::MAX))
        .take_while(|token| !looks_like_option(token))
        .collect();

    if values.len() < min {
        return Err(ArgParseError::Arity(format!(
            "argument {}: expected {} value{}, got {}",
            spec.display_name(),
            if max.is_none() {
                format!("at least {min}")
            } else {
                min.to_string()
            },
            if min == 1 { "" } else { "s" },
            values.len()
        )));
    }

    trace!(option = %spec.display_name(), %action, values = ?values, "Matched option");
    stage(spec, &values)?;
    Ok((values.len(), Step::Continue))
}

fn stage(spec: &mut ArgumentSpec<'_>, values: &[&str]) -> Result<()> {
    let action = spec.get_action();
    let choices = spec.get_choices().to_vec();
    let name = spec.display_name().to_string();
    spec.binding_mut()
        .apply(action, values, &choices)
        .map_err(|e| ArgParseError::Conversion(format!("argument {name}: {e}")))
}

fn commit(parser: &mut Parser<'_>) {
    let labels: Vec<String> = parser
        .groups()
        .iter()
        .map(|group| group.label().to_string())
        .collect();

    for spec in parser.arguments_mut() {
        let group = labels
            .get(spec.group_id().index())
            .map(String::as_str)
            .unwrap_or_default();
        let name = spec.display_name().to_string();
        spec.binding_mut().commit(group, &name);
    }
}

fn version_text(parser: &Parser<'_>) -> String {
    match parser.version() {
        Some(version) => version.to_string(),
        None => parser.prog().to_string(),
    }
}
