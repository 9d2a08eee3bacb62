//! Caller-owned destinations and their provenance.
//!
//! An [`ArgValue<T>`] is the variable an argument writes into. It reads like
//! a plain `T` (through [`Deref`]) and additionally records how its value
//! was obtained ([`Provenance`]) and which group/argument produced it.
//! Only the parsing engine writes to it, so the provenance can be trusted
//! by downstream code ("did the user ask for this, or is it a default?").
//!
//! [`Destination`] describes how a destination type absorbs each
//! [`Action`]: scalars overwrite, `Vec<U>` extends, `bool` takes flags,
//! integers count.

use std::fmt;
use std::ops::Deref;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// How a destination's current value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Never written; the value is `T::default()`.
    #[default]
    Unspecified,
    /// Written from the argument's declared default.
    Default,
    /// Written from tokens on the command line.
    Specified,
    /// Implied by the action (e.g. `false` for an unset `StoreTrue` flag).
    Inferred,
}

/// A destination value plus its provenance and origin.
///
/// # Examples
///
/// ```
/// use argbind_core::{ArgValue, Parser, Provenance};
///
/// let mut verbose = ArgValue::<bool>::new();
/// let mut parser = Parser::new("tool");
/// parser
///     .add_argument(&mut verbose, ("--verbose", "-v"))
///     .unwrap()
///     .action(argbind_core::Action::StoreTrue)
///     .unwrap();
/// parser.parse(&["-v"]).unwrap();
/// drop(parser);
///
/// assert!(*verbose);
/// assert_eq!(verbose.provenance(), Provenance::Specified);
/// assert_eq!(verbose.name(), "--verbose");
/// assert_eq!(verbose.group(), "arguments");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgValue<T> {
    value: T,
    provenance: Provenance,
    group: String,
    name: String,
}

impl<T: Default> ArgValue<T> {
    /// Creates an unwritten cell holding `T::default()`.
    pub fn new() -> Self {
        Self {
            value: T::default(),
            provenance: Provenance::Unspecified,
            group: String::new(),
            name: String::new(),
        }
    }
}

impl<T> ArgValue<T> {
    /// Borrows the current value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the cell and returns the value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// How the current value was obtained.
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Whether the value came from the command line.
    pub fn is_specified(&self) -> bool {
        self.provenance == Provenance::Specified
    }

    /// Label of the argument group that wrote this value (empty if never written).
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Display name of the argument that wrote this value (empty if never written).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set(&mut self, value: T, provenance: Provenance) {
        self.value = value;
        self.provenance = provenance;
    }

    pub(crate) fn set_origin(&mut self, group: &str, name: &str) {
        if self.group != group {
            self.group = group.to_string();
        }
        if self.name != name {
            self.name = name.to_string();
        }
    }
}

impl<T> Deref for ArgValue<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> AsRef<T> for ArgValue<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T: fmt::Display> fmt::Display for ArgValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// How a destination type absorbs matched arguments.
///
/// `Item` is the type the argument's [`Converter`](crate::Converter)
/// produces from one token. Only [`store`](Destination::store) is
/// required; the remaining operations are reachable only for actions
/// listed by [`supports`](Destination::supports), which is checked when
/// the action is set.
pub trait Destination: Default + Clone {
    type Item;

    /// Overwrite with converted tokens (`Store`). Scalars keep the last item.
    fn store(&mut self, items: Vec<Self::Item>);

    /// Extend with converted tokens (`Append`).
    fn append(&mut self, items: Vec<Self::Item>) {
        self.store(items);
    }

    /// Write a boolean flag (`StoreTrue`, `StoreFalse`, `Help`, `Version`).
    fn flag(&mut self, _on: bool) {}

    /// Add one (`Count`).
    fn increment(&mut self) {}

    /// Actions this destination can absorb.
    fn supports(action: Action) -> bool {
        action == Action::Store
    }
}

macro_rules! scalar_destination {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Destination for $ty {
                type Item = $ty;

                fn store(&mut self, items: Vec<$ty>) {
                    if let Some(last) = items.into_iter().last() {
                        *self = last;
                    }
                }
            }
        )*
    };
}

macro_rules! counting_destination {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Destination for $ty {
                type Item = $ty;

                fn store(&mut self, items: Vec<$ty>) {
                    if let Some(last) = items.into_iter().last() {
                        *self = last;
                    }
                }

                fn increment(&mut self) {
                    *self = self.saturating_add(1);
                }

                fn supports(action: Action) -> bool {
                    matches!(action, Action::Store | Action::Count)
                }
            }
        )*
    };
}

scalar_destination!(f32, f64, char, String, PathBuf);
counting_destination!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Destination for bool {
    type Item = bool;

    fn store(&mut self, items: Vec<bool>) {
        if let Some(last) = items.into_iter().last() {
            *self = last;
        }
    }

    fn flag(&mut self, on: bool) {
        *self = on;
    }

    fn supports(action: Action) -> bool {
        matches!(
            action,
            Action::Store | Action::StoreTrue | Action::StoreFalse | Action::Help | Action::Version
        )
    }
}

impl<U: Clone> Destination for Vec<U> {
    type Item = U;

    /// Replaces the whole sequence.
    fn store(&mut self, items: Vec<U>) {
        *self = items;
    }

    fn append(&mut self, items: Vec<U>) {
        self.extend(items);
    }

    fn supports(action: Action) -> bool {
        matches!(action, Action::Store | Action::Append)
    }
}

impl<U: Clone> Destination for Option<U> {
    type Item = U;

    fn store(&mut self, items: Vec<U>) {
        if let Some(last) = items.into_iter().last() {
            *self = Some(last);
        }
    }
}
