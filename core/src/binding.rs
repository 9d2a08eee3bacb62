//! Type-erased link between an argument and its destination.
//!
//! Each registered argument owns a `Box<dyn Binding>` wrapping the caller's
//! `&mut ArgValue<T>` together with its converter. During a parse all
//! writes go to a staged copy; the destination itself is only touched by
//! [`Binding::commit`], which the engine calls once the whole token stream
//! has been accepted.

use crate::action::Action;
use crate::convert::{ConversionError, Converter};
use crate::value::{ArgValue, Destination, Provenance};

pub(crate) trait Binding {
    /// Converts `text` and returns its canonical form, without staging
    /// anything.
    fn canonicalize(&self, text: &str) -> Result<String, ConversionError>;

    fn default_choices(&self) -> Vec<String>;

    fn supports(&self, action: Action) -> bool;

    /// Resets the staged value to `T::default()` / `Unspecified`.
    fn begin(&mut self);

    /// Stages the declared default.
    fn seed(&mut self, text: &str, choices: &[String]) -> Result<(), ConversionError>;

    /// Stages the value an action implies when nothing else was given.
    fn infer(&mut self, action: Action);

    /// Stages the effect of one matched occurrence. Every token is converted
    /// before anything is written.
    fn apply(
        &mut self,
        action: Action,
        tokens: &[&str],
        choices: &[String],
    ) -> Result<(), ConversionError>;

    fn staged_provenance(&self) -> Provenance;

    /// Writes the staged value into the destination.
    fn commit(&mut self, group: &str, name: &str);

    /// Drops the staged value, leaving the destination as it was.
    fn rollback(&mut self);
}

pub(crate) struct Bound<'a, T, C> {
    dest: &'a mut ArgValue<T>,
    converter: C,
    staged: Option<(T, Provenance)>,
}

impl<'a, T, C> Bound<'a, T, C>
where
    T: Destination,
    C: Converter<T::Item>,
{
    pub(crate) fn new(dest: &'a mut ArgValue<T>, converter: C) -> Self {
        Self {
            dest,
            converter,
            staged: None,
        }
    }

    fn staged_mut(&mut self) -> &mut (T, Provenance) {
        self.staged
            .get_or_insert_with(|| (T::default(), Provenance::Unspecified))
    }

    fn convert_all(
        &self,
        tokens: &[&str],
        choices: &[String],
    ) -> Result<Vec<T::Item>, ConversionError> {
        tokens
            .iter()
            .map(|token| {
                let item = self.converter.from_str(token)?;
                if !choices.is_empty() {
                    let canonical = self.converter.to_str(&item);
                    if !choices.iter().any(|c| *c == canonical) {
                        return Err(ConversionError::invalid_choice(token, choices));
                    }
                }
                Ok(item)
            })
            .collect()
    }
}

impl<'a, T, C> Binding for Bound<'a, T, C>
where
    T: Destination,
    C: Converter<T::Item>,
{
    fn canonicalize(&self, text: &str) -> Result<String, ConversionError> {
        let item = self.converter.from_str(text)?;
        Ok(self.converter.to_str(&item))
    }

    fn default_choices(&self) -> Vec<String> {
        self.converter.default_choices()
    }

    fn supports(&self, action: Action) -> bool {
        T::supports(action)
    }

    fn begin(&mut self) {
        self.staged = Some((T::default(), Provenance::Unspecified));
    }

    fn seed(&mut self, text: &str, choices: &[String]) -> Result<(), ConversionError> {
        let items = self.convert_all(&[text], choices)?;
        let (value, provenance) = self.staged_mut();
        value.store(items);
        *provenance = Provenance::Default;
        Ok(())
    }

    fn infer(&mut self, action: Action) {
        let (value, provenance) = self.staged_mut();
        match action {
            Action::StoreTrue => value.flag(false),
            Action::StoreFalse => value.flag(true),
            Action::Count => {}
            _ => return,
        }
        *provenance = Provenance::Inferred;
    }

    fn apply(
        &mut self,
        action: Action,
        tokens: &[&str],
        choices: &[String],
    ) -> Result<(), ConversionError> {
        let items = if action.takes_values() {
            self.convert_all(tokens, choices)?
        } else {
            Vec::new()
        };

        let (value, provenance) = self.staged_mut();
        match action {
            Action::Store => value.store(items),
            Action::Append => {
                // The first explicit occurrence replaces a default sequence.
                if *provenance != Provenance::Specified {
                    *value = T::default();
                }
                value.append(items);
            }
            Action::StoreTrue | Action::Help | Action::Version => value.flag(true),
            Action::StoreFalse => value.flag(false),
            Action::Count => value.increment(),
        }
        *provenance = Provenance::Specified;
        Ok(())
    }

    fn staged_provenance(&self) -> Provenance {
        self.staged
            .as_ref()
            .map_or(Provenance::Unspecified, |(_, provenance)| *provenance)
    }

    fn commit(&mut self, group: &str, name: &str) {
        if let Some((value, provenance)) = self.staged.take() {
            self.dest.set(value, provenance);
            self.dest.set_origin(group, name);
        }
    }

    fn rollback(&mut self) {
        self.staged = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::DefaultConverter;

    #[test]
    fn test_nothing_written_before_commit() {
        let mut dest = ArgValue::<i32>::new();
        {
            let mut binding = Bound::new(&mut dest, DefaultConverter);
            binding.begin();
            binding.apply(Action::Store, &["7"], &[]).unwrap();
            assert_eq!(binding.staged_provenance(), Provenance::Specified);
            binding.rollback();
        }
        assert_eq!(*dest, 0);
        assert_eq!(dest.provenance(), Provenance::Unspecified);
    }

    #[test]
    fn test_commit_writes_value_and_origin() {
        let mut dest = ArgValue::<i32>::new();
        {
            let mut binding = Bound::new(&mut dest, DefaultConverter);
            binding.begin();
            binding.seed("3", &[]).unwrap();
            binding.commit("arguments", "--level");
        }
        assert_eq!(*dest, 3);
        assert_eq!(dest.provenance(), Provenance::Default);
        assert_eq!(dest.group(), "arguments");
        assert_eq!(dest.name(), "--level");
    }

    #[test]
    fn test_failed_conversion_stages_nothing() {
        let mut dest = ArgValue::<Vec<u32>>::new();
        let mut binding = Bound::new(&mut dest, DefaultConverter);
        binding.begin();
        binding.apply(Action::Append, &["1"], &[]).unwrap();

        let err = binding.apply(Action::Append, &["2", "x"], &[]).unwrap_err();
        assert!(err.message().contains("invalid u32 value 'x'"));
        assert_eq!(binding.staged.as_ref().map(|(v, _)| v.clone()), Some(vec![1]));
    }

    #[test]
    fn test_choices_compare_canonical_form() {
        let mut dest = ArgValue::<bool>::new();
        let mut binding = Bound::new(&mut dest, DefaultConverter);
        let choices = vec!["true".to_string(), "false".to_string()];
        binding.begin();
        binding.apply(Action::Store, &["1"], &choices).unwrap();

        let only_true = vec!["true".to_string()];
        let err = binding.apply(Action::Store, &["0"], &only_true).unwrap_err();
        assert!(err.message().contains("invalid choice '0'"));
    }

    #[test]
    fn test_canonicalize() {
        let mut ratio = ArgValue::<f64>::new();
        let binding = Bound::new(&mut ratio, DefaultConverter);
        assert_eq!(binding.canonicalize("1.0").unwrap(), "1");
        assert!(binding.canonicalize("one").is_err());

        let mut flag = ArgValue::<bool>::new();
        let binding = Bound::new(&mut flag, DefaultConverter);
        assert_eq!(binding.canonicalize("1").unwrap(), "true");
    }

    #[test]
    fn test_append_replaces_default_then_extends() {
        let mut dest = ArgValue::<Vec<String>>::new();
        {
            let mut binding = Bound::new(&mut dest, DefaultConverter);
            binding.begin();
            binding.seed("base", &[]).unwrap();
            binding.apply(Action::Append, &["a"], &[]).unwrap();
            binding.apply(Action::Append, &["b", "c"], &[]).unwrap();
            binding.commit("arguments", "--item");
        }
        assert_eq!(*dest, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_infer_flags() {
        let mut dest = ArgValue::<bool>::new();
        {
            let mut binding = Bound::new(&mut dest, DefaultConverter);
            binding.begin();
            binding.infer(Action::StoreFalse);
            binding.commit("arguments", "--no-color");
        }
        assert!(*dest);
        assert_eq!(dest.provenance(), Provenance::Inferred);
    }
}
