//! Layout settings for [`DefaultFormatter`](crate::DefaultFormatter).
//!
//! Every field has a default, so a YAML file only needs the keys it changes.
//!
//! # Example YAML
//!
//! ```yaml
//! width: 100
//! indent: 2
//! help_position: 30
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Column layout used when rendering help text.
///
/// # Examples
///
/// ```
/// use argbind_core::FormatterConfig;
///
/// let config: FormatterConfig = serde_yaml::from_str("width: 60").unwrap();
/// assert_eq!(config.width, 60);
/// assert_eq!(config.help_position, 24);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Maximum line width before wrapping.
    pub width: usize,
    /// Spaces before each argument row.
    pub indent: usize,
    /// Column at which argument help text starts.
    pub help_position: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            width: 80,
            indent: 2,
            help_position: 24,
        }
    }
}

impl FormatterConfig {
    /// Loads a configuration from a YAML file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// [`YamlError`](ConfigError::YamlError) if parsing fails, or
    /// [`Invalid`](ConfigError::Invalid) if the layout is unusable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be
    /// written, or [`YamlError`](ConfigError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks that help text has room to the right of the help column.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::Invalid("width must be positive".to_string()));
        }
        if self.help_position >= self.width {
            return Err(ConfigError::Invalid(format!(
                "help_position ({}) must be less than width ({})",
                self.help_position, self.width
            )));
        }
        if self.indent >= self.help_position {
            return Err(ConfigError::Invalid(format!(
                "indent ({}) must be less than help_position ({})",
                self.indent, self.help_position
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormatterConfig::default();
        assert_eq!(config.width, 80);
        assert_eq!(config.indent, 2);
        assert_eq!(config.help_position, 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: FormatterConfig = serde_yaml::from_str("indent: 4\n").unwrap();
        assert_eq!(config.indent, 4);
        assert_eq!(config.width, 80);
    }

    #[test]
    fn test_validate_rejects_bad_layout() {
        let zero = FormatterConfig {
            width: 0,
            ..FormatterConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::Invalid(_))));

        let narrow = FormatterConfig {
            width: 20,
            ..FormatterConfig::default()
        };
        assert!(matches!(narrow.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formatter.yml");

        let original = FormatterConfig {
            width: 100,
            indent: 4,
            help_position: 30,
        };
        original.save(&path).unwrap();

        let loaded = FormatterConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FormatterConfig::load(dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_load_invalid_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formatter.yml");
        std::fs::write(&path, "width: 10\nhelp_position: 24\n").unwrap();

        let err = FormatterConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
