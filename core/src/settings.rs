//! Framework settings.
//!
//! Settings are plain YAML. Every key is optional and falls back to its
//! default, so an empty file is a valid configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! help_command: help
//! normalize_program_name: true
//! usage_format: text
//! sort_flags: true
//! leaf_arguments: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::output::OutputFormat;

/// Behaviour knobs shared by every command of a tree.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{OutputFormat, Settings};
///
/// let settings: Settings = serde_yaml::from_str("usage_format: json").unwrap();
/// assert_eq!(settings.usage_format, OutputFormat::Json);
/// assert_eq!(settings.help_command, "help");
/// assert!(settings.normalize_program_name);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Positional token that stops resolution and shows usage.
    pub help_command: String,
    /// Reduce `argv[0]` to its file name before matching the root command.
    pub normalize_program_name: bool,
    /// Format used by the default usage function.
    pub usage_format: OutputFormat,
    /// Sort flag listings by name instead of definition order.
    pub sort_flags: bool,
    /// Let commands without subcommands take positional arguments instead of
    /// treating them as unknown subcommands. Without it, positional
    /// arguments reach a command only after `--`.
    pub leaf_arguments: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            help_command: "help".to_string(),
            normalize_program_name: true,
            usage_format: OutputFormat::Text,
            sort_flags: true,
            leaf_arguments: false,
        }
    }
}

impl Settings {
    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::CommandError::Io) if the file cannot be read,
    /// or [`Yaml`](crate::CommandError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let settings = serde_yaml::from_reader(reader)?;
        Ok(settings)
    }

    /// Saves the settings as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::CommandError::Io) if the file cannot be
    /// written, or [`Yaml`](crate::CommandError::Yaml) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
help_command: aide
normalize_program_name: false
usage_format: markdown
sort_flags: false
leaf_arguments: true
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.help_command, "aide");
        assert!(!settings.normalize_program_name);
        assert_eq!(settings.usage_format, OutputFormat::Markdown);
        assert!(!settings.sort_flags);
        assert!(settings.leaf_arguments);
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmdtree.yml");

        let settings = Settings {
            usage_format: OutputFormat::Yaml,
            ..Settings::default()
        };
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, crate::CommandError::Io(_)));
    }
}
