//! Settings file
//!
//! One TOML document with optional `[reader]`, `[writer]` and `[sampling]`
//! tables. Missing tables and keys keep their defaults.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::path::SampleConfig;
use crate::reader::ReaderConfig;
use crate::writer::WriterConfig;

/// Errors that can occur when loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub reader: ReaderConfig,
    pub writer: WriterConfig,
    pub sampling: SampleConfig,
}

impl Settings {
    /// Load settings from TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from TOML string
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_are_default() {
        let settings = Settings::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.reader.pixels_per_inch, 160.0);
        assert_eq!(settings.sampling.max_samples, 100);
    }

    #[test]
    fn test_partial_tables() {
        let settings = Settings::from_str(
            r#"
[reader]
pixels_per_inch = 96

[writer]
pretty_print = false

[sampling]
tolerance = 2.0
"#,
        )
        .unwrap();
        assert_eq!(settings.reader.pixels_per_inch, 96.0);
        assert!(!settings.writer.pretty_print);
        assert!(settings.writer.standalone);
        assert_eq!(settings.sampling.tolerance, 2.0);
        assert_eq!(settings.sampling.min_samples, 2);
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = Settings::from_str("this is not valid toml {{{{");
        assert!(matches!(result, Err(SettingsError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Settings::from_file(Path::new("/nonexistent/settings.toml"));
        assert!(matches!(result, Err(SettingsError::IoError(_))));
    }
}
