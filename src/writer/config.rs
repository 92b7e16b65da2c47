//! Configuration for SVG output

use serde::Deserialize;

/// Configuration options for SVG output
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Whether to format output with one element per line
    pub pretty_print: bool,

    /// Spaces per nesting level when pretty printing
    pub indent: usize,

    /// Whether to start with an XML declaration
    pub standalone: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            pretty_print: true,
            indent: 2,
            standalone: true,
        }
    }
}

impl WriterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set whether output is standalone
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WriterConfig::default();
        assert!(config.pretty_print);
        assert_eq!(config.indent, 2);
        assert!(config.standalone);
    }

    #[test]
    fn test_builder_pattern() {
        let config = WriterConfig::new()
            .with_pretty_print(false)
            .with_indent(4)
            .with_standalone(false);
        assert!(!config.pretty_print);
        assert_eq!(config.indent, 4);
        assert!(!config.standalone);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: WriterConfig = toml::from_str("indent = 4").unwrap();
        assert_eq!(config, WriterConfig::default().with_indent(4));
    }
}
