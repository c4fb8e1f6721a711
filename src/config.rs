//! TOML configuration file support for power users.
//!
//! Instead of passing the same flags on every invocation, defaults can be
//! specified in a config file:
//!
//! ```toml
//! # speccube.toml
//! [spectrum]
//! normalize = true
//! drop_sentinel = -1.23e34
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure for speccube.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Spectrum extraction defaults.
    #[serde(default)]
    pub spectrum: SpectrumConfig,
}

/// Defaults for the spectrum command.
#[derive(Debug, Default, Deserialize)]
pub struct SpectrumConfig {
    /// Min-max normalize extracted curves.
    pub normalize: Option<bool>,

    /// Drop samples equal to this no-data marker.
    pub drop_sentinel: Option<f64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [spectrum]
            normalize = true
            drop_sentinel = -1.23e34
        "#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.spectrum.normalize, Some(true));
        assert_eq!(config.spectrum.drop_sentinel, Some(-1.23e34));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [spectrum]
            normalize = false
        "#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.spectrum.normalize, Some(false));
        assert_eq!(config.spectrum.drop_sentinel, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.spectrum.normalize, None);
    }
}
