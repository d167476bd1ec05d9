//! Configuration management for the CLI.
//!
//! One TOML file holds both the scoring configuration (`[propagation]`,
//! `[dedup]`, `[corroboration]`) and the CLI's own `[settings]` table.

use crate::error::{CliError, Result};
use reasonrank_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLI configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Display settings
    pub settings: Settings,

    /// Scoring configuration
    pub engine: EngineConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsSection {
    #[serde(default)]
    settings: Settings,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".reasonrank").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used
    /// when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => {
                let default = Self::default_path()?;
                if !default.exists() {
                    debug!("No configuration file; using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        debug!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(&path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let section: SettingsSection = toml::from_str(contents)?;
        let engine = EngineConfig::from_toml_str(contents)?;
        Ok(Self {
            settings: section.settings,
            engine,
        })
    }

    /// Render the full configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        let engine = self.engine.to_toml_string()?;
        let settings = toml::to_string_pretty(&SettingsSection {
            settings: self.settings.clone(),
        })
        .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        Ok(format!("{}\n{}", engine.trim_end(), settings))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.engine.propagation.damping, 0.15);
    }

    #[test]
    fn test_sections_share_one_file() {
        let config = Config::from_toml_str(
            r#"
            [settings]
            format = "json"
            color = false

            [propagation]
            damping = 0.3

            [dedup]
            cluster_threshold = 0.8
            "#,
        )
        .unwrap();

        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(!config.settings.color);
        assert_eq!(config.engine.propagation.damping, 0.3);
        assert_eq!(config.engine.dedup.cluster_threshold, 0.8);
    }

    #[test]
    fn test_round_trip() {
        let mut config = Config::default();
        config.settings.format = OutputFormat::Quiet;
        config.engine.propagation.confidence_z = 2.58;

        let text = config.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();
        assert_eq!(parsed.settings.format, OutputFormat::Quiet);
        assert_eq!(parsed.engine.propagation.confidence_z, 2.58);
    }

    #[test]
    fn test_invalid_engine_section() {
        let result = Config::from_toml_str("[propagation]\ndamping = 4.0\n");
        assert!(matches!(result, Err(CliError::Engine(_))));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings]\nformat = \"quiet\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.settings.format, OutputFormat::Quiet);

        let missing = Config::load(Some(Path::new("/nonexistent/reasonrank.toml")));
        assert!(matches!(missing, Err(CliError::Io(_))));
    }
}
