//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `--config <path>`, else `$XDG_CONFIG_HOME/courseplan/courseplan.toml`
//! 3. Environment variables: `COURSEPLAN_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_DELIMITER;

/// Unified configuration for courseplan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Catalog loaded when no file is given on the command line
    pub catalog_file: Option<PathBuf>,
    /// Field delimiter in catalog files
    pub delimiter: char,
    /// Print warnings for prerequisites missing from the catalog
    pub warn_undefined_prerequisites: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_file: None,
            delimiter: DEFAULT_DELIMITER,
            warn_undefined_prerequisites: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, keep base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub catalog_file: Option<PathBuf>,
    pub delimiter: Option<char>,
    pub warn_undefined_prerequisites: Option<bool>,
}

/// Get the XDG config directory for courseplan.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "courseplan").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("courseplan.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a path; unexpandable input is returned unchanged.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            catalog_file: overlay
                .catalog_file
                .clone()
                .or_else(|| self.catalog_file.clone()),
            delimiter: overlay.delimiter.unwrap_or(self.delimiter),
            warn_undefined_prerequisites: overlay
                .warn_undefined_prerequisites
                .unwrap_or(self.warn_undefined_prerequisites),
        }
    }

    fn expand_paths(&mut self) {
        self.catalog_file = self.catalog_file.as_deref().map(expand_path);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; replaces the XDG location and must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        match config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        current = current.merge_with(&load_raw_settings(&global_path)?);
                    }
                }
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply COURSEPLAN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("COURSEPLAN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("catalog_file") {
            settings.catalog_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("delimiter") {
            settings.delimiter = parse_delimiter(&val)?;
        }
        if let Ok(val) = config.get_bool("warn_undefined_prerequisites") {
            settings.warn_undefined_prerequisites = val;
        }

        Ok(settings)
    }

    /// Serialize current settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }

    /// Commented template for a new config file.
    pub fn template() -> String {
        format!(
            r#"# courseplan configuration
# Location: {}

# Catalog loaded when no --file is given (supports ~ and $VAR)
# catalog_file = "~/courses/catalog.csv"

# Field delimiter in catalog files
delimiter = "{}"

# Warn when a prerequisite is not defined in the catalog
warn_undefined_prerequisites = true
"#,
            global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unknown>".into()),
            DEFAULT_DELIMITER
        )
    }
}

fn parse_delimiter(val: &str) -> Result<char, ApplicationError> {
    let mut chars = val.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ApplicationError::Config {
            message: format!("delimiter must be a single character, got {:?}", val),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_uses_comma_and_warns() {
        let settings = Settings::default();
        assert_eq!(settings.delimiter, ',');
        assert!(settings.warn_undefined_prerequisites);
        assert!(settings.catalog_file.is_none());
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let base = Settings::default();
        let overlay = RawSettings {
            delimiter: Some(';'),
            ..Default::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.delimiter, ';');
        assert!(merged.warn_undefined_prerequisites);
    }

    #[test]
    fn given_single_char_when_parsing_delimiter_then_accepts() {
        assert_eq!(parse_delimiter("\t").unwrap(), '\t');
    }

    #[test]
    fn given_multi_char_or_empty_when_parsing_delimiter_then_rejects() {
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn given_template_when_parsing_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(raw.delimiter, Some(','));
        assert_eq!(raw.warn_undefined_prerequisites, Some(true));
    }

    #[test]
    fn given_env_var_in_path_when_expanding_then_substitutes() {
        std::env::set_var("COURSEPLAN_TEST_DIR", "/data");
        let expanded = expand_path(Path::new("$COURSEPLAN_TEST_DIR/catalog.csv"));
        assert_eq!(expanded, PathBuf::from("/data/catalog.csv"));
    }
}
