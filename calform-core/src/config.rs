//! User configuration at ~/.config/calform/config.toml
//!
//! Only defaults live here. Items themselves are never persisted.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalFormError, CalFormResult};
use crate::export::ExportFormat;

static DEFAULT_OUTPUT_DIR: &str = ".";

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CalFormConfig {
    /// IANA time zone for new forms. Falls back to the system zone when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_name: Option<String>,

    /// Where exports are saved. `~` is expanded.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub default_format: ExportFormat,

    /// Alarm lead time pre-filled in new item subforms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_alarm_minutes: Option<u32>,
}

impl Default for CalFormConfig {
    fn default() -> Self {
        CalFormConfig {
            time_zone: None,
            calendar_name: None,
            output_dir: default_output_dir(),
            default_format: ExportFormat::default(),
            default_alarm_minutes: None,
        }
    }
}

impl CalFormConfig {
    pub fn config_path() -> CalFormResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalFormError::Config("Could not determine config directory".into()))?
            .join("calform");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user config, creating a commented default file on first run.
    pub fn load() -> CalFormResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file, with `CALFORM_*` environment variables on top.
    pub fn load_from(path: &Path) -> CalFormResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("CALFORM"))
            .build()
            .map_err(|e| CalFormError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalFormError::Config(e.to_string()))
    }

    pub fn output_dir(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.output_dir.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalFormResult<()> {
        let contents = format!(
            "\
# calform configuration

# Time zone applied to exported items (defaults to the system time zone):
# time_zone = \"Europe/Berlin\"

# Calendar name pre-filled in new forms:
# calendar_name = \"Personal\"

# Where exports are saved:
# output_dir = \"{}\"

# Export format used when none is given (ics, json, csv, text):
# default_format = \"ics\"

# Alarm pre-filled in new items, in minutes before the start:
# default_alarm_minutes = 15
",
            DEFAULT_OUTPUT_DIR
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalFormError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalFormError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
