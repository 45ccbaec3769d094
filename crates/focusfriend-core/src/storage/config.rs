//! TOML-based application configuration.
//!
//! Stores planner preferences:
//! - Reference time zone that settings hours are expressed in
//! - Break and focus duration limits
//! - Whether planned blocks are written to the calendar
//!
//! Configuration is stored at `~/.config/focusfriend/config.toml`.
//! The workday and break-window hours live in the settings store instead.

use std::path::{Path, PathBuf};

use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::scheduler::{
    PlannerConfig, DEFAULT_BREAK_MAX_MINUTES, DEFAULT_BREAK_MIN_MINUTES, DEFAULT_FOCUS_MIN_MINUTES,
};

/// Planning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// IANA name of the reference time zone
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_break_min_minutes")]
    pub break_min_minutes: u32,
    #[serde(default = "default_break_max_minutes")]
    pub break_max_minutes: u32,
    #[serde(default = "default_focus_min_minutes")]
    pub focus_min_minutes: u32,
}

/// Calendar write configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Plan and log only; never delete or create calendar entries.
    #[serde(default)]
    pub dry_run: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusfriend/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planning: PlanningConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

// Default functions
fn default_timezone() -> String {
    "America/New_York".into()
}
fn default_break_min_minutes() -> u32 {
    DEFAULT_BREAK_MIN_MINUTES
}
fn default_break_max_minutes() -> u32 {
    DEFAULT_BREAK_MAX_MINUTES
}
fn default_focus_min_minutes() -> u32 {
    DEFAULT_FOCUS_MIN_MINUTES
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            break_min_minutes: default_break_min_minutes(),
            break_max_minutes: default_break_max_minutes(),
            focus_min_minutes: default_focus_min_minutes(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        if key.is_empty() {
            return Err(unknown());
        }

        let mut parts = key.split('.').peekable();

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from the default location, writing defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default configuration: {}", e);
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. The result is validated
    /// before it replaces `self`; call [`Config::save`] to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting planner configuration is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.planner_config()?;
        *self = updated;
        Ok(())
    }

    /// Parse the reference time zone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.planning
            .timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "planning.timezone".to_string(),
                message: e.to_string(),
            })
    }

    /// Build and validate the planner configuration.
    pub fn planner_config(&self) -> Result<PlannerConfig, ConfigError> {
        let config = PlannerConfig {
            break_min: Duration::minutes(self.planning.break_min_minutes.into()),
            break_max: Duration::minutes(self.planning.break_max_minutes.into()),
            focus_min: Duration::minutes(self.planning.focus_min_minutes.into()),
            timezone: self.timezone()?,
        };
        config.validate().map_err(|e| ConfigError::InvalidValue {
            key: "planning".to_string(),
            message: e.to_string(),
        })?;
        Ok(config)
    }
}
