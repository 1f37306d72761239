//! TOML-based application configuration.
//!
//! Stores the active user profile, the default pattern for `breathe`, and
//! sound/session preferences. Stored at `~/.config/respira/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

/// Sound preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Seed value for the cue dispatcher's mute flag.
    #[serde(default)]
    pub muted: bool,
}

/// Session-run preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Host tick cadence for the run loop, in ticks per second.
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate_hz(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/respira/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// User id stamped onto session records.
    #[serde(default = "default_user")]
    pub user: String,
    /// Pattern id or name used when `breathe` is invoked without one.
    #[serde(default)]
    pub default_pattern: Option<String>,
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: default_user(),
            default_pattern: None,
            sound: SoundConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

fn default_user() -> String {
    "local".to_string()
}

fn default_tick_rate_hz() -> u32 {
    20
}

impl Config {
    pub fn path() -> std::io::Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().map_err(|e| ConfigError::SaveFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, text).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply a dotted-key assignment from the CLI.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "user" => self.user = value.to_string(),
            "default_pattern" => {
                self.default_pattern = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "sound.muted" => {
                self.sound.muted = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("expected true or false, got '{value}'"),
                })?;
            }
            "session.tick_rate_hz" => {
                let hz: u32 = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("expected a positive integer, got '{value}'"),
                })?;
                if hz == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: "tick rate must be at least 1".to_string(),
                    });
                }
                self.session.tick_rate_hz = hz;
            }
            other => {
                return Err(ConfigError::InvalidValue {
                    key: other.to_string(),
                    message: "unknown configuration key".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.user, "local");
        assert!(config.default_pattern.is_none());
        assert!(!config.sound.muted);
        assert_eq!(config.session.tick_rate_hz, 20);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set("user", "morning-person").unwrap();
        config.set("default_pattern", "box-4x4").unwrap();
        config.set("sound.muted", "true").unwrap();
        config.set("session.tick_rate_hz", "30").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.user, "morning-person");
        assert_eq!(loaded.default_pattern.as_deref(), Some("box-4x4"));
        assert!(loaded.sound.muted);
        assert_eq!(loaded.session.tick_rate_hz, 30);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.user, "local");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sound]\nmuted = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.sound.muted);
        assert_eq!(config.user, "local");
        assert_eq!(config.session.tick_rate_hz, 20);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = Config::default();
        assert!(config.set("sound.muted", "yes-please").is_err());
        assert!(config.set("session.tick_rate_hz", "0").is_err());
        assert!(config.set("no.such.key", "1").is_err());
    }
}
