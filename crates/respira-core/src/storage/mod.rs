mod config;
pub mod database;

pub use config::{Config, SessionConfig, SoundConfig};
pub use database::{Database, SessionRecord};

use std::path::PathBuf;

/// Returns `~/.config/respira[-dev]/` based on RESPIRA_ENV.
///
/// Set RESPIRA_ENV=dev to use the development data directory.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RESPIRA_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("respira-dev")
    } else {
        base_dir.join("respira")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
