mod config;
pub mod database;

pub use config::{CalendarConfig, Config, PlanningConfig};
pub use database::{Database, EventRecord, EventStatus};

use std::path::PathBuf;

/// Returns `~/.config/focusfriend[-dev]/` based on FOCUSFRIEND_ENV.
///
/// Set FOCUSFRIEND_ENV=dev to use development data directory.
/// Set FOCUSFRIEND_HOME to replace `~/.config` as the base directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = match std::env::var_os("FOCUSFRIEND_HOME") {
        Some(home) => PathBuf::from(home),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config"),
    };

    let env = std::env::var("FOCUSFRIEND_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusfriend-dev")
    } else {
        base_dir.join("focusfriend")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
