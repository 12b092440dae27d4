mod config;
pub mod database;

pub use config::{Config, DisplayConfig, RoutineDefaults, TimerConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the data directory, creating it if needed.
///
/// `ROUTINELY_DATA_DIR` wins when set. Otherwise `~/.config/routinely`, or
/// `~/.config/routinely-dev` with `ROUTINELY_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("ROUTINELY_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .ok_or_else(|| ConfigError::DataDir("home directory not found".into()))?
                .join(".config");
            let env = std::env::var("ROUTINELY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("routinely-dev")
            } else {
                base_dir.join("routinely")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
