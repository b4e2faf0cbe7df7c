mod config;

pub use config::{Config, DashboardConfig, QuizConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the configuration directory, creating it if needed.
///
/// `PRUDENTIA_CONFIG_DIR` overrides the location. Otherwise this is
/// `~/.config/prudentia[-dev]/`, with the `-dev` suffix when
/// `PRUDENTIA_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PRUDENTIA_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("PRUDENTIA_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("prudentia-dev")
            } else {
                base_dir.join("prudentia")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::NoDataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
