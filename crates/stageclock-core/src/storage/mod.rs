mod config;
pub mod database;
pub mod sounds;

pub use config::{Config, TimerConfig};
pub use database::Database;
pub use sounds::SoundLibrary;

use std::path::PathBuf;

/// Returns `~/.config/stageclock[-dev]/` based on STAGECLOCK_ENV.
///
/// Set STAGECLOCK_ENV=dev to use the development data directory, or
/// STAGECLOCK_HOME to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("STAGECLOCK_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STAGECLOCK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("stageclock-dev")
            } else {
                base_dir.join("stageclock")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
