//! Configuration and data directory locations
//!
//! Uses the directories crate for platform-appropriate locations:
//! - Linux: `~/.config/ironlist-e2e/`, `~/.local/share/ironlist-e2e/`
//! - macOS: `~/Library/Application Support/ironlist-e2e/`
//! - Windows: `%APPDATA%\ironlist-e2e\`

use std::path::PathBuf;

const APP_NAME: &str = "ironlist-e2e";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the log directory
pub fn log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().join("logs"))
}
