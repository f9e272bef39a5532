use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".refurnish";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const SESSION_FILE: &str = "session.json";

/// Returns the application-specific data directory, defaulting to `~/.refurnish`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("REFURNISH_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_dir_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    config_dir_in(base).join(CONFIG_FILE)
}

/// Where the logged-in user record is persisted between runs.
pub fn session_file_in(base: &Path) -> PathBuf {
    base.join(SESSION_FILE)
}
