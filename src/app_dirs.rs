//! Application directory helpers anchored to a single `.dropstage` folder.
//!
//! Config and log files live under the OS config root (e.g. `%APPDATA%` on
//! Windows); `DROPSTAGE_CONFIG_HOME` overrides the base for tests and
//! portable installs.

use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

/// Directory name created under the OS config root.
pub const APP_DIR_NAME: &str = ".dropstage";

/// Environment variable overriding the base config directory.
pub const CONFIG_HOME_ENV: &str = "DROPSTAGE_CONFIG_HOME";

/// Errors while resolving or preparing application directories.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// No suitable base config directory could be resolved.
    #[error("No suitable base config directory available for application files")]
    NoBaseDir,
    /// Failed to create an application directory.
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Root `.dropstage` directory, created on first use.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = config_base_dir().ok_or(AppDirError::NoBaseDir)?;
    ensure_dir(base.join(APP_DIR_NAME))
}

/// Logs directory inside the `.dropstage` root, created on first use.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join("logs"))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn config_base_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_HOME_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}
