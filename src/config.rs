//! Persisted application settings.
//!
//! A small TOML file under the `.dropstage` root: the upload endpoint and a
//! dark-mode flag. The staging core never reads these; the endpoint feeds
//! the transport and dark mode is consumed only by the renderer.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::app_dirs;

/// Filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Endpoint used when no configuration exists yet.
pub const DEFAULT_UPLOAD_URL: &str = "http://localhost:8000/image/";

/// Errors while loading or saving the settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The `.dropstage` directory could not be resolved or created.
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
    /// Reading the settings file failed.
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The settings file is not valid TOML for this schema.
    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Serializing the settings failed.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Writing the settings file failed.
    #[error("Failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The configured upload endpoint is not a valid URL.
    #[error("Invalid upload endpoint {value:?}: {source}")]
    InvalidEndpoint {
        value: String,
        source: url::ParseError,
    },
}

/// User-editable settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Where submissions are POSTed.
    pub upload_url: String,
    /// Presentation-only theme toggle, passed through to the renderer.
    pub dark_mode: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            dark_mode: false,
        }
    }
}

impl AppSettings {
    /// Parse the configured endpoint, rejecting malformed URLs early so the
    /// transport never sees them.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.upload_url).map_err(|source| ConfigError::InvalidEndpoint {
            value: self.upload_url.clone(),
            source,
        })
    }
}

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from disk, returning defaults if no file exists yet.
pub fn load_or_default() -> Result<AppSettings, ConfigError> {
    load_from_path(&config_path()?)
}

/// Load settings from a specific path; a missing file yields defaults.
pub fn load_from_path(path: &Path) -> Result<AppSettings, ConfigError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist settings to the default location.
pub fn save(settings: &AppSettings) -> Result<(), ConfigError> {
    save_to_path(settings, &config_path()?)
}

/// Save settings to a specific path, writing atomically so a crash cannot
/// leave a half-written file behind.
pub fn save_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    let data = toml::to_string_pretty(settings)?;
    let tmp = path.with_extension("toml.tmp");
    let write_err = |p: &Path, source| ConfigError::Write {
        path: p.to_path_buf(),
        source,
    };
    {
        let mut file = std::fs::File::create(&tmp).map_err(|e| write_err(&tmp, e))?;
        file.write_all(data.as_bytes()).map_err(|e| write_err(&tmp, e))?;
        file.sync_all().map_err(|e| write_err(&tmp, e))?;
    }
    std::fs::rename(&tmp, path).map_err(|e| write_err(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let loaded = load_from_path(&dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded, AppSettings::default());
        assert_eq!(loaded.upload_url, DEFAULT_UPLOAD_URL);
        assert!(!loaded.dark_mode);
    }

    #[test]
    fn settings_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let settings = AppSettings {
            upload_url: "https://example.test/files".into(),
            dark_mode: true,
        };
        save_to_path(&settings, &path).unwrap();
        assert_eq!(load_from_path(&path).unwrap(), settings);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "upload_url = \"http://host/up\"\nfuture_knob = 3\n").unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.upload_url, "http://host/up");
    }

    #[test]
    fn endpoint_validation_rejects_garbage() {
        let settings = AppSettings {
            upload_url: "not a url".into(),
            dark_mode: false,
        };
        assert!(matches!(
            settings.endpoint(),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
        assert!(AppSettings::default().endpoint().is_ok());
    }
}
