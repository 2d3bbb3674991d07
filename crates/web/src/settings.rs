//! Application settings.
//!
//! Every field has a default, so an empty TOML document is a valid configuration:
//!
//! ```toml
//! address = "0.0.0.0:8080"
//! template_dir = "templates"
//! static_dir = "static"
//! static_prefix = "/static"
//! log_level = "debug"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("can't read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Socket address the server binds
    pub address: String,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Request paths starting with this prefix are answered from `static_dir`
    pub static_prefix: String,
    /// `tracing` level filter: trace, debug, info, warn or error
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8080".into(),
            template_dir: "templates".into(),
            static_dir: "static".into(),
            static_prefix: "/static".into(),
            log_level: "info".into(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| SettingsError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&content)
    }
}
