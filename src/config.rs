use crate::filter::DomainTables;
use crate::url_state::{DEFAULT_FILTER_PARAM, HistoryMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseJson { path: String, message: String },
}

/// Codec settings plus the domain tables of the loaded results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Query parameter the filter string is stored under.
    pub param_name: String,
    pub history: HistoryMode,
    #[serde(flatten)]
    pub domain: DomainTables,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            param_name: DEFAULT_FILTER_PARAM.to_string(),
            history: HistoryMode::default(),
            domain: DomainTables::default(),
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<CodecConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

/// Load a `.toml` file, or a JSON/JSON5 file for any other extension
pub fn load_config_from_path(path: &Path) -> Result<CodecConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        toml::from_str::<CodecConfig>(&raw).map_err(|source| ConfigError::ParseToml {
            path: path_display,
            source,
        })
    } else {
        json5::from_str::<CodecConfig>(&raw).map_err(|err| ConfigError::ParseJson {
            path: path_display,
            message: err.to_string(),
        })
    }
}

pub fn default_config() -> &'static CodecConfig {
    static DEFAULT_CONFIG: LazyLock<CodecConfig> = LazyLock::new(CodecConfig::default);
    &DEFAULT_CONFIG
}
