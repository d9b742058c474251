use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Backend origin used when neither a file nor the environment provides one.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Environment variable overriding [`Config::api_url`].
pub const API_URL_ENV: &str = "VITE_API_URL";
/// Environment variable overriding [`Config::log_level`].
pub const LOG_LEVEL_ENV: &str = "RED404_LOG_LEVEL";
/// Environment variable overriding [`Config::storage_path`].
pub const STORAGE_PATH_ENV: &str = "RED404_STORAGE_PATH";

/// Errors produced while resolving client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("unsupported configuration format for {0}; use toml, yaml or json")]
    UnsupportedFormat(PathBuf),
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
    #[error("failed to serialize configuration: {0}")]
    Serialize(String),
}

/// Paths of the credential endpoints, relative to [`Config::api_url`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EndpointsConfig {
    pub login: String,
    pub register: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            login: "/api/login".to_string(),
            register: "/api/register".to_string(),
        }
    }
}

/// Client configuration for the red404 session library and CLI.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Origin of the backend REST API.
    pub api_url: String,

    /// Logging level filter (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,

    /// File backing durable session storage. `None` selects the platform default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,

    /// Credential endpoint paths.
    pub endpoints: EndpointsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Config {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_level: "info".to_string(),
            storage_path: None,
            endpoints: EndpointsConfig::default(),
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// Precedence, highest first: `api_url_override`, environment, file, defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resolved configuration is invalid.
    pub fn load_config(
        config_path: Option<&Path>,
        api_url_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::with_defaults(),
        };

        config.apply_env_overrides();

        if let Some(api_url) = api_url_override {
            config.api_url = api_url.to_string();
        }

        config.validate()?;
        debug!(api_url = %config.api_url, "resolved client configuration");
        Ok(config)
    }

    /// Parse a configuration file, picking the format from its extension.
    ///
    /// Keys missing from the file keep their default values.
    ///
    /// # Errors
    /// Returns an error for unreadable files, unknown extensions or malformed content.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|err| parse_error(err.to_string())),
            Some("yaml" | "yml") => {
                serde_yml::from_str(&content).map_err(|err| parse_error(err.to_string()))
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|err| parse_error(err.to_string()))
            }
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Apply environment variable overrides on top of the current values.
    pub fn apply_env_overrides(&mut self) {
        if let Some(api_url) = non_empty_env(API_URL_ENV) {
            self.api_url = api_url;
        }
        if let Some(log_level) = non_empty_env(LOG_LEVEL_ENV) {
            self.log_level = log_level;
        }
        if let Some(storage_path) = non_empty_env(STORAGE_PATH_ENV) {
            self.storage_path = Some(PathBuf::from(storage_path));
        }
    }

    /// Validate the resolved configuration.
    ///
    /// # Errors
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api_url).map_err(|err| ConfigError::Invalid {
            field: "api_url",
            message: format!("{err} ({})", self.api_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "api_url",
                message: format!("unsupported scheme `{}`", url.scheme()),
            });
        }

        for (field, path) in [
            ("endpoints.login", &self.endpoints.login),
            ("endpoints.register", &self.endpoints.register),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid {
                    field,
                    message: format!("`{path}` must start with `/`"),
                });
            }
        }

        Ok(())
    }

    /// Where durable session storage lives for this configuration.
    #[must_use]
    pub fn resolved_storage_path(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(default_storage_path)
    }

    /// Render the configuration in the given format (`toml`, `yaml` or `json`).
    ///
    /// # Errors
    /// Returns an error for unknown formats or serializer failures.
    pub fn render(&self, format: &str) -> Result<String, ConfigError> {
        match format {
            "toml" => toml::to_string_pretty(self).map_err(|err| ConfigError::Serialize(err.to_string())),
            "yaml" => serde_yml::to_string(self).map_err(|err| ConfigError::Serialize(err.to_string())),
            "json" => {
                serde_json::to_string_pretty(self).map_err(|err| ConfigError::Serialize(err.to_string()))
            }
            other => Err(ConfigError::UnsupportedFormat(PathBuf::from(format!(
                "config.{other}"
            )))),
        }
    }
}

/// Platform default for the session file: `<config_dir>/red404/session.json`.
#[must_use]
pub fn default_storage_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("red404").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("./session.json"))
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
