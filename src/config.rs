//! Application configuration.
//!
//! Defaults match the stock sample: a local Core server on port 1729 and a
//! database called `sample_app_db`. Settings can be overridden from a TOML
//! file and then from the command line.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unknown edition '{0}', expected 'core' or 'cloud'")]
    UnknownEdition(String),
}

/// Server edition to connect to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    /// Single server, no authentication.
    #[default]
    Core,
    /// Clustered server with credentials.
    Cloud,
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edition::Core => write!(f, "core"),
            Edition::Cloud => write!(f, "cloud"),
        }
    }
}

impl FromStr for Edition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "core" => Ok(Edition::Core),
            "cloud" => Ok(Edition::Cloud),
            _ => Err(ConfigError::UnknownEdition(s.to_string())),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server address, `host:port`.
    pub address: String,

    /// Name of the sample database.
    pub database: String,

    /// Server edition.
    pub edition: Edition,

    /// Cloud username.
    pub username: String,

    /// Cloud password. Prefer `IAM_SAMPLE_PASSWORD` over storing it here.
    pub password: Option<String>,

    /// Use TLS for Cloud connections.
    pub tls: bool,

    /// Root CA certificate for Cloud TLS.
    pub tls_root_ca: Option<PathBuf>,

    /// Schema definition file.
    pub schema_file: PathBuf,

    /// Data insertion file.
    pub data_file: PathBuf,

    /// Replace an existing database without asking.
    pub reset: bool,

    /// Run the sample requests after setup.
    pub run_queries: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:1729".into(),
            database: "sample_app_db".into(),
            edition: Edition::Core,
            username: "admin".into(),
            password: Some("password".into()),
            tls: true,
            tls_root_ca: None,
            schema_file: PathBuf::from("iam-schema.tql"),
            data_file: PathBuf::from("iam-data-single-query.tql"),
            reset: false,
            run_queries: true,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the default configuration file.
    ///
    /// Looks in the following locations:
    /// 1. `<config dir>/iam-sample/config.toml`
    /// 2. `~/.iam-sample/config.toml`
    /// 3. Built-in defaults if neither exists
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = Self::default_config_path().filter(|p| p.exists()) {
            return Self::from_file(&path);
        }
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".iam-sample").join("config.toml");
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// The default configuration file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("iam-sample").join("config.toml"))
    }

    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

/// Builder for [`AppConfig`].
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = address.into();
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.config.database = database.into();
        self
    }

    pub fn edition(mut self, edition: Edition) -> Self {
        self.config.edition = edition;
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.username = username.into();
        self.config.password = Some(password.into());
        self
    }

    pub fn tls(mut self, enabled: bool, root_ca: Option<PathBuf>) -> Self {
        self.config.tls = enabled;
        self.config.tls_root_ca = root_ca;
        self
    }

    pub fn schema_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.schema_file = path.into();
        self
    }

    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    pub fn reset(mut self, value: bool) -> Self {
        self.config.reset = value;
        self
    }

    pub fn run_queries(mut self, value: bool) -> Self {
        self.config.run_queries = value;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
