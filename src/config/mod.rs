//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `RETENTION_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::lifecycle::{DEFAULT_DATA_DIR, ModelCacheConfig};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 27888;

/// Origins allowed by CORS when `RETENTION_ALLOWED_ORIGINS` is unset (the desktop shell).
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:1420",
    "http://127.0.0.1:1420",
    "https://tauri.localhost",
];

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RETENTION_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `27888`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Root directory for local state. Default: `./.data`.
    pub data_dir: PathBuf,

    /// Start loading the embedding model in the background at startup. Default: `true`.
    pub warm_on_start: bool,

    /// CORS origins (comma-separated in the environment).
    pub allowed_origins: Vec<String>,

    /// Embedding model source and cache location.
    pub model: ModelCacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            warm_on_start: true,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
            model: ModelCacheConfig::default(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "RETENTION_PORT";
    const ENV_BIND_ADDR: &'static str = "RETENTION_BIND_ADDR";
    const ENV_DATA_DIR: &'static str = "RETENTION_DATA_DIR";
    const ENV_WARM_ON_START: &'static str = "RETENTION_WARM_ON_START";
    const ENV_ALLOWED_ORIGINS: &'static str = "RETENTION_ALLOWED_ORIGINS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let data_dir = Self::parse_path_from_env(Self::ENV_DATA_DIR, defaults.data_dir);
        let warm_on_start =
            parse_bool_from_env(Self::ENV_WARM_ON_START, defaults.warm_on_start)?;
        let allowed_origins = Self::parse_list_from_env(Self::ENV_ALLOWED_ORIGINS)
            .unwrap_or(defaults.allowed_origins);

        Ok(Self {
            port,
            bind_addr,
            data_dir,
            warm_on_start,
            allowed_origins,
            model: ModelCacheConfig::from_env()?,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.exists() && !self.data_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.data_dir.clone(),
            });
        }

        if self.model.cache_dir.exists() && !self.model.cache_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.model.cache_dir.clone(),
            });
        }

        if let Some(path) = self.model.bundled_dir() {
            if !path.exists() {
                return Err(ConfigError::PathNotFound {
                    path: path.to_path_buf(),
                });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory {
                    path: path.to_path_buf(),
                });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_list_from_env(var_name: &str) -> Option<Vec<String>> {
        let value = env::var(var_name).ok()?;
        let items: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect();
        (!items.is_empty()).then_some(items)
    }
}

/// Reads a boolean flag: `1/true/yes/on` or `0/false/no/off` (case-insensitive).
///
/// Unset or blank falls back to `default`; anything else is [`ConfigError::InvalidBool`].
pub(crate) fn parse_bool_from_env(
    var_name: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Ok(value) = env::var(var_name) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name: var_name,
            value,
        }),
    }
}
