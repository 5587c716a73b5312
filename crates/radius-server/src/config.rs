use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// User accepted by the built-in credential table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
}

/// Server configuration as read from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server listen address
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Server listen port
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Shared secret used for every client
    #[serde(default = "default_secret")]
    pub secret: String,

    /// List of users for authentication
    #[serde(default)]
    pub users: Vec<User>,

    /// Log level: "trace", "debug", "info", "warn", "error" (default: "info")
    #[serde(default)]
    pub log_level: Option<String>,

    /// Upper bound on requests handled at once (default: unbounded)
    ///
    /// Datagrams arriving while the bound is reached are dropped; RADIUS
    /// clients retransmit on their own.
    #[serde(default)]
    pub max_concurrent_requests: Option<usize>,
}

fn default_listen_address() -> String {
    "0.0.0.0".to_string()
}

fn default_listen_port() -> u16 {
    1812 // Standard RADIUS authentication port
}

fn default_secret() -> String {
    "testing123".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
            secret: default_secret(),
            users: vec![],
            log_level: None,
            max_concurrent_requests: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, writing `Config::example()` if the file does not exist
    ///
    /// Returns `Ok(None)` when the example was written. A file that exists but
    /// cannot be read, parsed or validated is reported and left untouched.
    pub fn load_or_bootstrap<P: AsRef<Path>>(path: P) -> Result<Option<Self>, ConfigError> {
        match Self::from_file(&path) {
            Ok(config) => Ok(Some(config)),
            Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                Self::example().to_file(&path)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr: IpAddr = self.listen_address.parse().map_err(|_| {
            ConfigError::Invalid(format!("Invalid IP address: {}", self.listen_address))
        })?;
        Ok(SocketAddr::new(addr, self.listen_port))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _: IpAddr = self.listen_address.parse().map_err(|_| {
            ConfigError::Invalid(format!("Invalid listen address: {}", self.listen_address))
        })?;

        if self.listen_port == 0 {
            return Err(ConfigError::Invalid("Port cannot be 0".to_string()));
        }

        if self.secret.is_empty() {
            return Err(ConfigError::Invalid("Secret cannot be empty".to_string()));
        }

        for user in &self.users {
            if user.username.is_empty() {
                return Err(ConfigError::Invalid("User has empty username".to_string()));
            }
        }

        if self.max_concurrent_requests == Some(0) {
            return Err(ConfigError::Invalid(
                "max_concurrent_requests cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Create an example configuration file
    pub fn example() -> Self {
        Config {
            listen_address: "0.0.0.0".to_string(),
            listen_port: 1812,
            secret: "testing123".to_string(),
            users: vec![
                User {
                    username: "admin".to_string(),
                    password: "admin123".to_string(),
                },
                User {
                    username: "user1".to_string(),
                    password: "password1".to_string(),
                },
            ],
            log_level: Some("info".to_string()),
            max_concurrent_requests: Some(1024),
        }
    }
}
