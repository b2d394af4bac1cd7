//! Server configuration types.
//!
//! `ServerConfig` represents the optional `murmur.toml` file. Every field has
//! a default so an empty or missing file yields a working server.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default port, matching the browser client's expectations.
pub const DEFAULT_PORT: u16 = 5000;

/// Number of messages returned by the history endpoint.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// sqlx connection string for the history database.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Maximum number of messages returned by `GET /messages`.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Directory holding a built browser client, served as a fallback
    /// for unknown paths when it exists.
    #[serde(default)]
    pub web_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database_url() -> String {
    "sqlite://murmur.db?mode=rwc".to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            history_limit: default_history_limit(),
            web_dir: None,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default_values() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.history_limit, 50);
        assert!(config.web_dir.is_none());
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_server_config_partial_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
port = 8080
web_dir = "client/dist"
"#,
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.web_dir, Some(PathBuf::from("client/dist")));
    }

    #[test]
    fn test_server_config_empty_toml_is_default() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
    }
}
