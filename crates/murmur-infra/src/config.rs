//! Server configuration loader.
//!
//! Reads an optional TOML file into [`ServerConfig`]. Falls back to defaults
//! when the file is missing or malformed; command-line and environment
//! overrides are applied on top by the binary.

use std::path::Path;

use murmur_types::config::ServerConfig;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "murmur.toml";

/// Load server configuration from `path`.
///
/// - If the file does not exist, returns [`ServerConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config, with unspecified fields defaulted.
pub async fn load_server_config(path: &Path) -> ServerConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return ServerConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ServerConfig::default();
        }
    };

    match toml::from_str::<ServerConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ServerConfig::default()
        }
    }
}
