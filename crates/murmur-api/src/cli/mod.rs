//! CLI definitions for the `murmur` binary.
//!
//! Uses clap derive macros. Settings resolve in order: built-in defaults,
//! the TOML config file, then environment variables and flags (clap reads
//! both, so a flag beats its variable).

pub mod history;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use murmur_infra::config::{DEFAULT_CONFIG_FILE, load_server_config};
use murmur_observe::LogFormat;
use murmur_types::config::ServerConfig;

/// Real-time chat server with persisted history.
#[derive(Parser)]
#[command(name = "murmur", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, env = "MURMUR_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// History database connection string.
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format: pretty or json.
    #[arg(long, global = true, env = "MURMUR_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "MURMUR_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat server.
    Serve(ServeArgs),

    /// Print recent chat history from the database.
    History {
        /// Number of messages to show (defaults to the configured history limit).
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

/// Listener overrides for `murmur serve`.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Interface to bind.
    #[arg(long, env = "MURMUR_HOST")]
    pub host: Option<String>,

    /// Port to listen on.
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory with a built browser client to serve.
    #[arg(long, env = "MURMUR_WEB_DIR")]
    pub web_dir: Option<PathBuf>,
}

impl ServeArgs {
    /// Apply listener overrides on top of `config`.
    pub fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(web_dir) = self.web_dir {
            config.web_dir = Some(web_dir);
        }
        config
    }
}

impl Cli {
    /// Default tracing directive derived from `-v` / `--quiet`.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Load the config file and apply the global overrides.
    pub async fn resolve_config(&self) -> ServerConfig {
        let mut config = load_server_config(&self.config).await;
        if let Some(database_url) = &self.database_url {
            config.database_url = database_url.clone();
        }
        config
    }
}
