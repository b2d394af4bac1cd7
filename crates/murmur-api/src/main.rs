//! murmur chat server entry point.
//!
//! Binary name: `murmur`
//!
//! Parses CLI arguments, initializes tracing and the database, then either
//! serves the HTTP/WebSocket API or runs a one-shot command.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use murmur_types::config::ServerConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; variables may come from the real environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    murmur_observe::init_tracing(cli.log_directive(), cli.log_format, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let config = cli.resolve_config().await;

    let result = match cli.command {
        Commands::Serve(args) => serve(args.apply(config)).await,
        Commands::History { limit } => cli::history::show_history(&config, limit, cli.json).await,
    };

    murmur_observe::shutdown_tracing();
    result
}

/// Connect the store, bind the listener and serve until shutdown.
///
/// A database that cannot be opened aborts startup before the listener binds.
async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::init(config).await?;

    let addr = state.config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "Server running");
    println!(
        "  {} murmur listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state.clone());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.close().await;
    println!("\n  Server stopped.");

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// If a signal handler cannot be installed, that branch never completes.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
