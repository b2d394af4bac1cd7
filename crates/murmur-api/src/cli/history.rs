//! `murmur history`: print recent messages straight from the database.

use anyhow::Context;
use console::style;

use murmur_core::history::HistoryService;
use murmur_infra::sqlite::{DatabasePool, SqliteHistoryStore};
use murmur_types::chat::ChatMessage;
use murmur_types::config::ServerConfig;

/// Print up to `limit` recent messages, oldest first.
///
/// The database must already exist; a mistyped URL is an error rather than
/// a new empty database.
pub async fn show_history(
    config: &ServerConfig,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let pool = DatabasePool::open_existing(&config.database_url)
        .await
        .with_context(|| format!("failed to open database `{}`", config.database_url))?;
    let service = HistoryService::new(SqliteHistoryStore::new(pool.clone()), config.history_limit);

    let messages = service
        .recent_messages(limit.unwrap_or(config.history_limit))
        .await?;
    pool.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!("  {}", style("No messages yet.").dim());
        println!();
        return Ok(());
    }

    println!();
    for message in &messages {
        println!("  {}", format_line(message));
    }
    println!();

    Ok(())
}

fn format_line(message: &ChatMessage) -> String {
    format!(
        "{} {} {}",
        style(message.timestamp.format("%Y-%m-%d %H:%M:%S")).dim(),
        style(&message.username).cyan().bold(),
        message.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_types::chat::NewChatMessage;

    #[test]
    fn format_line_contains_sender_and_body() {
        let message = NewChatMessage::new("alice", "hi there").unwrap().stamp();
        let line = console::strip_ansi_codes(&format_line(&message)).to_string();
        assert!(line.ends_with("alice hi there"), "got {line}");
    }

    fn config_for(path: &std::path::Path) -> ServerConfig {
        ServerConfig {
            database_url: format!("sqlite://{}?mode=rwc", path.display()),
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn show_history_reads_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("cli.db"));
        DatabasePool::new(&config.database_url).await.unwrap().close().await;

        show_history(&config, Some(10), true).await.unwrap();
        show_history(&config, None, false).await.unwrap();
    }

    #[tokio::test]
    async fn show_history_fails_on_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mistyped.db");

        let err = show_history(&config_for(&path), None, false).await.unwrap_err();
        assert!(err.to_string().contains("failed to open database"));
        assert!(!path.exists());
    }
}
