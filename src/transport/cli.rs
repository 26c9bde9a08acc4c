//! CLI entry points: endpoint probe and one-shot chatbot messages

use crate::api::probe::{self, CheckOutcome};
use crate::api::ApiClient;
use crate::chatbot::{ChatbotWidget, HttpChatbotService};
use crate::config::Config;
use crate::storage::FileSnapshotStore;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "Check")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Expected")]
    expected: String,
    #[tabled(rename = "Result")]
    result: String,
}

impl From<&CheckOutcome> for CheckRow {
    fn from(outcome: &CheckOutcome) -> Self {
        let expected = outcome
            .expected
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join("/");
        let result = if outcome.passed {
            "PASS".green().to_string()
        } else {
            format!("{} ({})", "FAIL".red(), outcome.detail)
        };
        Self {
            name: outcome.name.clone(),
            status: outcome
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            expected,
            result,
        }
    }
}

/// Probe every platform endpoint and report
pub async fn run_probe(
    config: &Config,
    base_url: Option<&str>,
    token: Option<&str>,
    format: &str,
) -> Result<()> {
    let base_url = base_url.unwrap_or(&config.api.base_url);
    let token = token.or(config.api.token.as_deref());
    let client = ApiClient::new(base_url).context("Invalid API base URL")?;

    tracing::info!("Probing {}", client.base_url());
    let outcomes = probe::run_all(&client, token).await;
    let failed = outcomes.iter().filter(|o| !o.passed).count();

    match format {
        "json" => {
            let output = serde_json::json!({
                "base_url": client.base_url().as_str(),
                "checks": outcomes,
                "failed": failed,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            println!("\n{}", "=== SWEETMANAGER ENDPOINT PROBE ===".bold().cyan());
            println!("{}\n", client.base_url());

            let rows: Vec<CheckRow> = outcomes.iter().map(CheckRow::from).collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);

            let passed = outcomes.len() - failed;
            println!(
                "\n{} passed, {} failed",
                passed.to_string().green(),
                failed.to_string().red()
            );
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} checks failed", failed, outcomes.len());
    }
    Ok(())
}

/// Send one message through the chatbot widget, persisting the conversation
pub async fn run_chat(
    config: &Config,
    message: &str,
    reset: bool,
    store_dir: Option<PathBuf>,
) -> Result<()> {
    let store_dir = store_dir.unwrap_or_else(|| config.snapshot_dir());
    let store = FileSnapshotStore::new(&store_dir)
        .with_context(|| format!("Failed to open snapshot store at {}", store_dir.display()))?;
    let service = HttpChatbotService::new(config.chatbot.base_url.clone());

    let mut widget =
        ChatbotWidget::from_config(&config.chatbot, Arc::new(service), Arc::new(store));
    widget.open();
    if reset {
        widget.reset();
    }

    let sent = widget.send(message).await;
    if sent {
        if let Some(reply) = widget.last_robot_message() {
            println!("{} {}", "bot:".bold().cyan(), reply.content);
        }
    }
    if let Some(id) = widget.conversation_id() {
        tracing::debug!("Conversation {}", id);
    }

    widget.close().context("Failed to save conversation")?;
    if !sent {
        anyhow::bail!("Message is blank, nothing was sent");
    }
    Ok(())
}
