use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sweetmanager_bdd::config::Config;
use sweetmanager_bdd::transport;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sweetmanager-bdd")]
#[command(author, version, about = "SweetManager acceptance suite tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Call every platform endpoint once and report the results
    Probe {
        /// API base URL (default: config or SWEETMANAGER_API_URL)
        #[arg(long)]
        base_url: Option<String>,

        /// Bearer token for authenticated endpoints
        #[arg(long)]
        token: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Run the stub backend (platform API plus chatbot endpoints)
    ServeStub {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Send one message to the chatbot server
    Chat {
        /// Message to send
        message: String,

        /// Start a new conversation instead of continuing the saved one
        #[arg(long)]
        reset: bool,

        /// Directory for conversation snapshots
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "sweetmanager_bdd=debug"
    } else {
        "sweetmanager_bdd=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Probe {
            base_url,
            token,
            format,
        } => {
            transport::cli::run_probe(&config, base_url.as_deref(), token.as_deref(), &format)
                .await?;
        }
        Commands::ServeStub { port, host } => {
            tracing::info!("Starting stub backend on {}:{}", host, port);
            transport::run_stub_server(&host, port).await?;
        }
        Commands::Chat {
            message,
            reset,
            store_dir,
        } => {
            transport::cli::run_chat(&config, &message, reset, store_dir).await?;
        }
    }

    Ok(())
}
