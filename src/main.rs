use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use template_board::cli::Cli;
use template_board::cmd::*;
use template_board::config::{data_dir, load_config, LOG_FILE};
use template_board::logging::init_tracing;
use template_board::store::RemoteStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Completions need neither config nor storage.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return Ok(());
    }

    let dir = data_dir(cli.dir.as_deref());
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create data directory {}", dir.display()))?;

    let config = load_config(&dir)?.apply(cli.overrides());
    init_tracing(&config.log_level, &dir.join(LOG_FILE))?;
    info!(
        dir = %dir.display(),
        api_url = config.api_url.as_deref().unwrap_or("-"),
        "starting template_board"
    );

    let backend = config.build_backend(&dir)?;
    let store = Arc::new(RemoteStore::new(backend));

    match cli.command {
        Commands::Ui => cmd_ui(store, config.theme, None).await,
        Commands::Board { template } => cmd_ui(store, config.theme, Some(template)).await,
        Commands::Template { action } => cmd_template(&store, action).await,
        Commands::Task { action } => cmd_task(&store, action).await,
        Commands::Latest { limit } => cmd_latest(&store, limit).await,
        Commands::Completions { .. } => Ok(()),
    }
}
