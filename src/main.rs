use std::sync::Arc;

use tokio::sync::watch;

use sales_coach::application::{SessionRegistry, TurnLogger};
use sales_coach::config::AppConfig;
use sales_coach::domain::analysis::ConversationAnalyzer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    config.logging.init_tracing();

    tracing::info!("Starting sales-coach v{}", env!("CARGO_PKG_VERSION"));

    let store = config.storage.build_store();
    match &config.storage.transcript_dir {
        Some(dir) => tracing::info!(dir = %dir.display(), "Persisting transcripts to files"),
        None => tracing::info!("Keeping transcripts in memory"),
    }

    let logger = TurnLogger::new(ConversationAnalyzer::new(config.analyzer.settings()), store);
    let registry = Arc::new(SessionRegistry::new(logger, config.session.registry_settings()));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = Arc::clone(&registry).spawn_sweeper(config.session.sweep_interval(), shutdown_rx);

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    shutdown_tx.send(true)?;
    sweeper.await?;

    tracing::info!(live_sessions = registry.len().await, "Stopped");
    Ok(())
}
