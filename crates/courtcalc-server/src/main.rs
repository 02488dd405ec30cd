use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use courtcalc_core::config;
use courtcalc_core::db::Database;
use courtcalc_core::engine::StatEngine;
use courtcalc_server::{serve, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("courtcalc starting up");

    // 2. Load config (seeds config/ from defaults/ on first run)
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: bind={}, max_results={}",
        config.bind_addr(),
        config.evaluation.max_results
    );

    // 3. Open database
    let db = Database::open(&config.database.path).context("failed to open database")?;
    let player_count = db.player_count().context("failed to count players")?;
    info!(
        "Database opened at {} ({} players)",
        config.database.path, player_count
    );
    if player_count == 0 {
        warn!("No players stored; calculations will return empty leaderboards");
    }

    // 4. Build state and serve
    let engine = StatEngine::new(config.evaluation);
    let state = AppState::new(Arc::new(db), engine);
    serve(&config, state).await.context("HTTP server failed")?;

    info!("courtcalc shut down");
    Ok(())
}

const DEFAULT_LOG_FILTER: &str =
    "courtcalc=info,courtcalc_core=info,courtcalc_server=info,tower_http=info,warn";

/// Log to stderr, filtered by `RUST_LOG`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
