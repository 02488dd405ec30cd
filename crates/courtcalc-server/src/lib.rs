// HTTP API for courtcalc: router, shared state, and the serve loop.

pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use courtcalc_core::config::Config;
use courtcalc_core::engine::StatEngine;
use courtcalc_core::player::PlayerRecord;
use courtcalc_core::store::StatStore;

/// Shared handler state. Cheap to clone; everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StatStore>,
    pub engine: Arc<StatEngine>,
}

impl AppState {
    pub fn new(store: Arc<dyn StatStore>, engine: StatEngine) -> Self {
        AppState {
            store,
            engine: Arc::new(engine),
        }
    }

    /// Players for one season, or every stored player.
    pub async fn players_for(&self, season: Option<&str>) -> anyhow::Result<Vec<PlayerRecord>> {
        match season {
            Some(season) => self.store.players_in_season(season).await,
            None => self.store.all_players().await,
        }
    }
}

/// Build the application router with middleware applied.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/nba/stats", get(handlers::stats))
        .route("/api/nba/players", get(handlers::players))
        .route("/api/nba/validate", post(handlers::validate_formula))
        .route("/api/nba/calculate", post(handlers::calculate))
        .route("/api/nba/name", post(handlers::name_formula))
        .route("/api/formulas/examples", get(handlers::examples))
        .route(
            "/api/custom-stats",
            get(handlers::list_custom_stats).post(handlers::create_custom_stat),
        )
        .route(
            "/api/custom-stats/{id}",
            get(handlers::get_custom_stat).delete(handlers::delete_custom_stat),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

/// Bind `config.bind_addr()` and serve until the process is stopped.
pub async fn serve(config: &Config, state: AppState) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("courtcalc listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}
