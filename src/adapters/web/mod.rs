//! JSON HTTP API over the analysis engines.
//!
//! Public routes serve quotes, per-symbol analysis, backtests and charts.
//! `/api/*` routes require the configured token.

mod auth;
mod error;
mod handlers;

pub use auth::require_token;
pub use error::WebError;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::domain::settings::Settings;
use crate::domain::snapshot::SnapshotCache;
use crate::ports::clock_port::{Clock, SystemClock};
use crate::ports::data_port::MarketDataProvider;

pub struct AppState {
    pub provider: Arc<dyn MarketDataProvider + Send + Sync>,
    pub clock: Arc<dyn Clock + Send + Sync>,
    pub settings: Settings,
    snapshot: Mutex<SnapshotCache>,
}

impl AppState {
    pub fn new(provider: Arc<dyn MarketDataProvider + Send + Sync>, settings: Settings) -> Self {
        Self::with_clock(provider, Arc::new(SystemClock), settings)
    }

    pub fn with_clock(
        provider: Arc<dyn MarketDataProvider + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        settings: Settings,
    ) -> Self {
        let snapshot = Mutex::new(SnapshotCache::new(settings.snapshot_ttl));
        Self {
            provider,
            clock,
            settings,
            snapshot,
        }
    }

    /// Poisoning is ignored.
    fn snapshot(&self) -> MutexGuard<'_, SnapshotCache> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let protected = Router::new()
        .route("/api/execute_strategy", post(handlers::execute_strategy))
        .route("/api/screen/low_rsi", get(handlers::screen_low_rsi))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/stocks", get(handlers::list_stocks))
        .route("/stocks/{symbol}", get(handlers::get_stock))
        .route("/stocks/{symbol}/analysis", get(handlers::stock_analysis))
        .route("/stocks/{symbol}/backtest", get(handlers::stock_backtest))
        .route("/stocks/{symbol}/chart", get(handlers::stock_chart))
        .merge(protected)
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
