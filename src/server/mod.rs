//! HTTP surface over `ScrapeService`
//!
//! A thin axum router: every handler forwards to the service and maps
//! `JobError` to a status code.

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::browser_pool::PoolLauncher;
use crate::jobs::ScrapeService;

pub mod handlers;
pub mod response;

pub use handlers::{ExchangeQuery, JobQuery, StartResponse};

/// Build the application router
pub fn router<L: PoolLauncher>(service: Arc<ScrapeService<L>>) -> Router {
    Router::new()
        .route("/api/finviz", get(handlers::scrape_now::<L>))
        .route("/api/finviz/start", post(handlers::start::<L>))
        .route("/api/finviz/status", get(handlers::status::<L>))
        .route("/api/finviz/download", get(handlers::download::<L>))
        .route("/health", get(handlers::health::<L>))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
