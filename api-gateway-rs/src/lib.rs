// api-gateway-rs/src/lib.rs
// HTTP surface of the auto-ops workflow

pub mod error;
pub mod handlers;
pub mod logging;

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use orchestrator_service_rs::Orchestrator;

/// Error reports carry a traceback and a code snippet; nothing legitimate
/// comes close to this.
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

pub struct AppState {
    pub orchestrator: Orchestrator,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            started_at: Instant::now(),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/report-error", post(handlers::report_error))
        .route("/api/incidents", get(handlers::list_incidents))
        .route("/api/incidents/clear", delete(handlers::clear_incidents))
        .route("/api/incidents/:id", get(handlers::get_incident))
        .route("/api/incidents/:id/complete", post(handlers::complete_incident))
        .route("/api/incidents/:id/audio", get(handlers::incident_audio))
        .layer(RequestBodyLimitLayer::new(MAX_PAYLOAD_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}
