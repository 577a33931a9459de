//! HTTP Routes
//!
//! - `/v1/{*path}?bucket=<name>` - Stream an object out of the store
//! - `/ping` - Liveness probe

pub mod health;
pub mod objects;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(objects::router(state))
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
}
