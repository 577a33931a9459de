use axum::{routing::get, Router};
use tracing::debug;

pub fn router() -> Router {
    Router::new().route("/ping", get(ping))
}

/// Liveness probe. Never touches the store.
async fn ping() -> &'static str {
    debug!("Received ping");
    "OK"
}
