//! Object Retrieval
//!
//! `GET /v1/{*path}?bucket=<name>` streams the object stored at `path`
//! in `bucket` back to the caller.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::TryStreamExt;
use tracing::{debug, error, info};

use crate::models::AppState;
use crate::types::{AppError, AppResult};

/// Every object is served with this type, whatever it actually holds.
pub const OBJECT_CONTENT_TYPE: &str = "application/gzip";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/{*path}", get(get_object))
        .with_state(state)
}

/// First value of `bucket` in the query string; repeats are ignored.
fn bucket_param(query: &[(String, String)]) -> Option<&str> {
    query
        .iter()
        .find(|(name, _)| name == "bucket")
        .map(|(_, value)| value.as_str())
}

async fn get_object(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> AppResult<Response> {
    let bucket = match bucket_param(&query).filter(|b| !b.is_empty()) {
        Some(bucket) => bucket.to_string(),
        None => {
            error!(key = %key, "{}", AppError::MissingBucket);
            return Err(AppError::MissingBucket);
        }
    };

    info!(bucket = %bucket, key = %key, "Object requested");

    let stream = state.store.get_object(&bucket, &key).await.map_err(|e| {
        error!(
            bucket = %bucket,
            key = %key,
            endpoint = %state.config.storage.endpoint,
            "Unable to download object: {}",
            e
        );
        AppError::from(e)
    })?;

    // Size is best-effort; without it the body goes out chunked.
    let size = match state.store.stat_object(&bucket, &key).await {
        Ok(info) => Some(info.size),
        Err(e) => {
            debug!(bucket = %bucket, key = %key, "Object size unavailable: {}", e);
            None
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(OBJECT_CONTENT_TYPE),
    );
    if let Some(size) = size {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));
    }

    let body = stream.inspect_err(move |e| {
        error!(bucket = %bucket, key = %key, "Streaming response error: {}", e);
    });

    Ok((headers, Body::from_stream(body)).into_response())
}
