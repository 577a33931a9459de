// Storage layer (S3-compatible, read-only)

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

pub mod s3_client;

#[cfg(test)]
pub mod memory;

pub use s3_client::S3Store;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The client handle could not be built (bad endpoint, bad credentials).
    #[error("{0}")]
    Client(String),

    #[error("object {bucket}/{key} not found")]
    NotFound { bucket: String, key: String },

    #[error("upstream returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Metadata of a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectInfo {
    pub size: u64,
}

/// An opened object body. Dropping it releases the upstream response.
pub struct ObjectStream {
    inner: BoxStream<'static, StoreResult<Bytes>>,
}

impl ObjectStream {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = StoreResult<Bytes>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }
}

impl fmt::Debug for ObjectStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStream").finish_non_exhaustive()
    }
}

impl Stream for ObjectStream {
    type Item = StoreResult<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Read access to an S3-compatible object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Open the body of `key` in `bucket` for streaming.
    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectStream>;

    /// Fetch the object's metadata without its body.
    async fn stat_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectInfo>;
}
