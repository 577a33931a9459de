// In-memory object store for router tests

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ObjectInfo, ObjectStore, ObjectStream, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), Bytes>>,
    calls: AtomicUsize,
    chunk_size: Option<usize>,
    fail_stat: bool,
    fail_after_first_chunk: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve bodies in chunks of `size` bytes.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size.max(1));
        self
    }

    pub fn with_failing_stat(mut self) -> Self {
        self.fail_stat = true;
        self
    }

    /// Break every body after its first chunk.
    pub fn with_broken_streams(mut self) -> Self {
        self.fail_after_first_chunk = true;
        self
    }

    pub fn put(&self, bucket: &str, key: &str, data: impl Into<Bytes>) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), data.into());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, bucket: &str, key: &str) -> StoreResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectStream> {
        let data = self.lookup(bucket, key)?;
        let chunk_size = self.chunk_size.unwrap_or(data.len().max(1));

        let mut chunks: Vec<StoreResult<Bytes>> = (0..data.len())
            .step_by(chunk_size)
            .map(|start| Ok(data.slice(start..(start + chunk_size).min(data.len()))))
            .collect();
        if self.fail_after_first_chunk {
            chunks.truncate(1);
            chunks.push(Err(StoreError::Transport("connection reset".to_string())));
        }

        Ok(ObjectStream::new(stream::iter(chunks)))
    }

    async fn stat_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectInfo> {
        let data = self.lookup(bucket, key)?;
        if self.fail_stat {
            return Err(StoreError::Upstream {
                status: 500,
                message: "stat unavailable".to_string(),
            });
        }
        Ok(ObjectInfo {
            size: data.len() as u64,
        })
    }
}
