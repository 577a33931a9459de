use std::sync::Arc;

use crate::config::Config;
use crate::storage::{ObjectStore, S3Store};

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    /// State backed by the S3 endpoint named in `config`.
    pub fn new(config: Config) -> Self {
        let store = Arc::new(S3Store::new(config.storage.clone()));
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
