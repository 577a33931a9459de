// S3 client backed by rust-s3

use async_trait::async_trait;
use futures::TryStreamExt;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use s3::Bucket;
use tracing::debug;

use super::{ObjectInfo, ObjectStore, ObjectStream, StoreError, StoreResult};
use crate::config::StorageConfig;

/// Builds a fresh bucket handle for every call from the static settings.
/// Handles are not cached; construction is local and does no I/O.
#[derive(Debug, Clone)]
pub struct S3Store {
    settings: StorageConfig,
}

impl S3Store {
    pub fn new(settings: StorageConfig) -> Self {
        Self { settings }
    }

    /// Resolve the configured `host[:port]` into a base URL.
    fn endpoint_url(&self) -> StoreResult<String> {
        let endpoint = self.settings.endpoint.trim();
        if endpoint.is_empty() {
            return Err(StoreError::Client("endpoint is empty".to_string()));
        }
        if endpoint.contains("://") {
            return Err(StoreError::Client(format!(
                "endpoint '{}' must not include a scheme, TLS is selected with --s3.useSSL",
                endpoint
            )));
        }
        if endpoint.contains('/') {
            return Err(StoreError::Client(format!(
                "endpoint '{}' cannot include a path",
                endpoint
            )));
        }

        let scheme = if self.settings.use_ssl { "https" } else { "http" };
        Ok(format!("{}://{}", scheme, endpoint))
    }

    fn bucket(&self, name: &str) -> StoreResult<Bucket> {
        let region = Region::Custom {
            region: self.settings.region.clone(),
            endpoint: self.endpoint_url()?,
        };
        let credentials = Credentials::new(
            Some(self.settings.access_key_id.as_str()),
            Some(self.settings.secret_access_key.as_str()),
            None,
            None,
            None,
        )
        .map_err(|e| StoreError::Client(e.to_string()))?;

        let bucket = Bucket::new(name, region, credentials)
            .map_err(|e| StoreError::Client(e.to_string()))?;

        if self.settings.path_style {
            Ok(bucket.with_path_style())
        } else {
            Ok(bucket)
        }
    }
}

fn map_s3_error(err: S3Error, bucket: &str, key: &str) -> StoreError {
    match err {
        S3Error::HttpFailWithBody(404, _) => StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        S3Error::HttpFailWithBody(status, message) => StoreError::Upstream { status, message },
        other => StoreError::Transport(other.to_string()),
    }
}

fn check_status(status: u16, bucket: &str, key: &str) -> StoreResult<()> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }),
        _ => Err(StoreError::Upstream {
            status,
            message: String::new(),
        }),
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectStream> {
        let handle = self.bucket(bucket)?;
        debug!(bucket, key, "Opening object stream");

        let response = handle
            .get_object_stream(key)
            .await
            .map_err(|e| map_s3_error(e, bucket, key))?;
        check_status(response.status_code, bucket, key)?;

        let body = response
            .bytes
            .map_err(|e| StoreError::Transport(e.to_string()));
        Ok(ObjectStream::new(body))
    }

    async fn stat_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectInfo> {
        let handle = self.bucket(bucket)?;

        let (head, status) = handle
            .head_object(key)
            .await
            .map_err(|e| map_s3_error(e, bucket, key))?;
        check_status(status, bucket, key)?;

        let size = head
            .content_length
            .and_then(|len| u64::try_from(len).ok())
            .ok_or_else(|| StoreError::Upstream {
                status,
                message: "response carried no usable Content-Length".to_string(),
            })?;
        Ok(ObjectInfo { size })
    }
}
