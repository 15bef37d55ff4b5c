//! Object-storage access for the recommendation artifact.

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;

use crate::{Error, Result};

/// Fetch-by-key access to the artifact bucket.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Download an object and return its raw bytes.
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

/// S3-backed artifact store.
pub struct S3ArtifactStore {
    client: S3Client,
}

impl S3ArtifactStore {
    /// Create a new artifact store.
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to fetch s3://{}/{}: {}", bucket, key, e)))?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Aws(format!("Failed to read object body: {}", e)))?;

        Ok(bytes.into_bytes().to_vec())
    }
}
