//! Inference-endpoint client for recommendation scoring.

use async_trait::async_trait;
use aws_sdk_sagemakerruntime::primitives::Blob;
use aws_sdk_sagemakerruntime::Client as SageMakerClient;

use crate::{Error, Result};

/// Synchronous invoke against a named inference endpoint.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Invoke the endpoint with a JSON body and return the raw response body.
    async fn invoke(&self, endpoint_name: &str, body: Vec<u8>) -> Result<Vec<u8>>;
}

/// SageMaker Runtime-backed inference client.
pub struct SageMakerInference {
    client: SageMakerClient,
}

impl SageMakerInference {
    /// Create a new inference client.
    pub fn new(client: SageMakerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InferenceClient for SageMakerInference {
    async fn invoke(&self, endpoint_name: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let response = self
            .client
            .invoke_endpoint()
            .endpoint_name(endpoint_name)
            .content_type("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                Error::Aws(format!("Failed to invoke endpoint {}: {}", endpoint_name, e))
            })?;

        let payload = response
            .body()
            .ok_or_else(|| Error::Aws("No response body from inference endpoint".to_string()))?;

        Ok(payload.as_ref().to_vec())
    }
}
