//! Configuration for the intent-handler Lambda.

use std::env;

const DEFAULT_ARTIFACT_BUCKET: &str = "youngwjung";
const DEFAULT_ARTIFACT_KEY: &str = "sparse_matrix.npz";
const DEFAULT_INFERENCE_ENDPOINT: &str = "ENDPOINT";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// S3 bucket holding the purchase-history matrix
    pub artifact_bucket: String,
    /// Object key of the purchase-history matrix
    pub artifact_key: String,
    /// SageMaker endpoint serving recommendation scores
    pub inference_endpoint: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// deployed defaults.
    pub fn from_env() -> Self {
        Self {
            artifact_bucket: env::var("ARTIFACT_BUCKET")
                .unwrap_or_else(|_| DEFAULT_ARTIFACT_BUCKET.to_string()),
            artifact_key: env::var("ARTIFACT_KEY")
                .unwrap_or_else(|_| DEFAULT_ARTIFACT_KEY.to_string()),
            inference_endpoint: env::var("INFERENCE_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_INFERENCE_ENDPOINT.to_string()),
        }
    }
}
