//! Product-recommendation intent handler.
//!
//! Downloads the purchase-history matrix from object storage, scores it
//! against the recommendation endpoint, and closes the turn with the three
//! highest-scored products.

use std::io::Write;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::inference::InferenceClient;
use crate::lex::{self, FulfillmentState, IntentRequest, IntentResponse, Message};
use crate::matrix::CsrMatrix;
use crate::storage::ArtifactStore;
use crate::{Error, Result};

/// Product catalog, ordinal positions aligned with the model's score vector.
const PRODUCTS: [&str; 10] = [
    "B009CCXJ0A",
    "B00F8K9MZQ",
    "B00MYXTCGY",
    "B00337D8U6",
    "B008TND0L6",
    "B00J46XO9U",
    "B00E5PI594",
    "B004911E9M",
    "B005S1CYO6",
    "B0067XVNTG",
];

/// Number of products returned to the user.
const TOP_N: usize = 3;

/// JSON envelope sent to the inference endpoint.
#[derive(Debug, Serialize)]
struct InferenceRequest {
    instances: Vec<Instance>,
}

#[derive(Debug, Serialize)]
struct Instance {
    features: Vec<f64>,
}

/// JSON body returned by the inference endpoint.
#[derive(Debug, Deserialize)]
struct InferenceResponse {
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    score: f64,
}

/// Recommendation handler over pluggable storage and inference backends.
pub struct Recommender<S, I> {
    store: S,
    inference: I,
    config: Config,
}

impl<S: ArtifactStore, I: InferenceClient> Recommender<S, I> {
    /// Create a new recommender.
    pub fn new(store: S, inference: I, config: Config) -> Self {
        Self {
            store,
            inference,
            config,
        }
    }

    /// Handle a `Recommend` intent. Slots are ignored.
    pub async fn handle(&self, request: &IntentRequest) -> Result<IntentResponse> {
        let session_attributes = lex::session_attributes(request);

        let features = self.load_feature_matrix().await?;
        info!(
            rows = features.nrows(),
            cols = features.ncols(),
            "Loaded purchase-history matrix"
        );

        let scores = self.score(&features).await?;
        let top = top_products(&scores)?;
        info!(products = ?top, "Selected recommendations");

        let message = Message::plain_text(top.join(","));
        Ok(lex::close(
            request,
            session_attributes,
            FulfillmentState::Fulfilled,
            message,
        ))
    }

    /// Download the purchase-history matrix and densify it.
    async fn load_feature_matrix(&self) -> Result<Array2<f64>> {
        let blob = self
            .store
            .fetch(&self.config.artifact_bucket, &self.config.artifact_key)
            .await?;

        // The artifact is staged to a scratch file before decoding.
        let mut scratch = tempfile::NamedTempFile::new()?;
        scratch.write_all(&blob)?;
        let matrix = CsrMatrix::from_npz(scratch.reopen()?)?;

        Ok(matrix.to_dense())
    }

    /// Score the feature rows, one prediction per product.
    async fn score(&self, features: &Array2<f64>) -> Result<Vec<f64>> {
        let payload = InferenceRequest {
            instances: features
                .rows()
                .into_iter()
                .map(|row| Instance {
                    features: row.to_vec(),
                })
                .collect(),
        };
        let body = serde_json::to_vec(&payload)?;

        let raw = self
            .inference
            .invoke(&self.config.inference_endpoint, body)
            .await?;

        let response: InferenceResponse = serde_json::from_slice(&raw)
            .map_err(|e| Error::Inference(format!("Failed to parse predictions: {}", e)))?;

        Ok(response
            .predictions
            .into_iter()
            .map(|prediction| prediction.score)
            .collect())
    }
}

/// Top-scored products, highest first.
///
/// Stable ascending argsort with `total_cmp`, then the last three in
/// reverse. Equal scores keep catalog order in the ascending permutation, so
/// among ties the later catalog entry ranks first in the output.
fn top_products(scores: &[f64]) -> Result<Vec<&'static str>> {
    if scores.len() != PRODUCTS.len() {
        return Err(Error::Inference(format!(
            "Expected {} scores, endpoint returned {}",
            PRODUCTS.len(),
            scores.len()
        )));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    Ok(order
        .iter()
        .rev()
        .take(TOP_N)
        .map(|&index| PRODUCTS[index])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ndarray::Array1;
    use ndarray_npy::NpzWriter;
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::Mutex;

    struct FakeStore {
        bytes: Vec<u8>,
    }

    #[async_trait]
    impl ArtifactStore for FakeStore {
        async fn fetch(&self, _bucket: &str, _key: &str) -> Result<Vec<u8>> {
            Ok(self.bytes.clone())
        }
    }

    struct FakeInference {
        response: Vec<u8>,
        captured: Mutex<Option<Vec<u8>>>,
    }

    impl FakeInference {
        fn returning(response: serde_json::Value) -> Self {
            Self {
                response: serde_json::to_vec(&response).unwrap(),
                captured: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl InferenceClient for FakeInference {
        async fn invoke(&self, _endpoint_name: &str, body: Vec<u8>) -> Result<Vec<u8>> {
            *self.captured.lock().unwrap() = Some(body);
            Ok(self.response.clone())
        }
    }

    fn artifact_bytes() -> Vec<u8> {
        // [[1.0, 0.0], [0.0, 2.0]]
        let mut npz = NpzWriter::new(Cursor::new(Vec::new()));
        npz.add_array("data", &Array1::from(vec![1.0f64, 2.0]))
            .unwrap();
        npz.add_array("indices", &Array1::from(vec![0i32, 1]))
            .unwrap();
        npz.add_array("indptr", &Array1::from(vec![0i32, 1, 2]))
            .unwrap();
        npz.add_array("shape", &Array1::from(vec![2i64, 2])).unwrap();
        npz.finish().unwrap().into_inner()
    }

    fn predictions(scores: &[f64]) -> serde_json::Value {
        json!({
            "predictions": scores
                .iter()
                .map(|score| json!({ "score": score }))
                .collect::<Vec<_>>()
        })
    }

    fn recommend_request() -> IntentRequest {
        serde_json::from_value(json!({
            "sessionId": "session-9",
            "sessionState": {
                "intent": { "name": "Recommend" }
            }
        }))
        .unwrap()
    }

    fn recommender(
        inference: FakeInference,
    ) -> Recommender<FakeStore, FakeInference> {
        Recommender::new(
            FakeStore {
                bytes: artifact_bytes(),
            },
            inference,
            Config::from_env(),
        )
    }

    #[tokio::test]
    async fn test_recommend_returns_top_three_products() {
        let inference =
            FakeInference::returning(predictions(&[1.0, 5.0, 3.0, 2.0, 4.0, 9.0, 8.0, 7.0, 6.0, 0.0]));
        let subject = recommender(inference);

        let response = subject.handle(&recommend_request()).await.unwrap();

        assert_eq!(
            response.messages.as_ref().unwrap()[0].content,
            "B00J46XO9U,B00E5PI594,B004911E9M"
        );
        assert_eq!(
            response.session_state.intent.state,
            Some(FulfillmentState::Fulfilled)
        );
        assert_eq!(response.session_id.as_deref(), Some("session-9"));
    }

    #[tokio::test]
    async fn test_recommend_sends_dense_rows_to_endpoint() {
        let inference =
            FakeInference::returning(predictions(&[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]));
        let subject = recommender(inference);

        subject.handle(&recommend_request()).await.unwrap();

        let body = subject.inference.captured.lock().unwrap().take().unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            payload,
            json!({
                "instances": [
                    { "features": [1.0, 0.0] },
                    { "features": [0.0, 2.0] }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_predictions_is_inference_error() {
        let inference = FakeInference::returning(json!({ "outputs": [] }));
        let subject = recommender(inference);

        let result = subject.handle(&recommend_request()).await;
        assert!(matches!(result, Err(Error::Inference(_))));
    }

    #[tokio::test]
    async fn test_score_count_mismatch_is_inference_error() {
        let inference = FakeInference::returning(predictions(&[1.0, 2.0, 3.0]));
        let subject = recommender(inference);

        let result = subject.handle(&recommend_request()).await;
        assert!(matches!(result, Err(Error::Inference(_))));
    }

    #[test]
    fn test_top_products_orders_by_descending_score() {
        let scores = [1.0, 5.0, 3.0, 2.0, 4.0, 9.0, 8.0, 7.0, 6.0, 0.0];
        let top = top_products(&scores).unwrap();
        assert_eq!(top, vec!["B00J46XO9U", "B00E5PI594", "B004911E9M"]);
    }

    #[test]
    fn test_top_products_tie_break_prefers_later_catalog_entry() {
        let scores = [1.0; 10];
        let top = top_products(&scores).unwrap();
        // Stable ascending sort keeps catalog order, so the reversed tail
        // starts from the last catalog entry.
        assert_eq!(top, vec!["B0067XVNTG", "B005S1CYO6", "B004911E9M"]);
    }
}
