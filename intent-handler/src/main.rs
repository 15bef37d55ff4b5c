//! Intent-Handler Lambda - Fulfills Lex V2 intents for the shop bot.
//!
//! Routes incoming intent-recognition events to the shipment-status or
//! product-recommendation handler and returns the Lex dialog response.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use shared::lex::{RECOMMEND_INTENT, SHIPMENT_INTENT};
use shared::{
    shipment, ArtifactStore, Config, InferenceClient, IntentRequest, IntentResponse, Recommender,
    S3ArtifactStore, SageMakerInference,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct AppState {
    recommender: Recommender<S3ArtifactStore, SageMakerInference>,
}

impl AppState {
    async fn new() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let store = S3ArtifactStore::new(aws_sdk_s3::Client::new(&config));
        let inference = SageMakerInference::new(aws_sdk_sagemakerruntime::Client::new(&config));

        Self {
            recommender: Recommender::new(store, inference, Config::from_env()),
        }
    }
}

/// Route the event to the matching intent handler.
async fn dispatch<S, I>(
    recommender: &Recommender<S, I>,
    request: &IntentRequest,
) -> Result<IntentResponse, shared::Error>
where
    S: ArtifactStore,
    I: InferenceClient,
{
    match request.session_state.intent.name.as_str() {
        SHIPMENT_INTENT => shipment::handle(request),
        RECOMMEND_INTENT => recommender.handle(request).await,
        other => Err(shared::Error::UnsupportedIntent(other.to_string())),
    }
}

async fn handler(
    state: Arc<AppState>,
    event: LambdaEvent<Value>,
) -> Result<IntentResponse, Error> {
    let (payload, _context) = event.into_parts();
    info!(event = %payload, "Received intent event");

    let request: IntentRequest = serde_json::from_value(payload).map_err(|e| {
        shared::Error::MalformedEvent(format!("Failed to parse intent event: {}", e))
    })?;

    let response = dispatch(&state.recommender, &request).await?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await);
    let state_clone = state.clone();

    run(service_fn(move |event| {
        let state = state_clone.clone();
        async move { handler(state, event).await }
    }))
    .await
}
