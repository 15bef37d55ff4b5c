//! Shared library for the shop-bot intent-handler Lambda.
//!
//! This crate provides the Lex V2 event and response models, the intent
//! handlers, and the AWS-backed collaborator clients.

pub mod config;
pub mod error;
pub mod inference;
pub mod lex;
pub mod matrix;
pub mod recommend;
pub mod shipment;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use inference::{InferenceClient, SageMakerInference};
pub use lex::{IntentRequest, IntentResponse};
pub use recommend::Recommender;
pub use storage::{ArtifactStore, S3ArtifactStore};
