//! Participant gateway port
//!
//! Defines the interface for asking one of the three debate participants
//! to answer a prompt.

use async_trait::async_trait;
use debate_domain::Participant;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while generating a participant answer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Whether a fresh attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::ConnectionError(_)
                | GatewayError::RateLimited(_)
                | GatewayError::RequestFailed(_)
                | GatewayError::Timeout
        )
    }
}

/// A normalized participant answer.
///
/// Provider-specific payloads are parsed inside the adapter; the core only
/// ever sees this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub content: String,
    pub confidence: u8,
    pub model: String,
    pub tokens_used: u64,
    pub cost: f64,
}

/// Gateway to the debate participants
///
/// Implementations (adapters) live in the infrastructure layer and own
/// pricing: `cost` is computed by the adapter from its rate table.
#[async_trait]
pub trait ParticipantGateway: Send + Sync {
    /// Ask `participant` to answer `prompt`, optionally with a specific model
    async fn generate(
        &self,
        participant: Participant,
        prompt: &str,
        model_override: Option<&str>,
    ) -> Result<Generation, GatewayError>;
}
