//! Application layer for consensus-debate
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DebateParams, RetryPolicy};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    participant_gateway::{GatewayError, Generation, ParticipantGateway},
    progress::{DebateProgressNotifier, NoProgress},
    session_store::{SessionStore, StoreError},
};
pub use use_cases::conduct_round::RoundOrchestrator;
pub use use_cases::error::DebateError;
pub use use_cases::inspect::InspectSessionUseCase;
pub use use_cases::peer_review::PeerReviewUseCase;
pub use use_cases::run_debate::{
    Continuation, DebateOutcome, RoundAction, RunDebateUseCase, StartDebateInput,
};
pub use use_cases::synthesize::SynthesizeUseCase;
