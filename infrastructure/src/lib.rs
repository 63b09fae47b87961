//! Infrastructure layer for consensus-debate
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: command-backed participants, session stores, the JSONL
//! transcript logger and configuration file loading.

pub mod config;
pub mod logging;
pub mod participants;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use logging::JsonlConversationLogger;
pub use participants::{CommandParticipantGateway, ParticipantCommand, PricingTable};
pub use storage::{FileSessionStore, InMemorySessionStore, spawn_cleanup_task};
