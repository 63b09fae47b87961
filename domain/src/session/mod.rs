//! Debate session domain.
//!
//! - [`entities::Session`]: the only durable entity; owns its rounds
//! - [`round::Round`] / [`round::AgentResponse`]: one graded exchange
//! - [`status::SessionStatus`]: the status state machine
//! - [`strategy::Strategy`]: how later rounds are steered

pub mod entities;
pub mod round;
pub mod status;
pub mod strategy;

pub use entities::{DebateSettings, Resolution, Session};
pub use round::{AgentResponse, Round};
pub use status::{RoundCheckpoint, SessionStatus, CONSENSUS_THRESHOLD};
pub use strategy::Strategy;
