//! Core domain concepts shared across all subdomains.
//!
//! - [`participant::Participant`]: the three fixed debate participants
//! - [`question::Question`]: a validated question to pose to the debate
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod participant;
pub mod question;
pub mod string;
