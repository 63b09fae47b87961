//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod conduct_round;
pub mod error;
pub mod inspect;
pub mod peer_review;
pub mod run_debate;
pub(crate) mod shared;
pub mod synthesize;

#[cfg(test)]
pub(crate) mod test_support;
