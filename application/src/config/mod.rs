//! Application-level configuration.
//!
//! - [`DebateParams`]: defaults and continuation rules for debate use cases
//! - [`RetryPolicy`]: per-call timeout and backoff for participant requests

pub mod debate_params;
pub mod retry_policy;

pub use debate_params::DebateParams;
pub use retry_policy::RetryPolicy;
