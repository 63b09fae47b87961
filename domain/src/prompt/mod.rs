//! Prompt domain
//!
//! Templates for debate rounds, anonymized peer review and chairman synthesis.

mod template;

pub use template::PromptTemplate;
