//! Session store port
//!
//! Durable storage for debate sessions. Every mutation of a session is
//! written through this port before the use case returns.

use async_trait::async_trait;
use debate_domain::Session;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid session id: {0}")]
    InvalidId(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session; `Ok(None)` when it does not exist
    async fn get(&self, id: &str) -> Result<Option<Session>, StoreError>;

    /// Insert or replace a session under its own id
    async fn set(&self, session: &Session) -> Result<(), StoreError>;

    /// Remove a session, returning whether it existed
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    async fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Remove sessions not updated within `max_age`, returning how many were removed
    async fn cleanup(&self, max_age: Duration) -> Result<usize, StoreError>;
}
