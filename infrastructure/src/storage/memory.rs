//! In-memory session store for tests and throwaway runs.

use super::file::{cutoff, validate_id};
use async_trait::async_trait;
use debate_application::{SessionStore, StoreError};
use debate_domain::Session;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn set(&self, session: &Session) -> Result<(), StoreError> {
        validate_id(session.id())?;
        self.sessions
            .write()
            .await
            .insert(session.id().to_string(), session.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn cleanup(&self, max_age: Duration) -> Result<usize, StoreError> {
        let Some(cutoff) = cutoff(max_age) else {
            return Ok(0);
        };
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.updated_at() >= cutoff);
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::{DebateSettings, Question};

    fn session() -> Session {
        Session::new(Question::new("q").unwrap(), None, DebateSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_roundtrip_and_cleanup() {
        let store = InMemorySessionStore::new();
        let fresh = session();
        let mut value = serde_json::to_value(session()).unwrap();
        value["updated_at"] = serde_json::json!("2019-06-01T12:00:00Z");
        let stale: Session = serde_json::from_value(value).unwrap();

        store.set(&fresh).await.unwrap();
        store.set(&stale).await.unwrap();
        assert_eq!(store.len().await, 2);
        assert_eq!(store.get(fresh.id()).await.unwrap(), Some(fresh.clone()));

        assert_eq!(store.cleanup(Duration::from_secs(60)).await.unwrap(), 1);
        assert_eq!(store.list().await.unwrap(), vec![fresh.id().to_string()]);
        assert!(store.delete(fresh.id()).await.unwrap());
        assert!(store.is_empty().await);
    }
}
