//! JSON-file session store.
//!
//! One pretty-printed document per session at `<dir>/<id>.json`. Writes go
//! to a temporary sibling first and are renamed into place, so readers never
//! observe a half-written session.

use async_trait::async_trait;
use chrono::Utc;
use debate_application::{SessionStore, StoreError};
use debate_domain::Session;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, warn};

const EXTENSION: &str = "json";

pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{id}.{EXTENSION}")))
    }
}

/// Ids become file names, so only `[A-Za-z0-9_-]` is accepted.
pub(crate) fn validate_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

pub(crate) fn cutoff(max_age: Duration) -> Option<chrono::DateTime<Utc>> {
    let age = chrono::Duration::from_std(max_age).ok()?;
    Utc::now().checked_sub_signed(age)
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, id: &str) -> Result<Option<Session>, StoreError> {
        let path = self.path_for(id)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, session: &Session) -> Result<(), StoreError> {
        let path = self.path_for(session.id())?;
        fs::create_dir_all(&self.dir).await?;

        let json = serde_json::to_vec_pretty(session)?;
        let tmp = self.dir.join(format!(".{}.{EXTENSION}.tmp", session.id()));
        fs::write(&tmp, json).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!("Saved session {} to {}", session.id(), path.display());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && validate_id(stem).is_ok()
            {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    async fn cleanup(&self, max_age: Duration) -> Result<usize, StoreError> {
        let Some(cutoff) = cutoff(max_age) else {
            return Ok(0);
        };

        let mut removed = 0;
        for id in self.list().await? {
            let session = match self.get(&id).await {
                Ok(Some(session)) => session,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Skipping unreadable session {}: {}", id, e);
                    continue;
                }
            };
            if session.updated_at() < cutoff && self.delete(&id).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::{DebateSettings, Question};

    fn session() -> Session {
        Session::new(
            Question::new("Is Rust a good fit for CLIs?").unwrap(),
            None,
            DebateSettings::default(),
        )
        .unwrap()
    }

    fn aged(session: &Session, timestamp: &str) -> Session {
        let mut value = serde_json::to_value(session).unwrap();
        value["updated_at"] = serde_json::json!(timestamp);
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("sessions"));
        let s = session();

        assert!(store.get(s.id()).await.unwrap().is_none());
        store.set(&s).await.unwrap();
        assert_eq!(store.get(s.id()).await.unwrap(), Some(s.clone()));
        // no temp file left behind
        let names: Vec<_> = std::fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);

        assert!(store.delete(s.id()).await.unwrap());
        assert!(!store.delete(s.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        let a = session();
        let b = session();
        store.set(&a).await.unwrap();
        store.set(&b).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let mut expected = vec![a.id().to_string(), b.id().to_string()];
        expected.sort();
        assert_eq!(store.list().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("absent"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        let err = store.get("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
        assert!(store.delete("").await.is_err());
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_stale_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        let fresh = session();
        let stale = aged(&session(), "2020-01-01T00:00:00Z");
        store.set(&fresh).await.unwrap();
        store.set(&stale).await.unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let removed = store.cleanup(Duration::from_secs(3600)).await.unwrap();
        assert_eq!(removed, 1);
        assert!(store.get(fresh.id()).await.unwrap().is_some());
        assert!(store.get(stale.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        std::fs::write(dir.path().join("bad.json"), "{").unwrap();
        let err = store.get("bad").await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
