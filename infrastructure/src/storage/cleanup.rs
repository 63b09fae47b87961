//! Periodic removal of stale sessions.

use debate_application::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Run `cleanup(max_age)` every `interval` until `cancel` fires.
///
/// The first sweep happens immediately.
pub fn spawn_cleanup_task(
    store: Arc<dyn SessionStore>,
    interval: Duration,
    max_age: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Session cleanup task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match store.cleanup(max_age).await {
                        Ok(0) => debug!("Session cleanup: nothing to remove"),
                        Ok(removed) => info!("Session cleanup removed {} stale session(s)", removed),
                        Err(e) => warn!("Session cleanup failed: {}", e),
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemorySessionStore;
    use debate_domain::{DebateSettings, Question, Session};

    #[tokio::test]
    async fn test_sweeps_then_stops_on_cancel() {
        let store = Arc::new(InMemorySessionStore::new());
        let fresh =
            Session::new(Question::new("q").unwrap(), None, DebateSettings::default()).unwrap();
        let mut value = serde_json::to_value(&fresh).unwrap();
        value["updated_at"] = serde_json::json!("2020-01-01T00:00:00Z");
        let stale: Session = serde_json::from_value(value).unwrap();
        store.set(&stale).await.unwrap();

        let cancel = CancellationToken::new();
        let handle = spawn_cleanup_task(
            store.clone(),
            Duration::from_millis(10),
            Duration::from_secs(3600),
            cancel.clone(),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.is_empty().await);

        cancel.cancel();
        handle.await.unwrap();
    }
}
