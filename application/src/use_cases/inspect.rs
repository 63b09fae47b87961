//! Read-side use case: disagreement analysis, reports and housekeeping.

use crate::ports::session_store::SessionStore;
use crate::use_cases::error::DebateError;
use crate::use_cases::shared::load_session;
use debate_domain::{DebateReport, DomainError, HumanInterventionRequest, Session};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Use case for reading sessions without running any participant call
pub struct InspectSessionUseCase<S: SessionStore + 'static> {
    store: Arc<S>,
}

impl<S: SessionStore + 'static> InspectSessionUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Analyze the latest round of a session, in any status
    pub async fn analyze_disagreement(
        &self,
        session_id: &str,
    ) -> Result<HumanInterventionRequest, DebateError> {
        let session = load_session(self.store.as_ref(), session_id).await?;
        HumanInterventionRequest::from_session(&session).ok_or(DebateError::Domain(DomainError::NoRounds))
    }

    pub async fn report(&self, session_id: &str) -> Result<DebateReport, DebateError> {
        let session = load_session(self.store.as_ref(), session_id).await?;
        Ok(DebateReport::from_session(session))
    }

    /// All stored sessions, most recently updated first.
    ///
    /// Ids that vanish between listing and loading are skipped.
    pub async fn list(&self) -> Result<Vec<Session>, DebateError> {
        let mut sessions = Vec::new();
        for id in self.store.list().await? {
            match self.store.get(&id).await? {
                Some(session) => sessions.push(session),
                None => warn!("Session {} disappeared while listing", id),
            }
        }
        sessions.sort_by_key(|s| std::cmp::Reverse(s.updated_at()));
        Ok(sessions)
    }

    pub async fn delete(&self, session_id: &str) -> Result<(), DebateError> {
        if self.store.delete(session_id).await? {
            Ok(())
        } else {
            Err(DebateError::SessionNotFound(session_id.to_string()))
        }
    }

    pub async fn cleanup(&self, max_age: Duration) -> Result<usize, DebateError> {
        let removed = self.store.cleanup(max_age).await?;
        info!("Removed {} sessions older than {:?}", removed, max_age);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::MemoryStore;
    use debate_domain::{
        AgentResponse, ConsensusBreakdown, DebateSettings, Participant, Question, Round,
    };

    fn session(with_round: bool) -> Session {
        let mut session =
            Session::new(Question::new("q").unwrap(), None, DebateSettings::default()).unwrap();
        if with_round {
            let responses = Participant::ALL
                .iter()
                .map(|p| AgentResponse::new(*p, "The answer depends on scale.", 70, "m", 5, 0.01))
                .collect();
            session
                .record_round(Round::new(1, responses, ConsensusBreakdown::default()).unwrap())
                .unwrap();
        }
        session
    }

    #[tokio::test]
    async fn test_analyze_disagreement() {
        let store = Arc::new(MemoryStore::default());
        let s = session(true);
        let id = s.id().to_string();
        store.insert(s);

        let uc = InspectSessionUseCase::new(store);
        let request = uc.analyze_disagreement(&id).await.unwrap();
        assert_eq!(request.round, 1);
        assert_eq!(request.report.key_differences.len(), 3);
    }

    #[tokio::test]
    async fn test_analyze_without_rounds() {
        let store = Arc::new(MemoryStore::default());
        let s = session(false);
        let id = s.id().to_string();
        store.insert(s);

        let uc = InspectSessionUseCase::new(store);
        let err = uc.analyze_disagreement(&id).await.unwrap_err();
        assert!(matches!(err, DebateError::Domain(DomainError::NoRounds)));
    }

    #[tokio::test]
    async fn test_report_and_list() {
        let store = Arc::new(MemoryStore::default());
        let first = session(true);
        let second = session(false);
        let first_id = first.id().to_string();
        store.insert(first);
        store.insert(second);

        let uc = InspectSessionUseCase::new(store);
        let report = uc.report(&first_id).await.unwrap();
        assert_eq!(report.score_trend.len(), 1);
        assert_eq!(uc.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_session() {
        let uc = InspectSessionUseCase::new(Arc::new(MemoryStore::default()));
        assert!(matches!(
            uc.delete("nope").await.unwrap_err(),
            DebateError::SessionNotFound(_)
        ));
    }
}
