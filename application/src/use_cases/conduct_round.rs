//! Round orchestration
//!
//! Fans one round out to all three participants, applies the 2-of-3 quorum
//! rule, scores the surviving answers and writes the round through to the
//! session store.

use crate::config::DebateParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::participant_gateway::{GatewayError, Generation, ParticipantGateway};
use crate::ports::progress::DebateProgressNotifier;
use crate::ports::session_store::SessionStore;
use crate::use_cases::error::DebateError;
use crate::use_cases::shared::{generate_with_retry, log_status_change};
use debate_domain::{
    AgentResponse, ConsensusScorer, LexicalConsensusScorer, Participant, PromptTemplate, Round,
    ScorableResponse, Session, SessionStatus,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Most participants that may fail before a round is abandoned
const MAX_TOLERATED_FAILURES: usize = 1;

/// Runs single rounds of a debate
pub struct RoundOrchestrator<G: ParticipantGateway + 'static, S: SessionStore + 'static> {
    gateway: Arc<G>,
    store: Arc<S>,
    scorer: Arc<dyn ConsensusScorer>,
    logger: Arc<dyn ConversationLogger>,
    params: DebateParams,
}

impl<G: ParticipantGateway + 'static, S: SessionStore + 'static> RoundOrchestrator<G, S> {
    pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
        Self {
            gateway,
            store,
            scorer: Arc::new(LexicalConsensusScorer::new()),
            logger: Arc::new(NoConversationLogger),
            params: DebateParams::default(),
        }
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn ConsensusScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_params(mut self, params: DebateParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &DebateParams {
        &self.params
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn logger(&self) -> &Arc<dyn ConversationLogger> {
        &self.logger
    }

    /// Run the session's next round.
    ///
    /// On success the round is appended, cost is accumulated and the session
    /// is persisted. With two or more failed participants no round is
    /// created: the session is marked failed, persisted, and the error
    /// returned.
    pub async fn conduct_round(
        &self,
        session: &mut Session,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<usize, DebateError> {
        if session.status() != SessionStatus::Active {
            return Err(DebateError::invalid_state(
                session.id(),
                session.status(),
                "run a round",
            ));
        }

        let round_number = session.next_round_number();
        let prompt = match session.latest_round() {
            None => PromptTemplate::initial_query(session.question(), session.context()),
            Some(previous) => PromptTemplate::follow_up(
                session.question(),
                session.context(),
                previous,
                session.strategy(),
                session.pending_guidance(),
            ),
        };

        info!("Session {}: round {} started", session.id(), round_number);
        progress.on_round_start(round_number, session.max_rounds());
        self.logger.log(ConversationEvent::new(
            "round_started",
            json!({
                "session_id": session.id(),
                "round": round_number,
                "prompt_chars": prompt.chars().count(),
            }),
        ));

        let outcomes = self.dispatch(session.id(), round_number, &prompt, progress).await;

        let failures: Vec<(Participant, GatewayError)> = outcomes
            .iter()
            .filter_map(|(p, r)| r.as_ref().err().map(|e| (*p, e.clone())))
            .collect();

        if failures.len() > MAX_TOLERATED_FAILURES {
            warn!(
                "Session {}: round {} lost quorum ({} failures)",
                session.id(),
                round_number,
                failures.len()
            );
            session.fail(format!(
                "round {round_number} lost quorum: {} of 3 participants failed",
                failures.len()
            ))?;
            log_status_change(self.logger.as_ref(), session, SessionStatus::Active);
            progress.on_status_change(SessionStatus::Active, SessionStatus::Failed);
            self.store.set(session).await?;
            return Err(DebateError::QuorumFailed {
                round: round_number,
                failures,
            });
        }

        let responses: Vec<AgentResponse> = outcomes
            .into_iter()
            .map(|(participant, outcome)| match outcome {
                Ok(g) => AgentResponse::new(
                    participant,
                    g.content,
                    g.confidence,
                    g.model,
                    g.tokens_used,
                    g.cost,
                ),
                Err(e) => AgentResponse::failure(participant, e.to_string()),
            })
            .collect();

        let scorable: Vec<ScorableResponse<'_>> = responses
            .iter()
            .filter(|r| !r.is_error())
            .map(AgentResponse::as_scorable)
            .collect();
        let breakdown = self.scorer.score(&scorable);
        let score = breakdown.overall_score;
        let bucket = breakdown.bucket();

        let round = Round::new(round_number, responses, breakdown)?;
        self.logger.log(ConversationEvent::new(
            "round_scored",
            json!({
                "session_id": session.id(),
                "round": round_number,
                "overall_score": score,
                "bucket": bucket.as_str(),
                "valid_responses": round.valid_count(),
                "cost": round.cost(),
                "tokens_used": round.tokens_used(),
            }),
        ));

        session.record_round(round)?;
        if session.pending_guidance().is_some() {
            session.set_guidance(None);
        }
        self.store.set(session).await?;

        info!(
            "Session {}: round {} scored {:.3} ({})",
            session.id(),
            round_number,
            score,
            bucket
        );
        progress.on_round_complete(round_number, score, bucket);
        Ok(round_number)
    }

    /// Ask every participant concurrently and wait for all of them
    async fn dispatch(
        &self,
        session_id: &str,
        round_number: usize,
        prompt: &str,
        progress: &dyn DebateProgressNotifier,
    ) -> BTreeMap<Participant, Result<Generation, GatewayError>> {
        let mut join_set = JoinSet::new();

        for participant in Participant::ALL {
            let gateway = Arc::clone(&self.gateway);
            let prompt = prompt.to_string();
            let model = self.params.model_override(participant).map(str::to_string);
            let policy = self.params.retry.clone();

            progress.on_participant_start(round_number, participant);
            join_set.spawn(async move {
                let result = generate_with_retry(
                    gateway.as_ref(),
                    participant,
                    &prompt,
                    model.as_deref(),
                    &policy,
                )
                .await;
                (participant, result)
            });
        }

        let mut outcomes = BTreeMap::new();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((participant, Ok(generation))) => {
                    debug!(
                        "{} answered round {} ({} tokens, ${:.4})",
                        participant, round_number, generation.tokens_used, generation.cost
                    );
                    progress.on_participant_complete(round_number, participant, true);
                    self.logger.log(ConversationEvent::new(
                        "participant_response",
                        json!({
                            "session_id": session_id,
                            "round": round_number,
                            "participant": participant.as_str(),
                            "model": generation.model,
                            "confidence": generation.confidence,
                            "tokens_used": generation.tokens_used,
                            "cost": generation.cost,
                            "content": generation.content,
                        }),
                    ));
                    outcomes.insert(participant, Ok(generation));
                }
                Ok((participant, Err(e))) => {
                    warn!("{} failed in round {}: {}", participant, round_number, e);
                    progress.on_participant_complete(round_number, participant, false);
                    self.logger.log(ConversationEvent::new(
                        "participant_failed",
                        json!({
                            "session_id": session_id,
                            "round": round_number,
                            "participant": participant.as_str(),
                            "error": e.to_string(),
                        }),
                    ));
                    outcomes.insert(participant, Err(e));
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        // A panicked task still counts as a failed participant
        for participant in Participant::ALL {
            outcomes
                .entry(participant)
                .or_insert_with(|| Err(GatewayError::Other("participant task aborted".into())));
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::use_cases::test_support::{MemoryStore, ScriptedGateway};
    use debate_domain::{ConsensusBucket, DebateSettings, Question};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl RecordingProgress {
        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl DebateProgressNotifier for RecordingProgress {
        fn on_round_start(&self, round: usize, _max_rounds: usize) {
            self.push(format!("round_start {round}"));
        }

        fn on_participant_start(&self, round: usize, participant: Participant) {
            self.push(format!("waiting {round} {participant}"));
        }

        fn on_participant_complete(&self, round: usize, participant: Participant, success: bool) {
            self.push(format!("done {round} {participant} {success}"));
        }

        fn on_round_complete(&self, round: usize, _score: f64, _bucket: ConsensusBucket) {
            self.push(format!("round_complete {round}"));
        }
    }

    fn orchestrator(gateway: ScriptedGateway) -> RoundOrchestrator<ScriptedGateway, MemoryStore> {
        RoundOrchestrator::new(Arc::new(gateway), Arc::new(MemoryStore::default()))
            .with_params(DebateParams::default().with_retry(RetryPolicy::none()))
    }

    fn session() -> Session {
        Session::new(
            Question::new("Is remote work here to stay?").unwrap(),
            None,
            DebateSettings::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_each_participant_is_awaited_then_reported() {
        let orchestrator = orchestrator(ScriptedGateway::divergent(0.01).failing(Participant::Gpt));
        let progress = RecordingProgress::default();
        let mut session = session();

        let round = orchestrator.conduct_round(&mut session, &progress).await.unwrap();
        assert_eq!(round, 1);

        let events = progress.events();
        assert_eq!(events.first().map(String::as_str), Some("round_start 1"));
        assert_eq!(events.last().map(String::as_str), Some("round_complete 1"));
        for participant in Participant::ALL {
            let waiting = events
                .iter()
                .position(|e| *e == format!("waiting 1 {participant}"))
                .unwrap();
            let done = events
                .iter()
                .position(|e| e.starts_with(&format!("done 1 {participant} ")))
                .unwrap();
            assert!(waiting < done);
        }
        assert!(events.contains(&"done 1 gpt false".to_string()));
        assert_eq!(session.latest_round().unwrap().valid_count(), 2);
    }
}
