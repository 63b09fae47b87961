//! Peer Review use case
//!
//! Anonymizes one round, has every participant rank the answers, and
//! attaches the aggregated result to the session.

use crate::config::DebateParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::participant_gateway::{GatewayError, Generation, ParticipantGateway};
use crate::ports::progress::DebateProgressNotifier;
use crate::ports::session_store::SessionStore;
use crate::use_cases::error::DebateError;
use crate::use_cases::shared::{generate_with_retry, load_session};
use debate_domain::peer_review::{anonymize, parse_review};
use debate_domain::{
    HARD_COST_CEILING_USD, Participant, PeerReviewResult, PromptTemplate, hard_ceiling_reached,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;
use tracing::{info, warn};

const KIND: &str = "peer_review";

/// Use case for anonymized peer review of a round
pub struct PeerReviewUseCase<G: ParticipantGateway + 'static, S: SessionStore + 'static> {
    gateway: Arc<G>,
    store: Arc<S>,
    logger: Arc<dyn ConversationLogger>,
    params: DebateParams,
    rng: Mutex<StdRng>,
}

impl<G: ParticipantGateway + 'static, S: SessionStore + 'static> PeerReviewUseCase<G, S> {
    pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
        Self {
            gateway,
            store,
            logger: Arc::new(NoConversationLogger),
            params: DebateParams::default(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_params(mut self, params: DebateParams) -> Self {
        self.params = params;
        self
    }

    /// Fix the shuffle for reproducible label assignment
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Review `round` (the latest round when `None`) of a session
    pub async fn execute(
        &self,
        session_id: &str,
        round: Option<usize>,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<PeerReviewResult, DebateError> {
        let mut session = load_session(self.store.as_ref(), session_id).await?;
        if hard_ceiling_reached(session.total_cost()) {
            return Err(DebateError::HardCeilingReached {
                spent: session.total_cost(),
                ceiling: HARD_COST_CEILING_USD,
            });
        }

        let round_number = match round {
            Some(n) => n,
            None => session
                .latest_round()
                .map(|r| r.number())
                .ok_or(debate_domain::DomainError::NoRounds)?,
        };
        let target = session.round(round_number)?;

        let anonymization = {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            anonymize(target, &mut *rng)?
        };
        let labels = anonymization.labels();
        let prompt = PromptTemplate::review_prompt(session.question(), anonymization.responses());

        info!(
            "Session {}: peer review of round {} ({} answers)",
            session_id,
            round_number,
            labels.len()
        );
        progress.on_enrichment_start(KIND, Participant::ALL.len());

        let mut join_set = JoinSet::new();
        for participant in Participant::ALL {
            let gateway = Arc::clone(&self.gateway);
            let prompt = prompt.clone();
            let model = self.params.model_override(participant).map(str::to_string);
            let policy = self.params.retry.clone();
            join_set.spawn(async move {
                let result =
                    generate_with_retry(gateway.as_ref(), participant, &prompt, model.as_deref(), &policy)
                        .await;
                (participant, result)
            });
        }

        let mut reviews = Vec::new();
        let mut failed = Vec::new();
        let mut cost = 0.0;
        let mut tokens_used = 0;

        while let Some(joined) = join_set.join_next().await {
            let (participant, result): (Participant, Result<Generation, GatewayError>) =
                match joined {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!("Task join error: {}", e);
                        continue;
                    }
                };
            match result {
                Ok(generation) => {
                    progress.on_enrichment_progress(KIND, participant, true);
                    cost += generation.cost;
                    tokens_used += generation.tokens_used;
                    reviews.push(parse_review(participant, &generation.content, &labels));
                }
                Err(e) => {
                    warn!("{} review failed: {}", participant, e);
                    progress.on_enrichment_progress(KIND, participant, false);
                    failed.push(participant);
                }
            }
        }
        reviews.sort_by_key(|r| r.reviewer);
        failed.sort();

        let result = match PeerReviewResult::aggregate(
            round_number,
            &anonymization,
            reviews,
            failed,
            cost,
            tokens_used,
        ) {
            Ok(result) => result,
            Err(e) => {
                // the reviewers that did answer were still paid for
                if cost > 0.0 || tokens_used > 0 {
                    session.record_enrichment_spend(cost, tokens_used);
                    self.store.set(&session).await?;
                }
                progress.on_enrichment_complete(KIND);
                return Err(e.into());
            }
        };
        drop(anonymization);

        session.attach_peer_review(result.clone());
        self.store.set(&session).await?;

        self.logger.log(ConversationEvent::new(
            "peer_review_completed",
            json!({
                "session_id": session_id,
                "round": round_number,
                "winner": result.winner.as_str(),
                "consensus_on_winner": result.consensus_on_winner,
                "failed_reviewers": result.failed_reviewers.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
                "cost": result.cost,
            }),
        ));
        info!(
            "Session {}: peer review winner {} (consensus: {})",
            session_id, result.winner, result.consensus_on_winner
        );
        progress.on_enrichment_complete(KIND);
        Ok(result)
    }
}
