//! Chairman Synthesis use case
//!
//! One participant, chosen by the caller or by question routing, writes a
//! synthesis of a round.

use crate::config::DebateParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::participant_gateway::ParticipantGateway;
use crate::ports::progress::DebateProgressNotifier;
use crate::ports::session_store::SessionStore;
use crate::use_cases::error::DebateError;
use crate::use_cases::shared::{generate_with_retry, load_session};
use debate_domain::{
    DomainError, HARD_COST_CEILING_USD, Participant, PromptTemplate, SynthesisResult,
    hard_ceiling_reached, select_optimal_chairman,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

const KIND: &str = "synthesis";

/// Use case for chairman synthesis of a round
pub struct SynthesizeUseCase<G: ParticipantGateway + 'static, S: SessionStore + 'static> {
    gateway: Arc<G>,
    store: Arc<S>,
    logger: Arc<dyn ConversationLogger>,
    params: DebateParams,
}

impl<G: ParticipantGateway + 'static, S: SessionStore + 'static> SynthesizeUseCase<G, S> {
    pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
        Self {
            gateway,
            store,
            logger: Arc::new(NoConversationLogger),
            params: DebateParams::default(),
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

    /// Synthesize `round` (latest when `None`); the chairman is routed from
    /// the question unless given.
    pub async fn execute(
        &self,
        session_id: &str,
        round: Option<usize>,
        chairman: Option<Participant>,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<SynthesisResult, DebateError> {
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
                .ok_or(DomainError::NoRounds)?,
        };
        let chairman = chairman.unwrap_or_else(|| select_optimal_chairman(&session));
        let target = session.round(round_number)?;
        let prompt = PromptTemplate::synthesis_prompt(session.question(), target);

        info!(
            "Session {}: {} chairs synthesis of round {}",
            session_id, chairman, round_number
        );
        progress.on_enrichment_start(KIND, 1);

        let generation = match generate_with_retry(
            self.gateway.as_ref(),
            chairman,
            &prompt,
            self.params.model_override(chairman),
            &self.params.retry,
        )
        .await
        {
            Ok(generation) => generation,
            Err(e) => {
                warn!("Synthesis by {} failed: {}", chairman, e);
                progress.on_enrichment_progress(KIND, chairman, false);
                return Err(DebateError::SynthesisFailed {
                    participant: chairman,
                    source: e,
                });
            }
        };
        progress.on_enrichment_progress(KIND, chairman, true);

        let result = SynthesisResult::new(
            chairman,
            target,
            generation.content,
            generation.confidence,
            generation.model,
            generation.cost,
            generation.tokens_used,
        );
        session.attach_synthesis(result.clone());
        self.store.set(&session).await?;

        self.logger.log(ConversationEvent::new(
            "synthesis_completed",
            json!({
                "session_id": session_id,
                "round": round_number,
                "chairman": chairman.as_str(),
                "model": result.model,
                "confidence": result.confidence,
                "cost": result.cost,
                "content": result.content,
            }),
        ));
        progress.on_enrichment_complete(KIND);
        Ok(result)
    }
}
