//! Shared helpers for use cases.
//!
//! Retried participant calls, session loading and transcript events used by
//! the round orchestrator and the enrichment use cases.

use crate::config::RetryPolicy;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::participant_gateway::{GatewayError, Generation, ParticipantGateway};
use crate::ports::progress::DebateProgressNotifier;
use crate::ports::session_store::SessionStore;
use crate::use_cases::error::DebateError;
use debate_domain::{Participant, Session, SessionStatus};
use serde_json::json;
use tracing::{debug, info, warn};

/// Call a participant under the retry policy.
///
/// Each attempt is bounded by the policy timeout. Only retryable errors are
/// retried; the cost of failed attempts is never reported.
pub(crate) async fn generate_with_retry<G: ParticipantGateway + ?Sized>(
    gateway: &G,
    participant: Participant,
    prompt: &str,
    model_override: Option<&str>,
    policy: &RetryPolicy,
) -> Result<Generation, GatewayError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let delay = policy.backoff_for(attempt);
        if !delay.is_zero() {
            debug!("Retrying {} in {:?} (attempt {})", participant, delay, attempt);
            tokio::time::sleep(delay).await;
        }

        let call = gateway.generate(participant, prompt, model_override);
        let result = match policy.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(GatewayError::Timeout)),
            None => call.await,
        };

        match result {
            Ok(generation) => return Ok(generation),
            Err(e) if e.is_retryable() && attempt < attempts => {
                warn!("{} attempt {} failed: {}", participant, attempt, e);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Load a session or fail with `SessionNotFound`
pub(crate) async fn load_session<S: SessionStore + ?Sized>(
    store: &S,
    session_id: &str,
) -> Result<Session, DebateError> {
    store
        .get(session_id)
        .await?
        .ok_or_else(|| DebateError::SessionNotFound(session_id.to_string()))
}

/// Transition, then notify progress and the transcript
pub(crate) fn transition(
    session: &mut Session,
    next: SessionStatus,
    progress: &dyn DebateProgressNotifier,
    logger: &dyn ConversationLogger,
) -> Result<(), DebateError> {
    let from = session.status();
    session.transition(next)?;
    info!("Session {} {} -> {}", session.id(), from, next);
    progress.on_status_change(from, next);
    log_status_change(logger, session, from);
    Ok(())
}

pub(crate) fn log_status_change(
    logger: &dyn ConversationLogger,
    session: &Session,
    from: SessionStatus,
) {
    logger.log(ConversationEvent::new(
        "status_changed",
        json!({
            "session_id": session.id(),
            "from": from.as_str(),
            "to": session.status().as_str(),
            "rounds": session.rounds().len(),
            "cost": session.current_cost(),
        }),
    ));
}
