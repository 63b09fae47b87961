//! Run Debate use case
//!
//! Drives a session through rounds until the state machine stops it, and
//! applies caller continuations to paused or deadlocked sessions.

use crate::ports::participant_gateway::ParticipantGateway;
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::ports::session_store::SessionStore;
use crate::use_cases::conduct_round::RoundOrchestrator;
use crate::use_cases::error::DebateError;
use crate::use_cases::shared::{load_session, log_status_change, transition};
use debate_domain::{
    DebateSettings, HARD_COST_CEILING_USD, HumanInterventionRequest, Participant, Question,
    RoundCheckpoint, Session, SessionStatus, accept_answer, check_budget_limit,
    hard_ceiling_reached, manual_resolution,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Input for starting a debate
#[derive(Debug, Clone)]
pub struct StartDebateInput {
    pub question: Question,
    pub context: Option<String>,
    pub settings: DebateSettings,
}

impl StartDebateInput {
    pub fn new(question: Question, settings: DebateSettings) -> Self {
        Self {
            question,
            context: None,
            settings,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// How a caller moves a stopped session forward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Continuation {
    /// Run more rounds, optionally steering the next one.
    ///
    /// A session whose budget cap is spent only resumes with a higher
    /// `max_cost`.
    Resume {
        guidance: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_cost: Option<f64>,
    },
    /// Close a deadlock with one participant's latest answer
    AcceptAnswer { participant: Participant },
    /// Close a deadlock with the free local fallback
    ManualResolve,
}

/// What to do with a session paused between rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundAction {
    /// Run one more round, then pause again
    Next,
    /// Run the remaining rounds without pausing
    Finish,
    /// Give up and declare deadlock
    Stop,
}

/// Session after the loop stopped, plus a human prompt when one is needed
#[derive(Debug, Clone)]
pub struct DebateOutcome {
    pub session: Session,
    pub intervention: Option<HumanInterventionRequest>,
}

impl DebateOutcome {
    fn from_session(session: Session) -> Self {
        let intervention = match session.status() {
            SessionStatus::Deadlock | SessionStatus::Paused => {
                HumanInterventionRequest::from_session(&session)
            }
            _ => None,
        };
        Self {
            session,
            intervention,
        }
    }
}

/// Use case for running and continuing debates
pub struct RunDebateUseCase<G: ParticipantGateway + 'static, S: SessionStore + 'static> {
    orchestrator: RoundOrchestrator<G, S>,
}

impl<G: ParticipantGateway + 'static, S: SessionStore + 'static> RunDebateUseCase<G, S> {
    pub fn new(orchestrator: RoundOrchestrator<G, S>) -> Self {
        Self { orchestrator }
    }

    /// Start with default (no-op) progress
    pub async fn start(&self, input: StartDebateInput) -> Result<DebateOutcome, DebateError> {
        self.start_with_progress(input, &NoProgress).await
    }

    /// Create a session, persist it and run rounds until the loop stops
    pub async fn start_with_progress(
        &self,
        input: StartDebateInput,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<DebateOutcome, DebateError> {
        let mut session = Session::new(input.question, input.context, input.settings)?;
        info!(
            "Starting debate {} (max {} rounds, cap ${:.2}, {} strategy)",
            session.id(),
            session.max_rounds(),
            session.max_cost(),
            session.strategy()
        );
        self.orchestrator.store().set(&session).await?;

        let pause = session.is_interactive();
        self.drive(&mut session, pause, progress).await?;
        Ok(DebateOutcome::from_session(session))
    }

    /// Apply a continuation to a paused or deadlocked session
    pub async fn continue_debate(
        &self,
        session_id: &str,
        continuation: Continuation,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<DebateOutcome, DebateError> {
        let store = self.orchestrator.store();
        let mut session = load_session(store.as_ref(), session_id).await?;

        match continuation {
            Continuation::Resume { guidance, max_cost } => {
                if !session.status().is_resumable() {
                    return Err(DebateError::invalid_state(
                        session_id,
                        session.status(),
                        "resume",
                    ));
                }
                if let Some(cap) = max_cost {
                    session.raise_max_cost(cap)?;
                    info!("Session {}: budget cap raised to ${:.2}", session_id, cap);
                }
                let budget = check_budget_limit(session.current_cost(), session.max_cost());
                if !budget.within_budget {
                    return Err(DebateError::BudgetExhausted {
                        spent: budget.current_cost,
                        cap: session.max_cost(),
                    });
                }
                if session.rounds_remaining() == 0 {
                    let extra = self.orchestrator.params().continuation_rounds;
                    info!("Session {}: granting {} more rounds", session_id, extra);
                    session.extend_max_rounds(extra);
                }
                session.set_guidance(guidance);
                transition(
                    &mut session,
                    SessionStatus::Active,
                    progress,
                    self.orchestrator.logger().as_ref(),
                )?;
                store.set(&session).await?;

                let pause = session.is_interactive();
                self.drive(&mut session, pause, progress).await?;
            }
            Continuation::AcceptAnswer { participant } => {
                self.require_deadlock(&session, "accept an answer")?;
                let round = session.latest_round().ok_or(debate_domain::DomainError::NoRounds)?;
                let resolution = accept_answer(round, participant)?;
                self.resolve(&mut session, resolution, progress).await?;
            }
            Continuation::ManualResolve => {
                self.require_deadlock(&session, "resolve manually")?;
                let round = session.latest_round().ok_or(debate_domain::DomainError::NoRounds)?;
                let resolution = manual_resolution(round)?;
                self.resolve(&mut session, resolution, progress).await?;
            }
        }

        Ok(DebateOutcome::from_session(session))
    }

    /// Decide what happens to a session paused between rounds
    pub async fn continue_round(
        &self,
        session_id: &str,
        action: RoundAction,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<DebateOutcome, DebateError> {
        let store = self.orchestrator.store();
        let mut session = load_session(store.as_ref(), session_id).await?;
        if session.status() != SessionStatus::Paused {
            return Err(DebateError::invalid_state(
                session_id,
                session.status(),
                "continue a round",
            ));
        }

        let logger = self.orchestrator.logger().as_ref();
        match action {
            RoundAction::Stop => {
                transition(&mut session, SessionStatus::Deadlock, progress, logger)?;
                store.set(&session).await?;
            }
            RoundAction::Next | RoundAction::Finish => {
                transition(&mut session, SessionStatus::Active, progress, logger)?;
                store.set(&session).await?;
                let pause = action == RoundAction::Next;
                self.drive(&mut session, pause, progress).await?;
            }
        }

        Ok(DebateOutcome::from_session(session))
    }

    /// Run rounds while the session stays active.
    ///
    /// `pause` moves the session to `paused` after each undecided round.
    async fn drive(
        &self,
        session: &mut Session,
        pause: bool,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<(), DebateError> {
        let store = self.orchestrator.store();
        let logger = self.orchestrator.logger().as_ref();

        while session.status() == SessionStatus::Active {
            if hard_ceiling_reached(session.total_cost()) {
                return self.fail_on_ceiling(session, progress).await;
            }
            if !check_budget_limit(session.current_cost(), session.max_cost()).within_budget {
                info!("Session {}: budget cap reached before dispatch", session.id());
                transition(session, SessionStatus::Deadlock, progress, logger)?;
                store.set(session).await?;
                break;
            }

            self.orchestrator.conduct_round(session, progress).await?;

            let budget = check_budget_limit(session.current_cost(), session.max_cost());
            if budget.within_budget && budget.warning_threshold {
                warn!(
                    "Session {}: ${:.4} spent of ${:.2} cap",
                    session.id(),
                    budget.current_cost,
                    session.max_cost()
                );
                progress.on_budget_warning(&budget, session.max_cost());
            }

            let checkpoint = RoundCheckpoint {
                score: session
                    .latest_round()
                    .map(|r| r.consensus_score())
                    .unwrap_or_default(),
                rounds_completed: session.rounds().len(),
                max_rounds: session.max_rounds(),
                interactive: pause,
                budget,
                hard_ceiling_reached: hard_ceiling_reached(session.total_cost()),
            };

            match checkpoint.decide() {
                Some(SessionStatus::Failed) => return self.fail_on_ceiling(session, progress).await,
                Some(next) => {
                    transition(session, next, progress, logger)?;
                    store.set(session).await?;
                }
                None => {}
            }
        }
        Ok(())
    }

    async fn fail_on_ceiling(
        &self,
        session: &mut Session,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<(), DebateError> {
        let spent = session.total_cost();
        warn!(
            "Session {}: hard cost ceiling reached (${:.4})",
            session.id(),
            spent
        );
        session.fail(format!(
            "hard cost ceiling of ${HARD_COST_CEILING_USD:.2} reached"
        ))?;
        log_status_change(
            self.orchestrator.logger().as_ref(),
            session,
            SessionStatus::Active,
        );
        progress.on_status_change(SessionStatus::Active, SessionStatus::Failed);
        self.orchestrator.store().set(session).await?;
        Err(DebateError::HardCeilingReached {
            spent,
            ceiling: HARD_COST_CEILING_USD,
        })
    }

    fn require_deadlock(&self, session: &Session, operation: &'static str) -> Result<(), DebateError> {
        if session.status() == SessionStatus::Deadlock {
            Ok(())
        } else {
            Err(DebateError::invalid_state(
                session.id(),
                session.status(),
                operation,
            ))
        }
    }

    async fn resolve(
        &self,
        session: &mut Session,
        resolution: debate_domain::Resolution,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<(), DebateError> {
        let from = session.status();
        session.resolve(resolution)?;
        info!("Session {} resolved as {}", session.id(), session.status());
        progress.on_status_change(from, session.status());
        log_status_change(self.orchestrator.logger().as_ref(), session, from);
        self.orchestrator.store().set(session).await?;
        Ok(())
    }
}
