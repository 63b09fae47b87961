//! Progress notification port
//!
//! Defines the interface for reporting progress while a debate runs.

use debate_domain::{BudgetStatus, ConsensusBucket, Participant, SessionStatus};

/// Callback for progress updates during a debate
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console spinners, JSON events, etc.)
pub trait DebateProgressNotifier: Send + Sync {
    /// Called when a round is dispatched to the participants
    fn on_round_start(&self, round: usize, max_rounds: usize);

    /// Called once per participant when its request is sent
    fn on_participant_start(&self, _round: usize, _participant: Participant) {}

    /// Called once per participant when its answer arrives or fails
    fn on_participant_complete(&self, round: usize, participant: Participant, success: bool);

    /// Called when a round has been scored and stored
    fn on_round_complete(&self, round: usize, score: f64, bucket: ConsensusBucket);

    /// Called when spend crosses the warning threshold
    fn on_budget_warning(&self, _budget: &BudgetStatus, _cap: f64) {}

    /// Called after every status transition
    fn on_status_change(&self, _from: SessionStatus, _to: SessionStatus) {}

    /// Called when a peer review or synthesis starts
    fn on_enrichment_start(&self, _kind: &str, _requests: usize) {}

    /// Called when a single enrichment request finishes
    fn on_enrichment_progress(&self, _kind: &str, _participant: Participant, _success: bool) {}

    fn on_enrichment_complete(&self, _kind: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {
    fn on_round_start(&self, _round: usize, _max_rounds: usize) {}
    fn on_participant_complete(&self, _round: usize, _participant: Participant, _success: bool) {}
    fn on_round_complete(&self, _round: usize, _score: f64, _bucket: ConsensusBucket) {}
}
