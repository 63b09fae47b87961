//! Progress reporting while a debate runs

use colored::Colorize;
use debate_application::DebateProgressNotifier;
use debate_domain::{BudgetStatus, ConsensusBucket, Participant, SessionStatus};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports debate progress with indicatif progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    round_bar: Mutex<Option<ProgressBar>>,
    enrichment_bar: Mutex<Option<ProgressBar>>,
    waiting: Mutex<Vec<Participant>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            round_bar: Mutex::new(None),
            enrichment_bar: Mutex::new(None),
            waiting: Mutex::new(Vec::new()),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-")
    }

    fn start_bar(&self, slot: &Mutex<Option<ProgressBar>>, prefix: String, len: usize) {
        let pb = self.multi.add(ProgressBar::new(len as u64));
        pb.set_style(Self::bar_style());
        pb.set_prefix(prefix);
        pb.set_message("waiting for participants...");
        if let Ok(mut slot) = slot.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn tick(slot: &Mutex<Option<ProgressBar>>, message: String) {
        if let Ok(slot) = slot.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(message);
            pb.inc(1);
        }
    }

    fn set_message(slot: &Mutex<Option<ProgressBar>>, message: String) {
        if let Ok(slot) = slot.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(message);
        }
    }

    /// Update the pending set and describe it
    fn update_waiting(&self, participant: Participant, started: bool) -> String {
        let Ok(mut waiting) = self.waiting.lock() else {
            return String::new();
        };
        waiting.retain(|p| *p != participant);
        if started {
            waiting.push(participant);
        }
        waiting_message(&waiting)
    }

    fn finish(slot: &Mutex<Option<ProgressBar>>, message: String) {
        if let Ok(mut slot) = slot.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(message);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn waiting_message(waiting: &[Participant]) -> String {
    if waiting.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = waiting.iter().map(|p| p.display_name()).collect();
    format!("waiting for {}", names.join(", "))
}

fn participant_mark(participant: Participant, success: bool) -> String {
    if success {
        format!("{} {}", "v".green(), participant.display_name())
    } else {
        format!("{} {}", "x".red(), participant.display_name())
    }
}

pub(crate) fn bucket_label(score: f64, bucket: ConsensusBucket) -> String {
    let text = format!("{:.2} ({})", score, bucket);
    match bucket {
        ConsensusBucket::Strong => text.green().bold().to_string(),
        ConsensusBucket::Partial => text.yellow().to_string(),
        ConsensusBucket::Weak => text.red().to_string(),
    }
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_round_start(&self, round: usize, max_rounds: usize) {
        if let Ok(mut waiting) = self.waiting.lock() {
            waiting.clear();
        }
        self.start_bar(
            &self.round_bar,
            format!("Round {}/{}", round, max_rounds),
            Participant::ALL.len(),
        );
    }

    fn on_participant_start(&self, _round: usize, participant: Participant) {
        let message = self.update_waiting(participant, true);
        Self::set_message(&self.round_bar, message);
    }

    fn on_participant_complete(&self, _round: usize, participant: Participant, success: bool) {
        let pending = self.update_waiting(participant, false);
        let mark = participant_mark(participant, success);
        let message = if pending.is_empty() {
            mark
        } else {
            format!("{mark}, {pending}")
        };
        Self::tick(&self.round_bar, message);
    }

    fn on_round_complete(&self, _round: usize, score: f64, bucket: ConsensusBucket) {
        Self::finish(
            &self.round_bar,
            format!("consensus {}", bucket_label(score, bucket)),
        );
    }

    fn on_budget_warning(&self, budget: &BudgetStatus, cap: f64) {
        let _ = self.multi.println(format!(
            "{} spent ${:.4} of ${:.2} budget",
            "Budget warning:".yellow().bold(),
            budget.current_cost,
            cap
        ));
    }

    fn on_status_change(&self, from: SessionStatus, to: SessionStatus) {
        let _ = self.multi.println(format!(
            "{} {} -> {}",
            "Status:".cyan(),
            from,
            to.to_string().bold()
        ));
    }

    fn on_enrichment_start(&self, kind: &str, requests: usize) {
        self.start_bar(&self.enrichment_bar, capitalize(kind), requests);
    }

    fn on_enrichment_progress(&self, _kind: &str, participant: Participant, success: bool) {
        Self::tick(&self.enrichment_bar, participant_mark(participant, success));
    }

    fn on_enrichment_complete(&self, kind: &str) {
        Self::finish(&self.enrichment_bar, format!("{} complete", kind.green()));
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_round_start(&self, round: usize, max_rounds: usize) {
        println!(
            "{} {}",
            "->".cyan(),
            format!("Round {}/{}", round, max_rounds).bold()
        );
    }

    fn on_participant_start(&self, _round: usize, participant: Participant) {
        println!("  {}", waiting_message(&[participant]).dimmed());
    }

    fn on_participant_complete(&self, _round: usize, participant: Participant, success: bool) {
        if success {
            println!("  {}", participant_mark(participant, true));
        } else {
            println!("  {} (failed)", participant_mark(participant, false));
        }
    }

    fn on_round_complete(&self, _round: usize, score: f64, bucket: ConsensusBucket) {
        println!("  consensus {}", bucket_label(score, bucket));
        println!();
    }

    fn on_budget_warning(&self, budget: &BudgetStatus, cap: f64) {
        println!(
            "{} spent ${:.4} of ${:.2} budget",
            "Budget warning:".yellow().bold(),
            budget.current_cost,
            cap
        );
    }

    fn on_enrichment_start(&self, kind: &str, requests: usize) {
        println!("{} {} ({} requests)", "->".cyan(), capitalize(kind).bold(), requests);
    }

    fn on_enrichment_progress(&self, _kind: &str, participant: Participant, success: bool) {
        println!("  {}", participant_mark(participant, success));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("peer review"), "Peer review");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_reporter_survives_out_of_order_events() {
        let reporter = ProgressReporter::new();
        reporter.on_participant_complete(1, Participant::Claude, true);
        reporter.on_round_complete(1, 0.5, ConsensusBucket::Weak);
        reporter.on_round_start(2, 3);
        reporter.on_round_start(2, 3);
        reporter.on_participant_complete(2, Participant::Gpt, false);
        reporter.on_round_complete(2, 0.9, ConsensusBucket::Strong);
        reporter.on_enrichment_complete("synthesis");
    }

    #[test]
    fn test_waiting_message_tracks_pending_participants() {
        assert_eq!(waiting_message(&[]), "");
        assert_eq!(
            waiting_message(&[Participant::Claude, Participant::Gemini]),
            "waiting for Claude, Gemini"
        );

        let reporter = ProgressReporter::new();
        reporter.on_round_start(1, 3);
        for participant in Participant::ALL {
            reporter.on_participant_start(1, participant);
        }
        assert_eq!(
            reporter.update_waiting(Participant::Gpt, false),
            "waiting for Claude, Gemini"
        );
        reporter.on_participant_complete(1, Participant::Claude, true);
        assert_eq!(*reporter.waiting.lock().unwrap(), vec![Participant::Gemini]);
    }

    #[test]
    fn test_bucket_label_contains_score() {
        let label = bucket_label(0.7234, ConsensusBucket::Partial);
        assert!(label.contains("0.72"));
        assert!(label.contains("partial"));
    }
}
