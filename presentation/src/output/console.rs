//! Console output formatter for debate results

use colored::Colorize;
use debate_domain::core::string::truncate_chars;
use debate_domain::disagreement::ParticipantPosition;
use debate_domain::{
    DebateReport, DisagreementReport, HumanInterventionRequest, InterventionOption, OutputFormat,
    PeerReviewResult, Resolution, Round, Session, SessionStatus, SynthesisResult,
};
use serde::Serialize;

const LIST_QUESTION_CHARS: usize = 60;

/// JSON shape of a debate outcome
#[derive(Serialize)]
struct OutcomeView<'a> {
    report: &'a DebateReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    intervention: Option<&'a HumanInterventionRequest>,
}

/// Formats debate data for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render a report in the requested format
    pub fn format_report(report: &DebateReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::format_json(report),
            OutputFormat::Full => Self::format_full(report),
            OutputFormat::Summary => Self::format_summary(report),
        }
    }

    /// A report followed by the intervention prompt when one is pending
    pub fn format_outcome(
        report: &DebateReport,
        intervention: Option<&HumanInterventionRequest>,
        format: OutputFormat,
    ) -> String {
        if format == OutputFormat::Json {
            return Self::format_json(&OutcomeView {
                report,
                intervention,
            });
        }
        let mut output = Self::format_report(report, format);
        if let Some(request) = intervention {
            output.push('\n');
            output.push_str(&Self::format_intervention(request));
        }
        output
    }

    /// Turn off ANSI colors for everything rendered afterwards
    pub fn disable_color() {
        colored::control::set_override(false);
    }

    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Every round with its breakdown, then enrichments and the outcome
    pub fn format_full(report: &DebateReport) -> String {
        let session = &report.session;
        let mut output = String::new();

        output.push_str(&Self::header("Consensus Debate"));
        output.push('\n');
        output.push_str(&Self::session_overview(report));

        for round in session.rounds() {
            output.push_str(&Self::section_header(&format!(
                "Round {}: consensus {:.2} ({})",
                round.number(),
                round.consensus_score(),
                round.breakdown().bucket()
            )));
            output.push_str(&Self::breakdown_lines(round));
            output.push_str(&Self::responses(round));
        }

        if let Some(review) = session.peer_review() {
            output.push_str(&Self::format_peer_review(review));
        }
        if let Some(synthesis) = session.synthesis() {
            output.push_str(&Self::format_synthesis(synthesis));
        }
        output.push_str(&Self::outcome(report));
        output.push_str(&Self::footer());
        output
    }

    /// Status, score trend and the latest answers
    pub fn format_summary(report: &DebateReport) -> String {
        let session = &report.session;
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Consensus Debate ===".cyan().bold()
        ));
        output.push_str(&Self::session_overview(report));

        if let Some(round) = session.latest_round() {
            output.push_str(&Self::section_header(&format!(
                "Latest answers (round {})",
                round.number()
            )));
            output.push_str(&Self::responses(round));
        }

        if let Some(synthesis) = session.synthesis() {
            output.push_str(&Self::format_synthesis(synthesis));
        }
        output.push_str(&Self::outcome(report));
        output
    }

    fn session_overview(report: &DebateReport) -> String {
        let session = &report.session;
        let mut output = String::new();

        output.push_str(&format!("{} {}\n", "Session:".cyan().bold(), session.id()));
        output.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            session.question().content()
        ));
        if let Some(context) = session.context() {
            output.push_str(&format!("{} {}\n", "Context:".cyan().bold(), context));
        }
        output.push_str(&format!(
            "{} {}  {} {}/{}  {} {}\n",
            "Status:".cyan().bold(),
            Self::status_label(session.status()),
            "Rounds:".cyan().bold(),
            session.rounds().len(),
            session.max_rounds(),
            "Strategy:".cyan().bold(),
            session.strategy()
        ));

        let mut cost_line = format!(
            "{} ${:.4} of ${:.2}",
            "Cost:".cyan().bold(),
            session.current_cost(),
            session.max_cost()
        );
        if session.enrichment_cost() > 0.0 {
            cost_line.push_str(&format!(" (+${:.4} enrichment)", session.enrichment_cost()));
        }
        if report.budget.warning_threshold {
            cost_line.push_str(&format!("  {}", "budget warning".yellow()));
        }
        output.push_str(&cost_line);
        output.push('\n');

        if !report.score_trend.is_empty() {
            let trend: Vec<String> = report
                .score_trend
                .iter()
                .map(|s| format!("{:.2}", s))
                .collect();
            output.push_str(&format!(
                "{} {}\n",
                "Score trend:".cyan().bold(),
                trend.join(" -> ")
            ));
        }
        if let Some(reason) = session.failure_reason() {
            output.push_str(&format!("{} {}\n", "Failure:".red().bold(), reason));
        }
        output
    }

    fn breakdown_lines(round: &Round) -> String {
        let b = round.breakdown();
        let mut output = format!(
            "  semantic {:.2}  factual {:.2}  tonal {:.2}  structural {:.2}  confidence {:.2}\n",
            b.semantic_similarity,
            b.factual_agreement,
            b.tonal_alignment,
            b.structural_similarity,
            b.confidence_alignment
        );
        for point in &b.agreement_points {
            output.push_str(&format!("  {} {}\n", "+".green(), point));
        }
        for point in &b.disagreement_points {
            output.push_str(&format!("  {} {}\n", "-".red(), point.point));
        }
        for difference in &b.key_differences {
            output.push_str(&format!(
                "  {} {}: {}\n",
                "!".yellow(),
                difference.dimension,
                difference.explanation
            ));
        }
        output
    }

    fn responses(round: &Round) -> String {
        let mut output = String::new();
        for response in round.responses() {
            let name = response.participant.display_name();
            if response.is_error() {
                output.push_str(&format!(
                    "\n{}\nError: {}\n",
                    format!("── {} ──", name).red().bold(),
                    response.error.as_deref().unwrap_or("unknown")
                ));
            } else {
                output.push_str(&format!(
                    "\n{} {}\n{}\n",
                    format!("── {} ──", name).yellow().bold(),
                    format!("({}, confidence {}%)", response.model, response.confidence).dimmed(),
                    response.content
                ));
            }
        }
        output
    }

    fn outcome(report: &DebateReport) -> String {
        let session = &report.session;
        let mut output = String::new();

        if let Some(resolution) = session.resolution() {
            let how = match resolution {
                Resolution::Accepted { participant, round, .. } => format!(
                    "Accepted {}'s answer from round {}",
                    participant.display_name(),
                    round
                ),
                Resolution::Manual { round, .. } => {
                    format!("Manually resolved from round {}", round)
                }
            };
            output.push_str(&Self::section_header("Resolution"));
            output.push_str(&format!("{}\n\n{}\n", how.green().bold(), resolution.content()));
        }

        if let Some(disagreement) = &report.disagreement {
            output.push_str(&Self::disagreement(disagreement));
        }
        output
    }

    fn disagreement(report: &DisagreementReport) -> String {
        let mut output = Self::section_header("Disagreement");
        output.push_str(&format!(
            "{} {}  {} {}/10\n",
            "Type:".cyan().bold(),
            report.disagreement_type,
            "Resolvability:".cyan().bold(),
            report.resolvability_score
        ));
        output.push_str(&format!("{} {}\n", "Core conflict:".cyan().bold(), report.core_conflict));
        for difference in &report.key_differences {
            output.push_str(&format!("  * {}\n", difference));
        }
        output
    }

    pub fn format_peer_review(review: &PeerReviewResult) -> String {
        let mut output = Self::section_header(&format!("Peer review of round {}", review.round));
        for (place, tally) in review.totals.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {:<8} total rank {}  first-place votes {}\n",
                place + 1,
                tally.participant.display_name(),
                tally.total_rank,
                tally.first_place_votes
            ));
        }

        let verdict = if review.consensus_on_winner {
            "reviewers agree".green().to_string()
        } else {
            "no majority for first place".yellow().to_string()
        };
        output.push_str(&format!(
            "{} {} ({})\n",
            "Winner:".cyan().bold(),
            review.winner.display_name().bold(),
            verdict
        ));

        for ranking in &review.reviews {
            let order: Vec<&str> = ranking.ranking.iter().map(|l| l.as_str()).collect();
            output.push_str(&format!(
                "  {} ranked {} {}\n",
                ranking.reviewer.display_name(),
                order.join(" > "),
                format!("[{:?}]", ranking.method).dimmed()
            ));
        }
        if !review.failed_reviewers.is_empty() {
            let failed: Vec<&str> = review
                .failed_reviewers
                .iter()
                .map(|p| p.display_name())
                .collect();
            output.push_str(&format!(
                "  {} {}\n",
                "No review from:".red(),
                failed.join(", ")
            ));
        }
        output.push_str(&format!("{}\n", format!("cost ${:.4}", review.cost).dimmed()));
        output
    }

    pub fn format_synthesis(synthesis: &SynthesisResult) -> String {
        let mut output = Self::section_header(&format!(
            "Synthesis of round {} by {}",
            synthesis.round,
            synthesis.chairman.display_name()
        ));
        output.push_str(&format!("\n{}\n", synthesis.content));
        if !synthesis.agreement_points.is_empty() {
            output.push_str(&format!("\n{}\n", "Areas of Consensus:".green().bold()));
            for point in &synthesis.agreement_points {
                output.push_str(&format!("  * {}\n", point));
            }
        }
        if !synthesis.disagreement_points.is_empty() {
            output.push_str(&format!("\n{}\n", "Disagreements:".yellow().bold()));
            for point in &synthesis.disagreement_points {
                output.push_str(&format!("  * {}\n", point));
            }
        }
        output.push_str(&format!(
            "{}\n",
            format!(
                "confidence {}%  cost ${:.4}",
                synthesis.confidence, synthesis.cost
            )
            .dimmed()
        ));
        output
    }

    /// Deadlock explanation with the commands that act on each option
    pub fn format_intervention(request: &HumanInterventionRequest) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Human Intervention Needed"));
        output.push('\n');
        output.push_str(&format!(
            "Round {} ended in {} with consensus {:.2}.\n",
            request.round,
            Self::status_label(request.status),
            request.consensus_score
        ));
        output.push_str(&Self::disagreement(&request.report));
        output.push_str(&Self::positions(&request.positions));

        output.push_str(&Self::section_header("Options"));
        let id = &request.session_id;
        for option in &request.options {
            let (label, command) = match option {
                InterventionOption::ContinueWithGuidance => (
                    "Continue with guidance".to_string(),
                    format!("continue {id} --resume --guidance \"...\""),
                ),
                InterventionOption::RaiseBudget => (
                    "Raise budget and continue".to_string(),
                    format!("continue {id} --resume --max-cost <USD>"),
                ),
                InterventionOption::AcceptAnswer { participant } => (
                    format!("Accept {}'s answer", participant.display_name()),
                    format!("continue {id} --accept {participant}"),
                ),
                InterventionOption::ManualResolve => (
                    "Resolve manually".to_string(),
                    format!("continue {id} --manual"),
                ),
                InterventionOption::RequestPeerReview => (
                    "Request peer review".to_string(),
                    format!("peer-review {id}"),
                ),
                InterventionOption::RequestSynthesis => (
                    "Request chairman synthesis".to_string(),
                    format!("synthesize {id}"),
                ),
            };
            output.push_str(&format!(
                "  {:<28} {}\n",
                label,
                format!("consensus-debate {command}").dimmed()
            ));
        }
        output
    }

    fn positions(positions: &[ParticipantPosition]) -> String {
        let mut output = Self::section_header("Positions");
        for position in positions {
            output.push_str(&format!(
                "{} {}\n{}\n\n",
                position.participant.display_name().yellow().bold(),
                format!("({}%)", position.confidence).dimmed(),
                Self::indent(&position.summary, "  ")
            ));
        }
        output
    }

    /// One line per session: id, status, rounds, score, question
    pub fn format_session_list(sessions: &[Session]) -> String {
        if sessions.is_empty() {
            return "No stored debates.\n".to_string();
        }
        let mut output = String::new();
        for session in sessions {
            let score = session
                .latest_round()
                .map(|r| format!("{:.2}", r.consensus_score()))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{}  {:<18} {}/{}  {:>4}  {}  {}\n",
                session.id(),
                Self::status_label(session.status()),
                session.rounds().len(),
                session.max_rounds(),
                score,
                session.updated_at().format("%Y-%m-%d %H:%M"),
                truncate_chars(session.question().content(), LIST_QUESTION_CHARS)
            ));
        }
        output
    }

    fn status_label(status: SessionStatus) -> String {
        let text = status.as_str();
        match status {
            SessionStatus::Consensus | SessionStatus::UserAccepted => {
                text.green().bold().to_string()
            }
            SessionStatus::ManuallyResolved => text.green().to_string(),
            SessionStatus::Active | SessionStatus::Paused => text.cyan().to_string(),
            SessionStatus::Deadlock => text.yellow().bold().to_string(),
            SessionStatus::Failed => text.red().bold().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::{
        AgentResponse, ConsensusBreakdown, DebateSettings, Participant, Question,
    };

    fn deadlocked_session() -> Session {
        let mut session = Session::new(
            Question::new("Should we rewrite the service in Rust?").unwrap(),
            None,
            DebateSettings {
                max_rounds: 1,
                ..DebateSettings::default()
            },
        )
        .unwrap();
        let responses = vec![
            AgentResponse::new(Participant::Claude, "Yes, rewrite it.", 80, "m1", 10, 0.01),
            AgentResponse::new(Participant::Gpt, "No, keep it and profile.", 70, "m2", 10, 0.01),
            AgentResponse::failure(Participant::Gemini, "timeout"),
        ];
        let breakdown = ConsensusBreakdown {
            overall_score: 0.41,
            ..ConsensusBreakdown::default()
        };
        session
            .record_round(Round::new(1, responses, breakdown).unwrap())
            .unwrap();
        session.transition(SessionStatus::Deadlock).unwrap();
        session
    }

    #[test]
    fn test_summary_shows_latest_answers_and_disagreement() {
        let report = DebateReport::from_session(deadlocked_session());
        let text = ConsoleFormatter::format_report(&report, OutputFormat::Summary);
        assert!(text.contains("Should we rewrite the service in Rust?"));
        assert!(text.contains("Yes, rewrite it."));
        assert!(text.contains("timeout"));
        assert!(text.contains("0.41"));
        assert!(text.contains("Disagreement"));
    }

    #[test]
    fn test_full_lists_every_round() {
        let report = DebateReport::from_session(deadlocked_session());
        let text = ConsoleFormatter::format_report(&report, OutputFormat::Full);
        assert!(text.contains("Round 1: consensus 0.41"));
        assert!(text.contains("semantic"));
    }

    #[test]
    fn test_json_is_parseable() {
        let report = DebateReport::from_session(deadlocked_session());
        let text = ConsoleFormatter::format_report(&report, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["session"]["status"], "deadlock");
        assert_eq!(value["score_trend"][0], 0.41);
    }

    #[test]
    fn test_intervention_offers_commands_for_valid_participants() {
        let session = deadlocked_session();
        let request = HumanInterventionRequest::from_session(&session).unwrap();
        let text = ConsoleFormatter::format_intervention(&request);
        assert!(text.contains(&format!("continue {} --accept claude", session.id())));
        assert!(text.contains("--accept gpt"));
        assert!(!text.contains("--accept gemini"));
        assert!(text.contains("--resume --guidance"));
        assert!(!text.contains("--max-cost"));
        assert!(text.contains(&format!("peer-review {}", session.id())));
    }

    #[test]
    fn test_outcome_json_carries_intervention() {
        let session = deadlocked_session();
        let request = HumanInterventionRequest::from_session(&session);
        let report = DebateReport::from_session(session);
        let text = ConsoleFormatter::format_outcome(&report, request.as_ref(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["intervention"]["round"], 1);
        assert_eq!(value["report"]["session"]["status"], "deadlock");
    }

    #[test]
    fn test_session_list() {
        assert_eq!(ConsoleFormatter::format_session_list(&[]), "No stored debates.\n");
        let session = deadlocked_session();
        let text = ConsoleFormatter::format_session_list(std::slice::from_ref(&session));
        assert!(text.contains(session.id()));
        assert!(text.contains("1/1"));
    }
}
