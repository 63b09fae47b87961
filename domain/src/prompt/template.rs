//! Prompt templates for debate rounds, peer review and synthesis

use crate::core::question::Question;
use crate::peer_review::AnonymizedResponse;
use crate::session::Round;
use crate::session::strategy::Strategy;

/// Below this overall score a synthesis must keep minority positions visible
const LOW_CONSENSUS_SCORE: f64 = 0.5;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Framing shared by every debate round
    pub fn debate_system() -> &'static str {
        r#"You are one of three independent experts debating a question over several rounds.
Give a thoughtful, well-reasoned answer. Support your points with evidence where you can.
Be concise but complete. End your answer with a line of the form "Confidence: N%"."#
    }

    /// Round 1: the bare question, plus optional caller context
    pub fn initial_query(question: &Question, context: Option<&str>) -> String {
        let mut prompt = format!("{}\n\nQuestion:\n{}\n", Self::debate_system(), question);
        if let Some(context) = context {
            prompt.push_str(&format!("\nContext:\n{}\n", context));
        }
        prompt
    }

    /// Round ≥ 2: the previous round's answers and the strategy's instruction
    pub fn follow_up(
        question: &Question,
        context: Option<&str>,
        previous: &Round,
        strategy: Strategy,
        guidance: Option<&str>,
    ) -> String {
        let mut prompt = Self::initial_query(question, context);
        prompt.push_str(&format!(
            "\nAnswers from round {}:\n",
            previous.number()
        ));
        for response in previous.responses() {
            let body = if response.is_error() {
                "(no response this round)"
            } else {
                response.content.trim()
            };
            prompt.push_str(&format!(
                "\n--- {} ---\n{}\n",
                response.participant.display_name(),
                body
            ));
        }
        if let Some(guidance) = guidance {
            prompt.push_str(&format!("\nModerator guidance:\n{}\n", guidance));
        }
        prompt.push_str(&format!(
            "\nRound {} instructions:\n{}\n",
            previous.number() + 1,
            strategy.round_instruction(previous.number() + 1)
        ));
        prompt
    }

    pub fn review_system() -> &'static str {
        r#"You are a critical reviewer evaluating anonymous answers to the same question.
Judge accuracy, completeness, clarity and practical usefulness. Do not try to guess who wrote each answer."#
    }

    /// Ask for a ranking of anonymized answers using a fixed reply template
    pub fn review_prompt(question: &Question, responses: &[AnonymizedResponse]) -> String {
        let mut prompt = format!(
            "{}\n\nOriginal question: {}\n\nAnswers to review:\n",
            Self::review_system(),
            question
        );
        for response in responses {
            prompt.push_str(&format!(
                "\n--- Response {} ---\n{}\n",
                response.label, response.content
            ));
        }

        prompt.push_str("\nReply using exactly this format:\n\nRANKING:\n");
        for position in 1..=responses.len() {
            prompt.push_str(&format!("{position}. Response <letter>\n"));
        }
        prompt.push_str(
            r#"
BEST ASPECTS:
<what the top-ranked answer does best>

IMPROVEMENTS:
<concrete suggestions for the other answers>"#,
        );
        prompt
    }

    pub fn synthesis_system() -> &'static str {
        r#"You are the chair of a three-expert debate, writing the closing synthesis.
Surface the insight the experts share, weigh the points they dispute, and be honest about what remains unresolved."#
    }

    /// Chairman request for one round: question, scores and every full answer
    pub fn synthesis_prompt(question: &Question, round: &Round) -> String {
        let breakdown = round.breakdown();
        let mut prompt = format!(
            "{}\n\nQuestion: {}\n\nConsensus after round {}: {:.2} overall \
             (semantic {:.2}, factual {:.2}, tonal {:.2}, structural {:.2}, confidence {:.2})\n",
            Self::synthesis_system(),
            question,
            round.number(),
            breakdown.overall_score,
            breakdown.semantic_similarity,
            breakdown.factual_agreement,
            breakdown.tonal_alignment,
            breakdown.structural_similarity,
            breakdown.confidence_alignment,
        );

        if !breakdown.agreement_points.is_empty() {
            prompt.push_str("\nAgreement points:\n");
            for point in &breakdown.agreement_points {
                prompt.push_str(&format!("- {point}\n"));
            }
        }
        if !breakdown.disagreement_points.is_empty() {
            prompt.push_str("\nDisagreement points:\n");
            for point in &breakdown.disagreement_points {
                prompt.push_str(&format!("- {}\n", point.point));
                for view in &point.views {
                    prompt.push_str(&format!(
                        "  - {}: {}\n",
                        view.participant.display_name(),
                        view.view
                    ));
                }
            }
        }

        prompt.push_str("\nFull answers:\n");
        for response in round.valid_responses() {
            prompt.push_str(&format!(
                "\n--- {} (confidence {}%) ---\n{}\n",
                response.participant.display_name(),
                response.confidence,
                response.content.trim()
            ));
        }

        prompt.push_str(
            "\nWrite a short synthesis of two to four paragraphs. Lead with what the experts \
             agree on, then address the open points.",
        );
        if breakdown.overall_score < LOW_CONSENSUS_SCORE {
            prompt.push_str(
                " Agreement is low: present the competing positions side by side and keep \
                 minority views intact instead of forcing a false consensus.",
            );
        }
        prompt.push_str("\nEnd with a line of the form \"Confidence: N%\".");
        prompt
    }
}
