use super::anonymize::Anonymization;
use super::parse::ReviewerRanking;
use crate::core::error::DomainError;
use crate::core::participant::Participant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fewer successful reviews than this and no result is produced
pub const MIN_SUCCESSFUL_REVIEWS: usize = 2;

/// Ranking totals for one reviewed participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantTally {
    pub participant: Participant,
    /// Sum of 1-based ranking positions; lower is better
    pub total_rank: usize,
    pub first_place_votes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerReviewResult {
    pub round: usize,
    pub reviews: Vec<ReviewerRanking>,
    #[serde(default)]
    pub failed_reviewers: Vec<Participant>,
    pub totals: Vec<ParticipantTally>,
    pub winner: Participant,
    pub consensus_on_winner: bool,
    pub cost: f64,
    pub tokens_used: u64,
    pub completed_at: DateTime<Utc>,
}

impl PeerReviewResult {
    /// De-anonymize and combine reviewer rankings.
    ///
    /// The winner has the lowest rank total; ties go to the participant that
    /// answered first in the round's original order (Claude, GPT, Gemini),
    /// independent of the shuffled labels. The label mapping is consumed here and
    /// does not survive into the result.
    pub fn aggregate(
        round: usize,
        anonymization: &Anonymization,
        reviews: Vec<ReviewerRanking>,
        failed_reviewers: Vec<Participant>,
        cost: f64,
        tokens_used: u64,
    ) -> Result<Self, DomainError> {
        if reviews.len() < MIN_SUCCESSFUL_REVIEWS {
            return Err(DomainError::InsufficientReviews {
                received: reviews.len(),
                required: MIN_SUCCESSFUL_REVIEWS,
            });
        }

        let mut totals: Vec<ParticipantTally> = anonymization
            .labels()
            .into_iter()
            .filter_map(|label| {
                let participant = anonymization.participant_for(label)?;
                let total_rank = reviews
                    .iter()
                    .map(|r| r.position(label).unwrap_or(anonymization.len()))
                    .sum();
                let first_place_votes = reviews
                    .iter()
                    .filter(|r| r.ranking.first() == Some(&label))
                    .count();
                Some(ParticipantTally {
                    participant,
                    total_rank,
                    first_place_votes,
                })
            })
            .collect();
        totals.sort_by_key(|t| t.participant);

        let leader = totals
            .iter()
            .min_by_key(|t| t.total_rank)
            .ok_or_else(|| DomainError::InvalidInput("no anonymized responses to rank".into()))?;
        let winner = leader.participant;
        let consensus_on_winner = leader.first_place_votes >= 2;

        Ok(Self {
            round,
            reviews,
            failed_reviewers,
            totals,
            winner,
            consensus_on_winner,
            cost,
            tokens_used,
            completed_at: Utc::now(),
        })
    }

    pub fn tally(&self, participant: Participant) -> Option<&ParticipantTally> {
        self.totals.iter().find(|t| t.participant == participant)
    }
}
