//! Local, free ways to close a deadlocked session.

use crate::core::error::DomainError;
use crate::core::participant::Participant;
use crate::session::{Resolution, Round};

const MANUAL_PREAMBLE: &str = "No consensus was reached. The participants' positions could \
not be reconciled, so the most detailed answer from the final round is presented below \
as the working conclusion. Treat it as one perspective rather than an agreed result.";

/// Accept one participant's latest answer verbatim
pub fn accept_answer(round: &Round, participant: Participant) -> Result<Resolution, DomainError> {
    let response = round
        .response(participant)
        .filter(|r| !r.is_error())
        .ok_or_else(|| DomainError::NoValidResponse(participant.to_string()))?;
    Ok(Resolution::Accepted {
        participant,
        round: round.number(),
        content: response.content.clone(),
    })
}

/// Wrap the round's longest answer in a fixed explanatory preamble
pub fn manual_resolution(round: &Round) -> Result<Resolution, DomainError> {
    let longest = round
        .longest_response()
        .ok_or_else(|| DomainError::NoValidResponse(format!("any participant in round {}", round.number())))?;
    Ok(Resolution::Manual {
        participant: longest.participant,
        round: round.number(),
        content: format!(
            "{MANUAL_PREAMBLE}\n\n--- {} ---\n\n{}",
            longest.participant.display_name(),
            longest.content.trim()
        ),
    })
}
