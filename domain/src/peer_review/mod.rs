//! Anonymized peer review of a round.
//!
//! Each participant ranks the round's answers under opaque labels. The
//! label-to-participant mapping lives only inside [`Anonymization`] for the
//! duration of one review and is never serialized.

pub mod aggregate;
pub mod anonymize;
pub mod parse;

pub use aggregate::{MIN_SUCCESSFUL_REVIEWS, ParticipantTally, PeerReviewResult};
pub use anonymize::{AnonymizedResponse, Anonymization, ReviewLabel, anonymize, scrub_identity};
pub use parse::{ParseMethod, ReviewerRanking, parse_review};
