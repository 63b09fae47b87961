//! Participant adapters: command-backed gateway and token pricing.

mod command;
mod pricing;

pub use command::{CommandParticipantGateway, ParticipantCommand};
pub use pricing::{ModelRate, PricingTable};
