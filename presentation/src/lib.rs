//! Presentation layer for consensus-debate
//!
//! This crate contains the CLI definitions, the console/JSON output
//! formatter and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, ContinueArgs, FormatArg, RoundActionArg, StartArgs};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
