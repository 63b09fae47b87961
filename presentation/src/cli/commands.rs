//! CLI command definitions

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use debate_domain::{OutputFormat, Participant, Strategy};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Every round with its consensus breakdown
    Full,
    /// Status, score trend and the latest answers
    Summary,
    /// Raw report data as JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Full => OutputFormat::Full,
            FormatArg::Summary => OutputFormat::Summary,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// What to do with a session paused between rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoundActionArg {
    /// Run one more round, then pause again
    Next,
    /// Run the remaining rounds without pausing
    Finish,
    /// Stop debating and move to intervention
    Stop,
}

/// CLI arguments for consensus-debate
#[derive(Parser, Debug)]
#[command(name = "consensus-debate")]
#[command(author, version, about = "Three models debate a question until they agree")]
#[command(long_about = r#"
Consensus Debate puts one question to Claude, GPT and Gemini and runs
structured rounds until their answers converge.

Each round:
1. All three participants answer in parallel (2 of 3 must succeed)
2. The answers are scored on five consensus dimensions
3. The session ends in consensus (score >= 0.85), deadlock (rounds or
   budget exhausted) or pauses for you in interactive mode

Deadlocks can be resumed with guidance, settled by accepting one answer,
or enriched with an anonymous peer review or a chairman synthesis.

Configuration files are loaded from (in priority order):
1. DEBATE_* environment variables
2. --config <path>     Explicit config file
3. ./debate.toml       Project-level config
4. ~/.config/consensus-debate/config.toml   Global config

Example:
  consensus-debate start "Should a small team adopt microservices?"
  consensus-debate continue <id> --resume --guidance "Focus on team size"
  consensus-debate peer-review <id>
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write diagnostic logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a new debate
    Start(StartArgs),
    /// Resume or settle a paused or deadlocked debate
    Continue(ContinueArgs),
    /// Decide what happens after an interactive round
    Round {
        id: String,
        #[arg(value_enum)]
        action: RoundActionArg,
    },
    /// Explain why a debate has not converged
    Analyze {
        id: String,
        #[arg(short, long, value_enum, default_value = "summary")]
        format: FormatArg,
    },
    /// Have each participant rank the anonymized answers of a round
    PeerReview {
        id: String,
        /// Round to review (latest by default)
        #[arg(long)]
        round: Option<usize>,
    },
    /// Ask a chairman to synthesize a round into one answer
    Synthesize {
        id: String,
        #[arg(long)]
        round: Option<usize>,
        /// Chairman to use instead of routing by question type
        #[arg(long)]
        chairman: Option<Participant>,
    },
    /// Show a debate
    Report {
        id: String,
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },
    /// List stored debates, most recent first
    List,
    /// Delete debates that have not changed recently
    Cleanup {
        /// Override `[storage] max_age_hours`
        #[arg(long)]
        max_age_hours: Option<u64>,
    },
}

#[derive(Args, Debug)]
pub struct StartArgs {
    pub question: String,

    /// Background shared with every participant
    #[arg(long)]
    pub context: Option<String>,

    #[arg(long)]
    pub max_rounds: Option<usize>,

    /// Soft cost cap in USD
    #[arg(long)]
    pub max_cost: Option<f64>,

    /// consensus or adversarial
    #[arg(long)]
    pub strategy: Option<Strategy>,

    /// Pause after every round
    #[arg(short, long)]
    pub interactive: bool,

    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("continuation")
        .required(true)
        .args(["resume", "accept", "manual"]),
))]
pub struct ContinueArgs {
    pub id: String,

    /// Run more rounds
    #[arg(long)]
    pub resume: bool,

    /// Moderator note injected into the next round
    #[arg(long, requires = "resume")]
    pub guidance: Option<String>,

    /// New budget cap in USD; required once the current cap is spent
    #[arg(long, requires = "resume", value_name = "USD")]
    pub max_cost: Option<f64>,

    /// Settle the deadlock with this participant's latest answer
    #[arg(long, value_name = "PARTICIPANT")]
    pub accept: Option<Participant>,

    /// Settle the deadlock with the longest latest answer
    #[arg(long)]
    pub manual: bool,

    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_parses_options() {
        let cli = Cli::try_parse_from([
            "consensus-debate",
            "-vv",
            "start",
            "Is Rust fast?",
            "--max-rounds",
            "5",
            "--strategy",
            "adversarial",
            "--interactive",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Start(args)) => {
                assert_eq!(args.question, "Is Rust fast?");
                assert_eq!(args.max_rounds, Some(5));
                assert_eq!(args.strategy, Some(Strategy::Adversarial));
                assert!(args.interactive);
                assert!(args.max_cost.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_continue_requires_exactly_one_mode() {
        assert!(Cli::try_parse_from(["consensus-debate", "continue", "abc"]).is_err());
        assert!(
            Cli::try_parse_from([
                "consensus-debate",
                "continue",
                "abc",
                "--resume",
                "--manual"
            ])
            .is_err()
        );

        let cli = Cli::try_parse_from(["consensus-debate", "continue", "abc", "--accept", "gpt"])
            .unwrap();
        match cli.command {
            Some(Command::Continue(args)) => assert_eq!(args.accept, Some(Participant::Gpt)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_guidance_needs_resume() {
        assert!(
            Cli::try_parse_from([
                "consensus-debate",
                "continue",
                "abc",
                "--manual",
                "--guidance",
                "x"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_resume_with_raised_cap() {
        let cli = Cli::try_parse_from([
            "consensus-debate",
            "continue",
            "abc",
            "--resume",
            "--max-cost",
            "2.5",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Continue(args)) => {
                assert!(args.resume);
                assert_eq!(args.max_cost, Some(2.5));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(
            Cli::try_parse_from([
                "consensus-debate",
                "continue",
                "abc",
                "--manual",
                "--max-cost",
                "2.5"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_round_action_and_show_config() {
        let cli = Cli::try_parse_from(["consensus-debate", "round", "abc", "finish"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Round {
                action: RoundActionArg::Finish,
                ..
            })
        ));

        let cli = Cli::try_parse_from(["consensus-debate", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_format_maps_to_domain() {
        assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
        assert_eq!(OutputFormat::from(FormatArg::Summary), OutputFormat::Summary);
    }
}
