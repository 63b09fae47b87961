//! CLI entrypoint for consensus-debate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use debate_application::{
    Continuation, ConversationLogger, DebateParams, DebateProgressNotifier,
    InspectSessionUseCase, NoConversationLogger, NoProgress, PeerReviewUseCase, RoundAction,
    RoundOrchestrator, RunDebateUseCase, StartDebateInput, SynthesizeUseCase,
};
use debate_domain::{DebateReport, OutputFormat, Question, Severity};
use debate_infrastructure::{
    CommandParticipantGateway, ConfigLoader, FileConfig, FileSessionStore,
    JsonlConversationLogger, PricingTable, spawn_cleanup_task,
};
use debate_presentation::{
    Cli, Command, ConsoleFormatter, ContinueArgs, FormatArg, ProgressReporter, RoundActionArg,
    StartArgs,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

type Gateway = CommandParticipantGateway;
type Store = FileSessionStore;

/// Wired adapters shared by every command
struct App {
    gateway: Arc<Gateway>,
    store: Arc<Store>,
    logger: Arc<dyn ConversationLogger>,
    params: DebateParams,
    config: FileConfig,
    progress: Box<dyn DebateProgressNotifier>,
}

impl App {
    fn run_debate(&self) -> RunDebateUseCase<Gateway, Store> {
        let orchestrator = RoundOrchestrator::new(self.gateway.clone(), self.store.clone())
            .with_logger(self.logger.clone())
            .with_params(self.params.clone());
        RunDebateUseCase::new(orchestrator)
    }

    fn inspect(&self) -> InspectSessionUseCase<Store> {
        InspectSessionUseCase::new(self.store.clone())
    }

    fn format(&self, requested: Option<FormatArg>) -> OutputFormat {
        requested
            .map(OutputFormat::from)
            .or(self.config.output.format)
            .unwrap_or_default()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };

    let log_file = cli.log_file.as_deref().or(config.logging.file.as_deref());
    let _log_guard = init_logging(cli.verbose, log_file)?;

    info!("Starting consensus-debate");

    if cli.no_color || !config.output.color {
        ConsoleFormatter::disable_color();
    }

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("config error: {}", issue.message),
            Severity::Warning => eprintln!("config warning: {}", issue.message),
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Configuration has errors; fix them or run with --no-config");
    }

    let Some(command) = cli.command else {
        bail!("No command given. Run with --help for usage.");
    };

    // === Dependency Injection ===
    let storage_dir = config.storage.resolved_dir();
    info!("Session store: {}", storage_dir.display());
    let store = Arc::new(FileSessionStore::new(storage_dir));
    let gateway = Arc::new(CommandParticipantGateway::from_config(
        &config.participants,
        PricingTable::from_config(&config.pricing),
    ));
    let logger: Arc<dyn ConversationLogger> = match config
        .logging
        .conversation_log
        .as_ref()
        .and_then(JsonlConversationLogger::new)
    {
        Some(jsonl) => {
            info!("Debate transcript: {}", jsonl.path().display());
            Arc::new(jsonl)
        }
        None => Arc::new(NoConversationLogger),
    };
    let progress: Box<dyn DebateProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let app = App {
        gateway,
        store,
        logger,
        params: config.to_debate_params(),
        config,
        progress,
    };

    let cancel = CancellationToken::new();
    let cleanup = match (&command, app.config.storage.cleanup_interval()) {
        (Command::Cleanup { .. } | Command::List, _) | (_, None) => None,
        (_, Some(interval)) => Some(spawn_cleanup_task(
            app.store.clone(),
            interval,
            app.config.storage.max_age(),
            cancel.clone(),
        )),
    };

    let result = run(&app, command).await;

    cancel.cancel();
    if let Some(handle) = cleanup
        && let Err(e) = handle.await
    {
        warn!("Cleanup task ended abnormally: {}", e);
    }

    result
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Start(args) => start(app, args).await,
        Command::Continue(args) => continue_debate(app, args).await,
        Command::Round { id, action } => {
            let action = match action {
                RoundActionArg::Next => RoundAction::Next,
                RoundActionArg::Finish => RoundAction::Finish,
                RoundActionArg::Stop => RoundAction::Stop,
            };
            let outcome = app
                .run_debate()
                .continue_round(&id, action, app.progress.as_ref())
                .await?;
            print_outcome(app, outcome, None);
            Ok(())
        }
        Command::Analyze { id, format } => {
            let request = app.inspect().analyze_disagreement(&id).await?;
            let output = match OutputFormat::from(format) {
                OutputFormat::Json => ConsoleFormatter::format_json(&request),
                _ => ConsoleFormatter::format_intervention(&request),
            };
            println!("{}", output);
            Ok(())
        }
        Command::PeerReview { id, round } => {
            let review = PeerReviewUseCase::new(app.gateway.clone(), app.store.clone())
                .with_logger(app.logger.clone())
                .with_params(app.params.clone())
                .execute(&id, round, app.progress.as_ref())
                .await?;
            println!("{}", ConsoleFormatter::format_peer_review(&review));
            Ok(())
        }
        Command::Synthesize {
            id,
            round,
            chairman,
        } => {
            let synthesis = SynthesizeUseCase::new(app.gateway.clone(), app.store.clone())
                .with_logger(app.logger.clone())
                .with_params(app.params.clone())
                .execute(&id, round, chairman, app.progress.as_ref())
                .await?;
            println!("{}", ConsoleFormatter::format_synthesis(&synthesis));
            Ok(())
        }
        Command::Report { id, format } => {
            let report = app.inspect().report(&id).await?;
            println!(
                "{}",
                ConsoleFormatter::format_report(&report, app.format(format))
            );
            Ok(())
        }
        Command::List => {
            let sessions = app.inspect().list().await?;
            print!("{}", ConsoleFormatter::format_session_list(&sessions));
            Ok(())
        }
        Command::Cleanup { max_age_hours } => {
            let max_age = match max_age_hours {
                Some(hours) => Duration::from_secs(hours.saturating_mul(3600)),
                None => app.config.storage.max_age(),
            };
            let removed = app.inspect().cleanup(max_age).await?;
            println!("Removed {} stale debate(s)", removed);
            Ok(())
        }
    }
}

async fn start(app: &App, args: StartArgs) -> Result<()> {
    let mut settings = app.params.defaults.clone();
    if let Some(max_rounds) = args.max_rounds {
        settings.max_rounds = max_rounds;
    }
    if let Some(max_cost) = args.max_cost {
        settings.max_cost = max_cost;
    }
    if let Some(strategy) = args.strategy {
        settings.strategy = strategy;
    }
    settings.interactive |= args.interactive;

    let question = Question::new(args.question).context("Invalid question")?;
    let mut input = StartDebateInput::new(question, settings);
    if let Some(context) = args.context {
        input = input.with_context(context);
    }

    let outcome = app
        .run_debate()
        .start_with_progress(input, app.progress.as_ref())
        .await?;
    print_outcome(app, outcome, args.format);
    Ok(())
}

async fn continue_debate(app: &App, args: ContinueArgs) -> Result<()> {
    let continuation = if args.resume {
        Continuation::Resume {
            guidance: args.guidance,
            max_cost: args.max_cost,
        }
    } else if let Some(participant) = args.accept {
        Continuation::AcceptAnswer { participant }
    } else {
        Continuation::ManualResolve
    };

    let outcome = app
        .run_debate()
        .continue_debate(&args.id, continuation, app.progress.as_ref())
        .await?;
    print_outcome(app, outcome, args.format);
    Ok(())
}

fn print_outcome(
    app: &App,
    outcome: debate_application::DebateOutcome,
    format: Option<FormatArg>,
) {
    let intervention = outcome.intervention;
    let report = DebateReport::from_session(outcome.session);
    println!(
        "{}",
        ConsoleFormatter::format_outcome(&report, intervention.as_ref(), app.format(format))
    );
}

/// stderr logging by verbosity, plus an optional plain-text file
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    let Some(path) = log_file else {
        tracing_subscriber::registry().with(stderr_layer).init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        dir, file_name,
    ));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(Some(guard))
}
