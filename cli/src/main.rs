//! CLI entrypoint for parley
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use parley_application::{
    ConversationLogger, NoConversationLogger, NoProgress, ParticipantRegistry, RunBatchUseCase,
    RunParams, RunSessionError, RunSessionInput, RunSessionUseCase, SessionConfig,
    SessionProgressNotifier, SessionStore,
};
use parley_domain::SessionOutput;
use parley_infrastructure::{
    ConfigLoader, FileConfig, FileSessionJobRunner, JsonSessionStore, JsonlConversationLogger,
    Severity, default_registry, discover_jobs, load_session_config, output_to_json,
    persistence::write_output_file,
};
use parley_presentation::{
    BatchArgs, Cli, Command, ConsoleFormatter, HUMAN_CLASS, InspectArgs, ProgressReporter,
    ResumeArgs, RunArgs, SessionOutputArgs, SimpleProgress, register_interactive,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::config_sources() {
            println!("{}", line);
        }
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Could not load configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.log_file.as_deref())?;
    info!("Starting parley");

    for issue in config.validate() {
        match issue.severity {
            Severity::Error => error!("{}: {}", issue.field, issue.message),
            Severity::Warning => warn!("{}: {}", issue.field, issue.message),
        }
    }
    config.ensure_valid()?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(command) = cli.command else {
        bail!("No command given. Try `parley run <session.json>` or `parley --help`.");
    };

    // === Dependency Injection ===
    let registry = Arc::new(register_interactive(default_registry(&config)));
    let store: Arc<dyn SessionStore> = Arc::new(JsonSessionStore::new());
    let show_progress = !cli.quiet && config.output.show_progress;

    match command {
        Command::Run(args) => run(args, &config, registry, store, show_progress).await,
        Command::Resume(args) => resume(args, &config, registry, store, show_progress).await,
        Command::Inspect(args) => inspect(args, store.as_ref()),
        Command::Batch(args) => batch(args, &config, registry, store).await,
    }
}

/// Initialize logging based on verbosity level, optionally mirrored to a file
///
/// Logs go to stderr; stdout is reserved for session output.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;
            let name = path
                .file_name()
                .ok_or_else(|| anyhow!("Log file path {} has no file name", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Run parameters: config file defaults overridden by command-line flags
fn run_params(
    args: &SessionOutputArgs,
    config: &FileConfig,
    fallback_version: Option<&str>,
) -> RunParams {
    let mut params = config.session.to_run_params();
    if let Some(version) = args.prompt_version.as_deref().or(fallback_version) {
        params = params.with_prompt_version(version);
    }
    if args.max_turns.is_some() {
        params = params.with_max_turns(args.max_turns);
    }
    params
}

fn progress_for(show_progress: bool, interactive: bool) -> Arc<dyn SessionProgressNotifier> {
    match (show_progress, interactive) {
        (false, _) => Arc::new(NoProgress),
        (true, true) => Arc::new(SimpleProgress),
        (true, false) => Arc::new(ProgressReporter::new()),
    }
}

fn conversation_logger(config: &FileConfig, label: &str) -> Arc<dyn ConversationLogger> {
    config
        .logging
        .conversation_log_dir
        .as_ref()
        .and_then(|dir| JsonlConversationLogger::for_session(dir, label))
        .map(|logger| {
            info!("Transcript log: {}", logger.path().display());
            Arc::new(logger) as Arc<dyn ConversationLogger>
        })
        .unwrap_or_else(|| Arc::new(NoConversationLogger))
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "session".to_string())
}

fn is_interactive(config: &SessionConfig) -> bool {
    config.persons.iter().any(|p| p.class == HUMAN_CLASS)
}

/// Print or write the session output
fn emit_output(
    output: &SessionOutput,
    args: &SessionOutputArgs,
    config: &FileConfig,
) -> Result<()> {
    let json = args.json || config.output.json;
    let pretty = args.pretty_print || config.output.pretty_print;

    if let Some(path) = &args.output {
        colored::control::set_override(false);
        let content = if json {
            output_to_json(output, pretty)?
        } else {
            ConsoleFormatter::format_output(output)
        };
        write_output_file(path, &content)?;
        eprintln!("Output written to {}", path.display());
    } else if json {
        println!("{}", output_to_json(output, pretty)?);
    } else {
        println!("{}", ConsoleFormatter::format_output(output));
    }
    Ok(())
}

/// Emit whatever the session produced, then turn the error into a report
fn finish(
    result: Result<SessionOutput, RunSessionError>,
    args: &SessionOutputArgs,
    config: &FileConfig,
) -> Result<()> {
    match result {
        Ok(output) => emit_output(&output, args, config),
        Err(RunSessionError::Persistence { source, output }) => {
            emit_output(&output, args, config)?;
            Err(anyhow!(source).context("Session finished but could not be saved"))
        }
        Err(e) => Err(e.into()),
    }
}

async fn run(
    args: RunArgs,
    config: &FileConfig,
    registry: Arc<ParticipantRegistry>,
    store: Arc<dyn SessionStore>,
    show_progress: bool,
) -> Result<()> {
    let session = load_session_config(&args.session)?;
    let params = run_params(&args.output, config, None);
    info!(
        "Running {} with prompt {}",
        args.session.display(),
        params.prompt_version
    );

    let use_case = RunSessionUseCase::new(registry, store)
        .with_progress(progress_for(show_progress, is_interactive(&session)))
        .with_conversation_logger(conversation_logger(config, &file_label(&args.session)));

    let mut input = RunSessionInput::new(session, params);
    if let Some(path) = &args.output.save_session {
        input = input.saving_session_to(path.clone());
    }

    finish(use_case.execute(input).await, &args.output, config)
}

async fn resume(
    args: ResumeArgs,
    config: &FileConfig,
    registry: Arc<ParticipantRegistry>,
    store: Arc<dyn SessionStore>,
    show_progress: bool,
) -> Result<()> {
    let snapshot = store.load(&args.snapshot)?;
    if snapshot.did_end() {
        warn!(
            "{} already ended after {} messages; only the final survey will run",
            args.snapshot.display(),
            snapshot.session_length()
        );
    }
    let saved_version = Some(snapshot.prompt_version.clone()).filter(|v| !v.is_empty());
    let params = run_params(&args.output, config, saved_version.as_deref());
    let interactive = snapshot.persons.iter().any(|p| p.person_type == HUMAN_CLASS);

    let use_case = RunSessionUseCase::new(registry, store)
        .with_progress(progress_for(show_progress, interactive))
        .with_conversation_logger(conversation_logger(config, &file_label(&args.snapshot)));
    let mut room = use_case.restore(snapshot, &params)?;
    info!(
        "Resuming {} at {} messages",
        args.snapshot.display(),
        room.session_length()
    );

    let result = use_case
        .run_room(&mut room, &params, args.output.save_session.clone())
        .await;
    finish(result, &args.output, config)
}

fn inspect(args: InspectArgs, store: &dyn SessionStore) -> Result<()> {
    let snapshot = store.load(&args.snapshot)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", ConsoleFormatter::format_snapshot(&snapshot));
    }
    Ok(())
}

async fn batch(
    args: BatchArgs,
    config: &FileConfig,
    registry: Arc<ParticipantRegistry>,
    store: Arc<dyn SessionStore>,
) -> Result<()> {
    let repetitions = args.repetitions.unwrap_or(config.batch.repetitions);
    let versions = if args.prompt_versions.is_empty() {
        config.batch.prompt_versions.clone()
    } else {
        args.prompt_versions.clone()
    };
    let llm_name = args.llm_name.as_deref().unwrap_or(&config.batch.llm_name);
    let max_workers = args.max_workers.unwrap_or(config.batch.max_workers);

    let jobs = discover_jobs(&args.root, repetitions, &versions, llm_name)
        .with_context(|| format!("Could not list {}", args.root.display()))?;
    info!(
        "Batch over {}: {} jobs ({} repetitions, versions {})",
        args.root.display(),
        jobs.len(),
        repetitions,
        versions.join(", ")
    );

    let runner = FileSessionJobRunner::new(
        RunSessionUseCase::new(registry, store),
        config.session.to_run_params(),
    )
    .with_pretty_print(!args.compact)
    .with_conversation_log_dir(config.logging.conversation_log_dir.clone());

    let report = RunBatchUseCase::new(Arc::new(runner))
        .with_max_workers(max_workers)
        .execute(jobs)
        .await;

    println!("{}", ConsoleFormatter::format_batch_report(&report));
    if !report.is_success() {
        bail!("{} of {} jobs failed", report.failed.len(), report.total());
    }
    Ok(())
}
