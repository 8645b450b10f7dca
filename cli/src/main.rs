//! CLI entrypoint for OctoPhyx
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use octophyx_application::{
    ContentQueryUseCase, GenerateContentError, GenerateContentInput, GenerateContentUseCase,
    GenerationLogger, NoGenerationLogger, NoPollObserver, PollContentUseCase, PollError,
    PollObserver, ProblemHintsUseCase, ProblemQueryUseCase, SolveProblemInput,
    SolveProblemUseCase,
};
use octophyx_domain::{
    ContentId, ContentRepository, ContentStatus, OutputFormat, OwnerId, PhysicsTopic, ProblemId,
    ProblemRepository, TopicCatalog, TopicCategory,
};
use octophyx_infrastructure::{
    ConfigLoader, FileConfig, JsonlGenerationLogger, OpenAiImageGenerator, OpenAiTextGenerator,
    Storage, StorageBackend, open_storage,
};
use octophyx_presentation::{
    ApiState, Cli, Command, ConsoleFormatter, ProgressReporter, SimpleProgress, TerminalRenderer,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Settings shared by every command
struct App {
    config: FileConfig,
    format: OutputFormat,
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let _log_guard = init_logging(&cli, &config)?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(command) = cli.command.clone() else {
        bail!("No command given. Run `octophyx --help` for usage.");
    };

    let app = App {
        format: cli
            .output
            .map(Into::into)
            .or(config.output.format)
            .unwrap_or_default(),
        quiet: cli.quiet,
        config,
    };

    info!("Starting OctoPhyx");

    match command {
        Command::Generate {
            topic,
            owner,
            detach,
        } => generate(&app, topic, owner.map(OwnerId::new), detach).await,
        Command::Solve {
            text,
            owner,
            category,
            detach,
        } => solve(&app, text, owner.map(OwnerId::new), category, detach).await,
        Command::Problem { id } => problem(&app, ProblemId::new(id)).await,
        Command::Problems { owner } => problems(&app, OwnerId::new(owner)).await,
        Command::Bookmark { id } => bookmark(&app, ProblemId::new(id)).await,
        Command::Hints { id } => hints(&app, ProblemId::new(id)).await,
        Command::Show { id } => show(&app, ContentId::new(id)).await,
        Command::History { owner } => history(&app, OwnerId::new(owner)).await,
        Command::Render { path } => render(&app, path).await,
        Command::Topics { query, category } => topics(&app, query, category),
        Command::Serve { bind } => serve(&app, bind).await,
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("{}", e))
            .context("Failed to load configuration")?
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Install the subscriber. `serve` also logs to a daily file when
/// `[logging] file` is set; the returned guard flushes it on drop.
fn init_logging(cli: &Cli, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match (&cli.command, &config.logging.file) {
        (Some(Command::Serve { .. }), Some(path)) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let prefix = path
                .file_name()
                .with_context(|| format!("logging.file has no file name: {}", path.display()))?;
            let appender = tracing_appender::rolling::daily(directory, prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

// === Dependency Injection ===

async fn storage(config: &FileConfig) -> Result<Storage> {
    open_storage(&config.storage)
        .await
        .context("Failed to open storage")
}

/// Text and image providers from `[providers]`
fn providers(config: &FileConfig) -> Result<(Arc<OpenAiTextGenerator>, Arc<OpenAiImageGenerator>)> {
    let text = OpenAiTextGenerator::new(&config.providers.text)
        .context("Failed to set up the text provider")?;
    let image = OpenAiImageGenerator::new(&config.providers.image)
        .context("Failed to set up the image provider")?;
    info!(model = text.model(), "Text provider ready");
    Ok((Arc::new(text), Arc::new(image)))
}

fn generation_logger(config: &FileConfig) -> Arc<dyn GenerationLogger> {
    match config
        .logging
        .generation_log
        .as_ref()
        .and_then(JsonlGenerationLogger::open)
    {
        Some(logger) => {
            info!(path = %logger.path().display(), "Writing generation log");
            Arc::new(logger)
        }
        None => Arc::new(NoGenerationLogger),
    }
}

fn generate_use_case(
    config: &FileConfig,
    repository: Arc<dyn ContentRepository>,
) -> Result<GenerateContentUseCase> {
    let (text, image) = providers(config)?;
    Ok(GenerateContentUseCase::new(repository, text, image)
        .with_generation_logger(generation_logger(config))
        .with_params(config.generation.to_params()))
}

fn solve_use_case(
    config: &FileConfig,
    repository: Arc<dyn ProblemRepository>,
) -> Result<SolveProblemUseCase> {
    let (text, image) = providers(config)?;
    Ok(SolveProblemUseCase::new(repository, text, image)
        .with_generation_logger(generation_logger(config))
        .with_params(config.generation.to_params()))
}

fn hints_use_case(
    config: &FileConfig,
    repository: Arc<dyn ProblemRepository>,
) -> Result<ProblemHintsUseCase> {
    let (text, _) = providers(config)?;
    Ok(ProblemHintsUseCase::new(repository, text).with_params(&config.generation.to_params()))
}

fn query_use_case(config: &FileConfig, repository: Arc<dyn ContentRepository>) -> ContentQueryUseCase {
    ContentQueryUseCase::new(repository).with_params(&config.generation.to_params())
}

fn problem_query_use_case(
    config: &FileConfig,
    repository: Arc<dyn ProblemRepository>,
) -> ProblemQueryUseCase {
    ProblemQueryUseCase::new(repository).with_params(&config.generation.to_params())
}

/// Cancelled on Ctrl+C
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    token
}

// === Commands ===

async fn generate(app: &App, topic: String, owner: Option<OwnerId>, detach: bool) -> Result<()> {
    let repository = storage(&app.config).await?.content;
    let use_case = generate_use_case(&app.config, repository.clone())?;

    let submitted = use_case
        .submit(GenerateContentInput::new(topic).with_owner(owner))
        .await?;

    if detach {
        warn_memory_detach(app);
        print_output(
            app,
            || ConsoleFormatter::format_json(&submitted.request),
            || ConsoleFormatter::format_submitted(&submitted.request),
        );
        // The run lives on this runtime; returning now would strand the record
        let outcome = submitted.handle.wait_or_cancel_on(interrupt_token()).await;
        return settle(outcome, "Content generation failed");
    }

    if !app.quiet && !app.format.is_json() {
        eprintln!("{}", ConsoleFormatter::format_submitted(&submitted.request));
    }

    let reporter = (!app.quiet && std::io::stderr().is_terminal())
        .then(|| ProgressReporter::new(submitted.request.topic.as_str()));
    let observer: &dyn PollObserver = match (&reporter, app.quiet) {
        (Some(reporter), _) => reporter,
        (None, false) => &SimpleProgress,
        (None, true) => &NoPollObserver,
    };

    let poller = PollContentUseCase::new(repository).with_params(&app.config.generation.to_params());
    let cancel = interrupt_token();

    let record = match poller.poll(submitted.request.id, observer, cancel).await {
        Ok(record) => record,
        Err(e) => {
            if let Some(reporter) = &reporter {
                reporter.abandon("Stopped");
            }
            // Cancel and wait, so the record is failed before exit
            submitted.handle.cancel();
            let _ = submitted.handle.wait().await;
            if e.is_cancelled() {
                bail!("Generation cancelled");
            }
            if let PollError::DeadlineExceeded { .. } = e {
                warn!(content_id = %submitted.request.id, "Polling deadline passed; request cancelled");
            }
            return Err(e.into());
        }
    };

    let outcome = submitted.handle.wait().await;

    print_output(
        app,
        || ConsoleFormatter::format_json(&record),
        || ConsoleFormatter::format_request(&record),
    );

    match (record.status, outcome) {
        (ContentStatus::Failed, Err(e)) => Err(anyhow!(e).context("Content generation failed")),
        (ContentStatus::Failed, Ok(_)) => bail!("Content generation failed"),
        _ => Ok(()),
    }
}

async fn solve(
    app: &App,
    text: String,
    owner: Option<OwnerId>,
    category: Option<String>,
    detach: bool,
) -> Result<()> {
    let category: Option<TopicCategory> = category.map(|c| c.parse()).transpose()?;
    let repository = storage(&app.config).await?.problems;
    let use_case = solve_use_case(&app.config, repository.clone())?;

    let submitted = use_case
        .submit(
            SolveProblemInput::new(text)
                .with_category(category)
                .with_owner(owner),
        )
        .await?;
    let id = submitted.problem.id;

    if detach {
        warn_memory_detach(app);
        print_output(
            app,
            || ConsoleFormatter::format_json(&submitted.problem),
            || ConsoleFormatter::format_problem_submitted(&submitted.problem),
        );
        let outcome = submitted.handle.wait_or_cancel_on(interrupt_token()).await;
        return settle(outcome, "Problem solving failed");
    }

    if !app.quiet && !app.format.is_json() {
        eprintln!("{}", ConsoleFormatter::format_problem_submitted(&submitted.problem));
    }
    let reporter = (!app.quiet && std::io::stderr().is_terminal())
        .then(|| {
            ProgressReporter::new(&format!("Problem {}", id))
                .with_working_message("Working out a step-by-step solution...")
        });
    if let Some(reporter) = &reporter {
        reporter.on_transition(ContentStatus::Pending, ContentStatus::Generating);
    }

    let outcome = submitted.handle.wait_or_cancel_on(interrupt_token()).await;

    let problem = ProblemQueryUseCase::new(repository)
        .get(id)
        .await?
        .with_context(|| format!("Problem {} disappeared from storage", id))?;
    if let Some(reporter) = &reporter {
        reporter.on_transition(ContentStatus::Generating, problem.status);
    }

    print_output(
        app,
        || ConsoleFormatter::format_json(&problem),
        || ConsoleFormatter::format_problem(&problem),
    );
    settle(outcome, "Problem solving failed")
}

/// Map a finished run to the command result
fn settle(outcome: Result<ContentStatus, GenerateContentError>, failure: &'static str) -> Result<()> {
    match outcome {
        Ok(_) => Ok(()),
        Err(e) if e.is_cancelled() => bail!("Generation cancelled"),
        Err(e) => Err(anyhow!(e).context(failure)),
    }
}

fn warn_memory_detach(app: &App) {
    if app.config.storage.backend == StorageBackend::Memory {
        warn!("Memory storage is discarded on exit; configure [storage] backend = \"sqlite\" to look the record up later");
    }
}

async fn show(app: &App, id: ContentId) -> Result<()> {
    let query = query_use_case(&app.config, storage(&app.config).await?.content);
    let Some(record) = query.get(id).await? else {
        bail!("Content request {} not found", id);
    };

    print_output(
        app,
        || ConsoleFormatter::format_json(&record),
        || ConsoleFormatter::format_request(&record),
    );
    Ok(())
}

async fn history(app: &App, owner: OwnerId) -> Result<()> {
    let query = query_use_case(&app.config, storage(&app.config).await?.content);
    let records = query.history(owner).await?;

    print_output(
        app,
        || ConsoleFormatter::format_json(&records),
        || ConsoleFormatter::format_history(&records),
    );
    Ok(())
}

async fn problem(app: &App, id: ProblemId) -> Result<()> {
    let query = problem_query_use_case(&app.config, storage(&app.config).await?.problems);
    let Some(problem) = query.get(id).await? else {
        bail!("Problem {} not found", id);
    };

    print_output(
        app,
        || ConsoleFormatter::format_json(&problem),
        || ConsoleFormatter::format_problem(&problem),
    );
    Ok(())
}

async fn problems(app: &App, owner: OwnerId) -> Result<()> {
    let query = problem_query_use_case(&app.config, storage(&app.config).await?.problems);
    let problems = query.history(owner).await?;

    print_output(
        app,
        || ConsoleFormatter::format_json(&problems),
        || ConsoleFormatter::format_problems(&problems),
    );
    Ok(())
}

async fn bookmark(app: &App, id: ProblemId) -> Result<()> {
    let query = problem_query_use_case(&app.config, storage(&app.config).await?.problems);
    let Some(problem) = query.toggle_bookmark(id).await? else {
        bail!("Problem {} not found", id);
    };

    let state = if problem.bookmarked { "Bookmarked" } else { "Removed bookmark from" };
    print_output(
        app,
        || ConsoleFormatter::format_json(&problem),
        || format!("{} problem {}", state, problem.id),
    );
    Ok(())
}

async fn hints(app: &App, id: ProblemId) -> Result<()> {
    let use_case = hints_use_case(&app.config, storage(&app.config).await?.problems)?;
    let Some(hints) = use_case.hints(id).await? else {
        bail!("Problem {} not found", id);
    };

    print_output(
        app,
        || ConsoleFormatter::format_json(&hints),
        || ConsoleFormatter::format_hints(&hints),
    );
    Ok(())
}

async fn render(app: &App, path: Option<PathBuf>) -> Result<()> {
    let content = match &path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read stdin")?;
            buffer
        }
    };

    print_output(
        app,
        || ConsoleFormatter::format_json(&octophyx_domain::render(&content)),
        || TerminalRenderer::render_markdown(&content),
    );
    Ok(())
}

fn topics(app: &App, query: Option<String>, category: Option<String>) -> Result<()> {
    let catalog = TopicCatalog::builtin();
    let topics: Vec<&PhysicsTopic> = match (query, category) {
        (Some(query), _) => catalog.search(&query),
        (None, Some(category)) => {
            let category: TopicCategory = category.parse()?;
            catalog.by_category(category)
        }
        (None, None) => catalog.all().iter().collect(),
    };

    print_output(
        app,
        || ConsoleFormatter::format_json(&topics),
        || ConsoleFormatter::format_topics(&topics),
    );
    Ok(())
}

async fn serve(app: &App, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| app.config.server.bind.clone());
    let storage = storage(&app.config).await?;

    let state = Arc::new(ApiState::new(
        generate_use_case(&app.config, storage.content.clone())?,
        query_use_case(&app.config, storage.content),
        solve_use_case(&app.config, storage.problems.clone())?,
        problem_query_use_case(&app.config, storage.problems.clone()),
        hints_use_case(&app.config, storage.problems)?,
    ));

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    if !app.quiet {
        eprintln!("OctoPhyx API listening on http://{}", bind);
    }

    // Returns once in-flight runs have been cancelled and recorded as failed
    octophyx_presentation::serve(listener, state, interrupt_token())
        .await
        .context("HTTP server error")?;
    info!("HTTP API stopped");
    Ok(())
}

fn print_output(app: &App, json: impl FnOnce() -> String, text: impl FnOnce() -> String) {
    let output = if app.format.is_json() { json() } else { text() };
    println!("{}", output);
}
