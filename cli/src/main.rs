//! CLI entrypoint for vignette
//!
//! Wires the layers together with dependency injection: config file →
//! engine registry → extraction use case → console output.

mod cli;
mod format;
mod progress;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, parse_set};
use format::ConsoleFormatter;
use progress::ProgressReporter;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vignette_application::{ExtractScenesInput, ExtractScenesUseCase};
use vignette_infrastructure::{ConfigLoader, OutputKind, RuleSegmenter, build_registry};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // The appender guard must outlive main or buffered logs are lost
    let _log_guard = match &cli.log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file = path
                .file_name()
                .context("log file path has no file name")?;
            let appender = tracing_appender::rolling::never(dir, file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    };

    info!("Starting vignette");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    if !config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let registry = Arc::new(build_registry(&config)?);

    // Admin overrides apply before anything loads or runs
    for spec in &cli.set {
        let (id, update) = parse_set(spec)?;
        registry.update_config(&id, update)?;
    }

    let available = registry.load_all().await;
    info!("{} of {} engines available", available, registry.len());

    if cli.status {
        print!("{}", ConsoleFormatter::format_status(&registry.status()));
        return Ok(());
    }

    // Read chapter text
    let text = match &cli.chapter {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read chapter text from stdin")?;
            buffer
        }
    };

    // Build the request from config plus per-invocation overrides
    let mut params = config.extraction.to_params();
    if let Some(ms) = cli.time_budget_ms {
        params = params.with_request_deadline(Some(Duration::from_millis(ms)));
    }

    let mode = match &cli.mode {
        Some(raw) => match raw.parse() {
            Ok(mode) => mode,
            Err(e) => bail!("{}", e),
        },
        None => config.extraction.mode,
    };

    // Ctrl-C cancels the in-flight request instead of killing output
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let input = ExtractScenesInput::new(text)
        .with_mode(mode)
        .with_params(params)
        .with_cancellation(cancel);

    let use_case = ExtractScenesUseCase::new(registry, Arc::new(RuleSegmenter::new()));

    let report = if cli.quiet {
        use_case.execute(input).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    };

    let output = match &cli.output {
        Some(raw) => raw.parse::<OutputKind>().map_err(|e| anyhow::anyhow!(e))?,
        None => config.output.format,
    };

    match output {
        OutputKind::Text => print!("{}", ConsoleFormatter::format(&report)),
        OutputKind::Json => println!("{}", ConsoleFormatter::format_json(&report)),
    }

    Ok(())
}
