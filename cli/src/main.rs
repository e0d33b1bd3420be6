//! CLI entrypoint for montage
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use montage_application::{
    AllocationLogger, JurorVotingUseCase, NoAllocationLogger, RoundLocks, VoteAllocator,
};
use montage_domain::{JurorId, RoundId, VoteId};
use montage_infrastructure::{ConfigLoader, FileConfig, JsonFileVoteStore, JsonlAllocationLogger};
use montage_presentation::{Cli, Command, OutputFormat, formatter_for};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_tracing(cli.verbose, config.logging.log_dir.as_deref());
    info!("Starting montage");

    let issues = config.validate();
    for issue in &issues {
        warn!("{}", issue.message);
    }
    if let Some(issue) = issues.iter().find(|i| i.is_error()) {
        bail!("Invalid configuration: {}", issue.message);
    }

    // === Dependency Injection ===
    let format = cli.output_format();
    let store_path = cli.store.unwrap_or_else(|| config.store.path.clone());
    let logger: Arc<dyn AllocationLogger> = match &config.logging.audit_log {
        Some(path) => match JsonlAllocationLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoAllocationLogger),
        },
        None => Arc::new(NoAllocationLogger),
    };
    let locks = RoundLocks::new();
    let formatter = formatter_for(format);
    let params = config.allocation.to_params();

    let output = match cli.command {
        Command::InitRound {
            name,
            entries,
            entries_file,
        } => {
            let mut names = entries;
            if let Some(path) = entries_file {
                names.extend(read_entry_names(&path)?);
            }
            if names.is_empty() {
                bail!("A round needs at least one entry (use --entry or --entries-file)");
            }
            let store = open_store(&store_path).await?;
            let round = store.create_round(&name).await?;
            let added = store.add_entries(round.id, names).await?;
            info!("Created {} with {} entries", round.id, added.len());
            formatter.format_round(&round, &added)
        }
        Command::Plan(args) => {
            let request = args.to_request(&params)?;
            let allocator = VoteAllocator::new(open_store(&store_path).await?, request)?
                .with_locks(locks)
                .with_logger(logger);
            formatter.format_plan(&allocator.plan().await?, false)
        }
        Command::Process(args) => {
            let request = args.to_request(&params)?;
            let allocator = VoteAllocator::new(open_store(&store_path).await?, request)?
                .with_locks(locks)
                .with_logger(logger);
            formatter.format_plan(&allocator.process().await?, true)
        }
        Command::Status { round } => {
            let voting = JurorVotingUseCase::new(open_store(&store_path).await?);
            formatter.format_status(&voting.round_status(RoundId(round)).await?)
        }
        Command::Next { round, juror } => {
            let voting = JurorVotingUseCase::new(open_store(&store_path).await?);
            let vote = voting
                .next_vote(RoundId(round), &JurorId::new(juror))
                .await?;
            formatter.format_vote(vote.as_ref())
        }
        Command::Rate {
            round,
            vote,
            juror,
            rating,
        } => {
            let voting = JurorVotingUseCase::new(open_store(&store_path).await?)
                .with_locks(locks)
                .with_logger(logger);
            let rated = voting
                .submit_rating(RoundId(round), VoteId(vote), &JurorId::new(juror), rating)
                .await?;
            formatter.format_vote(Some(&rated))
        }
        Command::ShowConfig => return show_config(&config, format),
    };

    println!("{}", output);

    Ok(())
}

/// Initialize logging based on verbosity level
///
/// With a log directory, events are also written to a daily rotating file;
/// the returned guard must live until exit so buffered lines get flushed.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "montage.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
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

    guard
}

fn show_config(config: &FileConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Text => {
            for line in ConfigLoader::describe_sources() {
                println!("{}", line);
            }
            println!();
            println!("{}", toml::to_string_pretty(config)?);
        }
    }
    Ok(())
}

async fn open_store(path: &Path) -> Result<Arc<JsonFileVoteStore>> {
    let store = JsonFileVoteStore::open(path)
        .await
        .with_context(|| format!("Failed to open store {}", path.display()))?;
    Ok(Arc::new(store))
}

fn read_entry_names(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read entries from {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
