//! Gifter-Radar main entry point
//!
//! This is the command-line interface for the Gifter-Radar presence search.

use anyhow::{bail, Context};
use clap::Parser;
use gifter_radar::config::{load_config_with_hash, Config};
use gifter_radar::credentials::StaticCredentials;
use gifter_radar::crawler::{Crawler, SearchRequest};
use gifter_radar::output::{print_summary, JsonFileSink, ReportSink};
use gifter_radar::{AbortReason, SearchError, SearchReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Gifter-Radar: find accounts in live streams
///
/// Gifter-Radar walks the live feeds of a streaming platform and reports
/// every stream in which one of the target accounts is a gifter or viewer.
#[derive(Parser, Debug)]
#[command(name = "gifter-radar")]
#[command(version = "1.0.0")]
#[command(about = "Find target accounts across live streams", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Account id to look for (repeatable)
    #[arg(short, long = "target", value_name = "ID")]
    targets: Vec<String>,

    /// File with one account id per line; `#` starts a comment
    #[arg(long, value_name = "PATH")]
    targets_file: Option<PathBuf>,

    /// Streams inspected per category (overrides the config)
    #[arg(short, long, value_name = "N")]
    budget: Option<u32>,

    /// Category to search, in order (repeatable; default from config, then all)
    #[arg(short, long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// Directory for the results file (overrides the config)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Validate config and show what would be searched without sending requests
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(dir) = &cli.output {
        config.output.results_dir = dir.display().to_string();
    }

    let targets = collect_targets(&cli.targets, cli.targets_file.as_deref())?;
    let budget = cli.budget.unwrap_or(config.search.stream_budget);
    let categories = if cli.categories.is_empty() {
        config.search.categories.clone()
    } else {
        cli.categories.clone()
    };

    let request = SearchRequest::new(&targets, budget, Some(categories.as_slice()))
        .context("invalid search parameters")?;

    if cli.dry_run {
        handle_dry_run(&config, &request);
        return Ok(());
    }

    handle_search(config, &request).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gifter_radar=info,warn"),
            1 => EnvFilter::new("gifter_radar=debug,info"),
            2 => EnvFilter::new("gifter_radar=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges `--target` values with the contents of `--targets-file`
fn collect_targets(cli_targets: &[String], file: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let mut targets = cli_targets.to_vec();

    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read targets file {}", path.display()))?;
        targets.extend(parse_targets(&content));
    }

    if targets.iter().all(|t| t.trim().is_empty()) {
        bail!("no target accounts given; use --target or --targets-file");
    }

    Ok(targets)
}

fn parse_targets(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Handles the --dry-run mode: validates config and shows what would be searched
fn handle_dry_run(config: &Config, request: &SearchRequest) {
    println!("=== Gifter-Radar Dry Run ===\n");

    println!("Search:");
    println!("  Targets: {}", request.targets().len());
    for target in request.targets().iter() {
        println!("    * {}", target);
    }
    println!("  Streams per category: {}", request.stream_budget());
    println!("  Feed page size: {}", config.search.page_size);
    println!("  Gifters per stream: {}", config.search.social_page_size);
    println!("  Viewers requested: {}", config.search.enable_viewers);

    println!("\nCategories ({}):", request.categories().len());
    for category in request.categories() {
        println!("  - {} (tag: {})", category, category.feed_tag());
    }

    println!("\nPacing:");
    println!("  Request delay: {}ms", config.pacing.request_delay_ms);
    println!(
        "  Burst pause: {}ms every {} streams",
        config.pacing.burst_pause_ms, config.pacing.burst_every
    );

    println!("\nEndpoints:");
    println!("  Landing: {}", config.endpoints.landing_url);
    println!("  Feed: {}", config.endpoints.feed_base);
    println!("  Social: {}", config.endpoints.social_base);

    println!("\nOutput:");
    println!("  Results directory: {}", config.output.results_dir);
    println!(
        "  Credential headers: {}",
        config.credentials.headers.len()
    );

    let max_streams = u64::from(request.stream_budget()) * request.categories().len() as u64;
    println!("\n✓ Configuration is valid");
    println!("✓ Would inspect up to {} streams", max_streams);
}

/// Handles the main search operation
async fn handle_search(config: Config, request: &SearchRequest) -> anyhow::Result<()> {
    let credentials = StaticCredentials::from_config(&config.credentials)
        .context("invalid credential headers")?;
    if credentials.is_empty() {
        tracing::warn!("No credential headers configured; the platform may reject requests");
    }

    let sink = JsonFileSink::new(&config.output.results_dir);
    let crawler = Crawler::new(config, Arc::new(credentials))?;

    let cancel = crawler.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current request");
            cancel.cancel();
        }
    });

    match crawler.search(request).await {
        Ok(report) => {
            save_report(&sink, &report);
            print_summary(&report, None);
            Ok(())
        }
        Err(SearchError::Aborted { partial, reason }) => {
            save_report(&sink, &partial);
            print_summary(&partial, Some(&reason));
            match reason {
                AbortReason::Cancelled => Ok(()),
                AbortReason::Fatal(e) => Err(e).context("search aborted"),
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// Writes the report; a failed write is logged so the summary still prints
fn save_report(sink: &dyn ReportSink, report: &SearchReport) {
    if let Err(e) = sink.write_report(report) {
        tracing::error!("Failed to save results: {}", e);
    }
}
