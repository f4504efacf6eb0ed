//! Gleaner main entry point
//!
//! This is the command-line interface for the Gleaner content crawler.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use gleaner::config::{load_config_with_hash, validate_seed_url, Config, SeedEntry};
use gleaner::crawler::{crawl_seeds, Coordinator, CrawlSettings, HttpTransport};
use gleaner::output::{
    generate_markdown_summary, post_process, print_page_type_counts, print_summary, CrawlSummary,
};
use gleaner::storage::{open_sinks, SqliteSink};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Gleaner: a depth-bounded content crawler
///
/// Gleaner walks a site from its seed pages, extracts the title, headings and
/// paragraphs of every page it reaches, tags each page with a topic and keywords,
/// and stores the results as text files and/or in a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version)]
#[command(about = "A depth-bounded content crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show page counts per type from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Crawl these seed URLs instead of the configured ones
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let seeds = resolve_seeds(&config, &cli.seeds)?;

    if cli.dry_run {
        handle_dry_run(&config, &seeds);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config, &seeds, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
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

/// Picks the seeds to crawl: command-line overrides, or the configured list
fn resolve_seeds(config: &Config, overrides: &[String]) -> Result<Vec<SeedEntry>> {
    if overrides.is_empty() {
        return Ok(config.seeds.clone());
    }

    overrides
        .iter()
        .map(|url| -> Result<SeedEntry> {
            validate_seed_url(url)?;
            Ok(SeedEntry {
                url: url.clone(),
                scope: Vec::new(),
            })
        })
        .collect()
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, seeds: &[SeedEntry]) {
    println!("=== Gleaner Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    match config.crawler.max_links_per_page {
        Some(limit) => println!("  Max links per page: {}", limit),
        None => println!("  Max links per page: unbounded"),
    }
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!(
        "  Max concurrent seeds: {}",
        config.crawler.max_concurrent_seeds
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "(disabled)".to_string());
    println!("  Pages directory: {}", show(&config.output.pages_dir));
    println!("  Database: {}", show(&config.output.database_path));
    println!("  Summary: {}", show(&config.output.summary_path));

    println!("\nSeeds ({}):", seeds.len());
    for seed in seeds {
        if seed.scope.is_empty() {
            println!("  - {} (scope: seed site)", seed.url);
        } else {
            println!("  - {} (scope: {})", seed.url, seed.scope.join(", "));
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seed URLs", seeds.len());
}

/// Handles the --stats mode: shows page counts from the database
fn handle_stats(config: &Config) -> Result<()> {
    let database_path = config
        .output
        .database_path
        .as_deref()
        .context("--stats needs output.database-path to be configured")?;

    println!("Database: {}\n", database_path);

    let sink = SqliteSink::new(Path::new(database_path))?;
    print_page_type_counts(&sink.count_by_page_type()?);

    if let Some(run) = sink.latest_run()? {
        println!(
            "\nLast run: {} ({} visited, {} failed, {} kept)",
            run.finished_at, run.pages_visited, run.pages_failed, run.records_kept
        );
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, seeds: &[SeedEntry], config_hash: &str) -> Result<()> {
    let started_at = Utc::now();

    let transport = HttpTransport::new(&config.user_agent).context("Failed to build HTTP client")?;
    let sinks = open_sinks(&config.output).context("Failed to open output sinks")?;
    if sinks.is_empty() {
        tracing::warn!("No output configured; records will only be summarized");
    }

    let coordinator = Coordinator::new(
        Arc::new(transport),
        CrawlSettings::from_config(&config.crawler),
    )
    .with_sinks(sinks);

    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current pages and stopping");
            cancel.cancel();
        }
    });

    tracing::info!("Crawling {} seed URLs", seeds.len());
    let raw = crawl_seeds(&coordinator, seeds, config.crawler.max_concurrent_seeds).await?;
    let processed: Vec<_> = raw.iter().cloned().map(post_process).collect();

    let summary = CrawlSummary::new(config_hash, started_at, &raw, &processed);
    print_summary(&summary);

    if let Some(path) = &config.output.summary_path {
        generate_markdown_summary(&summary, Path::new(path))
            .with_context(|| format!("Failed to write summary to {}", path))?;
        println!("\n✓ Summary exported to: {}", path);
    }

    if let Some(path) = &config.output.database_path {
        let sink = SqliteSink::new(Path::new(path))?;
        sink.record_run(
            config_hash,
            started_at,
            summary.total_visited() as u64,
            summary.total_failed() as u64,
            summary.total_content_bearing() as u64,
        )?;
    }

    Ok(())
}
