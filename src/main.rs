//! Ensun-Scout main entry point
//!
//! This is the command-line interface for the Ensun-Scout company-directory harvester.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use ensun_scout::config::{load_config_with_hash, validate, Config};
use ensun_scout::crawler::{ScrapeRequest, Scraper};
use ensun_scout::output::{
    default_export_path, generate_markdown_report, print_summary, write_csv, write_json,
    MarkdownReport,
};
use ensun_scout::storage::{open_storage, RunStatus, SqliteStorage, Storage};
use ensun_scout::url::build_page_urls;
use ensun_scout::ScrapeResult;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Ensun-Scout: a patient company-directory harvester
///
/// Ensun-Scout searches the ensun.io company directory, walks the requested
/// result pages one at a time with retries and pauses, and reports every
/// company card it finds as a seven-column record.
#[derive(Parser, Debug)]
#[command(name = "ensun-scout")]
#[command(version = "1.0.0")]
#[command(about = "A patient company-directory harvester", long_about = None)]
struct Cli {
    /// Search term, e.g. "Tokenization"
    #[arg(value_name = "QUERY")]
    query: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of result pages to request
    #[arg(long, value_name = "N")]
    pages: Option<u32>,

    /// Retries per page after the first attempt
    #[arg(long, value_name = "N")]
    retries: Option<u32>,

    /// Pause before each request, in seconds
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Path to the SQLite database
    #[arg(long, value_name = "FILE")]
    db: Option<String>,

    /// Path to the markdown report
    #[arg(long, value_name = "FILE")]
    summary: Option<String>,

    /// Also write the full result as JSON to this path
    #[arg(long, value_name = "FILE")]
    json: Option<String>,

    /// Also write the company table as CSV to this path
    #[arg(long, value_name = "FILE")]
    csv: Option<String>,

    /// Do not record the run in the database
    #[arg(long)]
    no_store: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and show the pages that would be requested
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let query = cli.query.trim().to_string();
    if query.is_empty() {
        bail!("Please enter a search query");
    }

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (cfg, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            (Config::default(), String::new())
        }
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid settings")?;

    let request = ScrapeRequest::from_config(query, &config);

    if cli.dry_run {
        handle_dry_run(&config, &request);
        Ok(())
    } else {
        handle_scrape(&config, &config_hash, &request, !cli.no_store, cli.quiet).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ensun_scout=info,warn"),
            1 => EnvFilter::new("ensun_scout=debug,info"),
            2 => EnvFilter::new("ensun_scout=trace,debug"),
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

/// Applies command-line flags on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(pages) = cli.pages {
        config.scraper.page_count = pages;
    }
    if let Some(retries) = cli.retries {
        config.scraper.max_retries = retries;
    }
    if let Some(delay) = cli.delay {
        config.scraper.delay_seconds = delay;
    }
    if let Some(db) = &cli.db {
        config.output.database_path = db.clone();
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = Some(summary.clone());
    }
    if let Some(json) = &cli.json {
        config.output.json_path = Some(json.clone());
    }
    if let Some(csv) = &cli.csv {
        config.output.csv_path = Some(csv.clone());
    }
}

/// Handles the --dry-run mode: shows settings and the page plan
fn handle_dry_run(config: &Config, request: &ScrapeRequest) {
    println!("=== Ensun-Scout Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Base URL: {}", config.scraper.base_url);
    println!("  Query: {}", request.query);
    println!("  Pages: {}", request.page_count);
    println!("  Max retries: {}", request.max_retries);
    println!("  Delay: {}s", request.delay_seconds);
    println!("  Timeout: {}s", config.scraper.timeout_seconds);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Accept-Language: {}", config.http.accept_language);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    match &config.output.summary_path {
        Some(path) => println!("  Summary: {}", path),
        None => println!("  Summary: (generated from query)"),
    }
    if let Some(path) = &config.output.json_path {
        println!("  JSON: {}", path);
    }
    if let Some(path) = &config.output.csv_path {
        println!("  CSV: {}", path);
    }

    let urls = build_page_urls(&config.scraper.base_url, &request.query, request.page_count);
    println!("\nPages ({}):", urls.len());
    for url in &urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
async fn handle_scrape(
    config: &Config,
    config_hash: &str,
    request: &ScrapeRequest,
    store: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut storage = if store {
        let path = Path::new(&config.output.database_path);
        let mut storage = open_storage(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        let run_id = storage.create_run(&request.query, config_hash)?;
        tracing::info!("Recording run {} in {}", run_id, path.display());
        Some((storage, run_id))
    } else {
        None
    };

    let scraper = match Scraper::from_config(config) {
        Ok(scraper) => scraper,
        Err(e) => {
            if let Some((storage, run_id)) = storage.as_mut() {
                storage.fail_run(*run_id, &e.to_string())?;
            }
            return Err(e.into());
        }
    };

    let result = scraper.scrape(request).await;

    if let Some((storage, run_id)) = storage.as_mut() {
        record_run(storage, *run_id, &result)?;
    }

    write_outputs(config, &result)?;
    if !quiet {
        print_summary(&result);
    }

    Ok(())
}

/// Stores the result and closes the run
fn record_run(storage: &mut SqliteStorage, run_id: i64, result: &ScrapeResult) -> anyhow::Result<()> {
    storage.record_result(run_id, result)?;
    let status = RunStatus::for_result(result);
    storage.complete_run(run_id, status)?;
    tracing::info!("Run {} finished: {}", run_id, status.to_db_string());
    Ok(())
}

/// Writes the markdown report and, when configured, the JSON and CSV exports
fn write_outputs(config: &Config, result: &ScrapeResult) -> anyhow::Result<()> {
    let summary_path = match &config.output.summary_path {
        Some(path) => PathBuf::from(path),
        None => default_export_path(&result.query, &MarkdownReport, Utc::now()),
    };
    generate_markdown_report(result, &summary_path)?;
    tracing::info!("Report written to {}", summary_path.display());

    if let Some(json_path) = &config.output.json_path {
        write_json(result, Path::new(json_path))?;
        tracing::info!("JSON written to {}", json_path);
    }

    if let Some(csv_path) = &config.output.csv_path {
        write_csv(result, Path::new(csv_path))?;
        tracing::info!("CSV written to {}", csv_path);
    }

    Ok(())
}
