//! HN-Sieve main entry point
//!
//! This is the command-line interface for the HN-Sieve part-time job finder.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use hn_sieve::config::{load_config_with_hash, validate, Config, OutputFormat};
use hn_sieve::crawler::{run_sieve, SieveRequest};
use hn_sieve::output::{handler_for, log_statistics, write_report};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// HN-Sieve: find part-time work in Hacker News hiring threads
///
/// HN-Sieve locates the monthly "Ask HN: Who is hiring?" thread, downloads
/// its postings concurrently, and keeps the ones that mention part-time,
/// contract, freelance, or otherwise flexible work.
#[derive(Parser, Debug)]
#[command(name = "hn-sieve")]
#[command(version)]
#[command(about = "Find part-time opportunities in HN 'Who is hiring?' threads", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Target month, e.g. "February 2026" (defaults to the latest thread)
    #[arg(long, conflicts_with = "thread")]
    month: Option<String>,

    /// Sieve this thread id directly, skipping the search
    #[arg(long, value_name = "ID")]
    thread: Option<u64>,

    /// Additional keywords to search for (e.g. python remote)
    #[arg(long, num_args = 1..)]
    keywords: Vec<String>,

    /// Output results as JSON (same as --format json)
    #[arg(long)]
    json: bool,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Number of parallel HTTP workers
    #[arg(long)]
    workers: Option<u32>,

    /// Also fetch nested replies under each top-level posting
    #[arg(long)]
    include_replies: bool,

    /// Write results to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Stop the traversal after this many seconds and report what was found
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_configuration(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let request = SieveRequest {
        month: cli.month.clone(),
        thread_id: cli.thread,
    };

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let report = match run_sieve(&config, &request, cancel).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Sieve failed: {}", e);
            return Err(e.into());
        }
    };

    log_statistics(&report.statistics);

    let handler = handler_for(config.output.format, &config.api.item_page_url);
    let path = config.output.path.as_deref().map(Path::new);
    write_report(&report, handler.as_ref(), path).with_context(|| match path {
        Some(path) => format!("Failed to write report to {}", path.display()),
        None => "Failed to write report to stdout".to_string(),
    })?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hn_sieve=info,warn"),
            1 => EnvFilter::new("hn_sieve=debug,info"),
            2 => EnvFilter::new("hn_sieve=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (or defaults) and applies command-line overrides
fn load_configuration(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, cli);
    validate(&config).context("Invalid settings after command-line overrides")?;
    Ok(config)
}

/// Command-line flags take precedence over file values
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if cli.include_replies {
        config.crawler.include_replies = true;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.run_timeout_secs = Some(timeout);
    }
    if !cli.keywords.is_empty() {
        config.keywords.extra = cli.keywords.clone();
    }
    if cli.json {
        config.output.format = OutputFormat::Json;
    } else if let Some(format) = cli.format {
        config.output.format = format.into();
    }
    if let Some(path) = &cli.output {
        config.output.path = Some(path.display().to_string());
    }
}

/// Cancels the run on Ctrl-C, keeping whatever was collected so far
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing with partial results");
            cancel.cancel();
        }
    });
}
