//! aaaa-sieve main entry point
//!
//! This is the command-line interface for the aaaa-sieve IPv6 URL filter.

use aaaa_sieve::config::{load_config, validate, Config, RunPaths};
use aaaa_sieve::output::print_statistics;
use aaaa_sieve::probe::{prepare, Orchestrator};
use aaaa_sieve::storage::{FileStore, LineStore};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// aaaa-sieve: keep the URLs whose host has an IPv6 address
///
/// Reads a list of URLs, drops ignored prefixes, IDNA-normalizes and
/// deduplicates it (rewriting the input file in place), then asks a
/// DNS-over-HTTPS resolver for each host's AAAA record. URLs with at least
/// one AAAA answer are written to the output file in input order.
#[derive(Parser, Debug)]
#[command(name = "aaaa-sieve")]
#[command(version)]
#[command(about = "Filter a URL list down to IPv6-reachable hosts", long_about = None)]
struct Cli {
    /// URL list, one per line (rewritten in normalized form)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Where to write URLs whose host has an AAAA record
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// File of prefixes; URLs starting with any of them are skipped
    #[arg(short, long, value_name = "PATH")]
    ignore: Option<PathBuf>,

    /// Maximum number of lookups in flight
    #[arg(short, long, value_name = "N")]
    concurrency: Option<usize>,

    /// DNS-over-HTTPS endpoint (JSON API)
    #[arg(long, value_name = "URL")]
    resolver: Option<String>,

    /// Per-lookup timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show what would be probed without touching any file or the network
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e);
        }
    };

    let paths = config.files.require()?;

    if cli.dry_run {
        handle_dry_run(&config, &paths)?;
    } else {
        handle_run(config, paths, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("aaaa_sieve=info,warn"),
            1 => EnvFilter::new("aaaa_sieve=debug,info"),
            2 => EnvFilter::new("aaaa_sieve=trace,debug"),
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

/// Merges the config file (if any) with command-line overrides
fn build_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(input) = &cli.input {
        config.files.input = Some(input.clone());
    }
    if let Some(output) = &cli.output {
        config.files.output = Some(output.clone());
    }
    if let Some(ignore) = &cli.ignore {
        config.files.ignore = Some(ignore.clone());
    }
    if let Some(concurrency) = cli.concurrency {
        config.probe.concurrency = concurrency;
    }
    if let Some(resolver) = &cli.resolver {
        config.probe.resolver_url = resolver.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.probe.timeout_secs = timeout;
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: normalizes in memory and lists what would be probed
fn handle_dry_run(config: &Config, paths: &RunPaths) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== aaaa-sieve Dry Run ===\n");

    println!("Probe Configuration:");
    println!("  Resolver: {}", config.probe.resolver_url);
    println!("  Concurrency: {}", config.probe.concurrency);
    println!("  Timeout: {}s", config.probe.timeout_secs);

    println!("\nFiles:");
    println!("  Input: {}", paths.input.display());
    println!("  Output: {}", paths.output.display());
    match &paths.ignore {
        Some(ignore) => println!("  Ignore: {}", ignore.display()),
        None => println!("  Ignore: (none)"),
    }

    let input = FileStore::new(&paths.input);
    let ignore = paths.ignore.as_ref().map(FileStore::new);
    let (read, outcome) = prepare(&input, ignore.as_ref().map(|s| s as &dyn LineStore))?;

    println!("\nURLs to probe ({}):", outcome.entries.len());
    for url in &outcome.entries {
        println!("  - {}", url);
    }

    println!(
        "\n✓ {} lines read, {} ignored, {} duplicates, {} kept unencoded",
        read, outcome.ignored, outcome.duplicates, outcome.encoding_fallbacks
    );

    Ok(())
}

/// Handles the main probe operation
async fn handle_run(
    config: Config,
    paths: RunPaths,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = FileStore::new(&paths.input);
    let output = FileStore::new(&paths.output);
    let ignore = paths.ignore.as_ref().map(FileStore::new);

    let orchestrator = Orchestrator::new(config.probe)?;

    match orchestrator
        .run(&input, &output, ignore.as_ref().map(|s| s as &dyn LineStore))
        .await
    {
        Ok(stats) => {
            if !quiet {
                print_statistics(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
