//! Listing-Harvester main entry point
//!
//! This is the command-line interface for the Listing-Harvester focused
//! listing crawler.

use clap::Parser;
use listing_harvester::config::{load_config_with_hash, Config};
use listing_harvester::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Listing-Harvester: a focused listing crawler
///
/// Listing-Harvester crawls listing sites within a fixed request budget,
/// follows only links matching the configured glob rules, and extracts
/// structured records from detail pages into a JSON Lines file or SQLite
/// database.
#[derive(Parser, Debug)]
#[command(name = "listing-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A focused listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(config).await?;
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
            0 => EnvFilter::new("listing_harvester=info,warn"),
            1 => EnvFilter::new("listing_harvester=debug,info"),
            2 => EnvFilter::new("listing_harvester=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    listing_harvester::config::validate(config)?;

    println!("=== Listing-Harvester Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max requests per crawl: {}",
        config.crawler.max_requests_per_crawl
    );
    println!("  Max concurrency: {}", config.crawler.max_concurrency);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.name);
    println!("  Version: {}", config.user_agent.version);

    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!("  Path: {}", config.output.path);

    println!("\nStart URLs ({}):", config.crawler.start_urls.len());
    for url in &config.crawler.start_urls {
        println!("  - {}", url);
    }

    println!("\nLink Globs ({}):", config.crawler.globs.len());
    for glob in &config.crawler.globs {
        println!("  - {}", glob);
    }

    println!("\nProxies ({}):", config.proxy.urls.len());
    for proxy in &config.proxy.urls {
        println!("  - {}", proxy);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        config.crawler.start_urls.len()
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Seed URLs: {}, request budget: {}",
        config.crawler.start_urls.len(),
        config.crawler.max_requests_per_crawl
    );

    // Run the crawler
    match crawl(config).await {
        Ok(()) => {
            tracing::info!("Crawl completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
