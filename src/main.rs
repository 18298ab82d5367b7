//! Stay-Sieve main entry point
//!
//! This is the command-line interface for the Stay-Sieve listing extractor.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stay_sieve::config::{load_config_with_hash, Config};
use stay_sieve::crawler::Coordinator;
use stay_sieve::output::{render_markdown, write_report};
use stay_sieve::pipeline::{Envelope, GuestCounts, ListingRef, Pipeline, SearchFilters};
use tracing_subscriber::EnvFilter;

/// Stay-Sieve: a policy-respecting extractor for stay listings
///
/// Stay-Sieve searches listings and reads listing detail pages while
/// respecting robots.txt. Results are projected into a small, stable JSON
/// document.
#[derive(Parser, Debug)]
#[command(name = "stay-sieve")]
#[command(version)]
#[command(about = "A policy-respecting extractor for stay listings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search listings for a location
    Search(SearchArgs),

    /// Read the detail sections of one listing
    Listing(ListingArgs),

    /// Search, then read the details of the leading results as markdown
    Report {
        #[command(flatten)]
        search: SearchArgs,

        /// Number of results to expand (defaults to details.max-listings)
        #[arg(long)]
        limit: Option<usize>,

        /// Write the markdown to this file instead of stdout
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Validate the configuration and print it with its hash
    CheckConfig,
}

#[derive(Args, Debug)]
struct GuestArgs {
    /// Number of adults
    #[arg(long, default_value_t = 1)]
    adults: u32,

    /// Number of children
    #[arg(long, default_value_t = 0)]
    children: u32,

    /// Number of infants
    #[arg(long, default_value_t = 0)]
    infants: u32,

    /// Number of pets
    #[arg(long, default_value_t = 0)]
    pets: u32,
}

impl From<&GuestArgs> for GuestCounts {
    fn from(args: &GuestArgs) -> Self {
        Self {
            adults: args.adults,
            children: args.children,
            infants: args.infants,
            pets: args.pets,
        }
    }
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Location to search in
    #[arg(long)]
    location: String,

    /// Place id of the location
    #[arg(long)]
    place_id: Option<String>,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    checkin: Option<String>,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long)]
    checkout: Option<String>,

    #[command(flatten)]
    guests: GuestArgs,

    /// Minimum nightly price
    #[arg(long)]
    min_price: Option<u32>,

    /// Maximum nightly price
    #[arg(long)]
    max_price: Option<u32>,

    /// Pagination cursor from a previous search
    #[arg(long)]
    cursor: Option<String>,

    /// Skip the robots.txt check for this request
    #[arg(long)]
    ignore_robots_txt: bool,
}

impl SearchArgs {
    fn to_filters(&self, ignore_robots_txt: bool) -> SearchFilters {
        SearchFilters {
            location: self.location.clone(),
            place_id: self.place_id.clone(),
            checkin: self.checkin.clone(),
            checkout: self.checkout.clone(),
            guests: (&self.guests).into(),
            min_price: self.min_price,
            max_price: self.max_price,
            cursor: self.cursor.clone(),
            ignore_robots_text: ignore_robots_txt || self.ignore_robots_txt,
        }
    }
}

#[derive(Args, Debug)]
struct ListingArgs {
    /// Listing id
    #[arg(long)]
    id: String,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    checkin: Option<String>,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long)]
    checkout: Option<String>,

    #[command(flatten)]
    guests: GuestArgs,

    /// Skip the robots.txt check for this request
    #[arg(long)]
    ignore_robots_txt: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("stay_sieve=info,warn"),
            1 => EnvFilter::new("stay_sieve=debug,info"),
            2 => EnvFilter::new("stay_sieve=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let (config, config_hash) = load(cli.config.as_deref())?;
    let ignore_robots_txt = config.site.ignore_robots_txt;

    match cli.command {
        Command::Search(args) => {
            let pipeline = prepare(&config, args.ignore_robots_txt).await?;
            let envelope = pipeline.search(&args.to_filters(ignore_robots_txt)).await;
            print_envelope(&envelope)
        }
        Command::Listing(args) => {
            let pipeline = prepare(&config, args.ignore_robots_txt).await?;
            let reference = ListingRef {
                id: args.id.clone(),
                checkin: args.checkin.clone(),
                checkout: args.checkout.clone(),
                guests: (&args.guests).into(),
                ignore_robots_text: ignore_robots_txt || args.ignore_robots_txt,
            };
            let envelope = pipeline.listing_details(&reference).await;
            print_envelope(&envelope)
        }
        Command::Report {
            search,
            limit,
            output,
        } => {
            let details = config
                .details
                .with_limit(limit)
                .context("Invalid --limit")?;
            let pipeline = prepare(&config, search.ignore_robots_txt).await?;
            handle_report(
                pipeline,
                &details,
                &search.to_filters(ignore_robots_txt),
                output.as_deref(),
            )
            .await
        }
        Command::CheckConfig => handle_check_config(&config, config_hash.as_deref()),
    }
}

/// Builds the pipeline and loads the crawling policy unless it is ignored
async fn prepare(config: &Config, ignore_robots_txt: bool) -> anyhow::Result<Pipeline> {
    let pipeline = Pipeline::new(config).context("Failed to build pipeline")?;

    if ignore_robots_txt || config.site.ignore_robots_txt {
        tracing::info!("Ignoring robots.txt for this run");
    } else {
        pipeline.refresh_policy().await;
    }

    Ok(pipeline)
}

/// Loads the configuration file, or the built-in defaults
fn load(path: Option<&Path>) -> anyhow::Result<(Config, Option<String>)> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok((Config::default(), None));
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok((config, Some(hash)))
}

/// Prints an envelope as pretty JSON; failures exit non-zero
fn print_envelope(envelope: &Envelope) -> anyhow::Result<ExitCode> {
    let json = serde_json::to_string_pretty(envelope).context("Failed to format envelope")?;
    println!("{}", json);

    Ok(if envelope.is_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Handles the report command: search, expand details, render markdown
async fn handle_report(
    pipeline: Pipeline,
    details: &stay_sieve::config::DetailsConfig,
    filters: &SearchFilters,
    output: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let coordinator = Coordinator::new(pipeline, details);
    let report = coordinator
        .run(filters)
        .await
        .with_context(|| format!("Search for \"{}\" failed", filters.location))?;

    tracing::info!(
        "Expanded {} listings for {}",
        report.listings.len(),
        report.location
    );

    match output {
        Some(path) => {
            write_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("✓ Report written to: {}", path.display());
        }
        None => print!("{}", render_markdown(&report)?),
    }

    Ok(ExitCode::SUCCESS)
}

/// Handles the check-config command: prints the effective configuration
fn handle_check_config(config: &Config, hash: Option<&str>) -> anyhow::Result<ExitCode> {
    println!("=== Stay-Sieve Configuration ===\n");
    match hash {
        Some(hash) => println!("Hash: {}\n", hash),
        None => println!("Using built-in defaults\n"),
    }

    let rendered = toml::to_string_pretty(config).context("Failed to format configuration")?;
    println!("{}", rendered);
    println!("✓ Configuration is valid");
    println!("✓ robots.txt: {}", config.site.robots_url());

    Ok(ExitCode::SUCCESS)
}
