//! PayrollScope - payroll hiring and salary analytics
//!
//! A CLI tool that loads a payroll dataset snapshot, normalizes and
//! enriches it, and reports year-over-year hiring alongside aggregate
//! salary, tenure and headcount metrics for a filtered view.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (source fetch, column parse, config, output, etc.)

mod cli;
mod config;
mod enrich;
mod error;
mod loader;
mod models;
mod query;
mod report;
mod schema;
mod table;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, CONFIG_FILE};
use enrich::EnrichSettings;
use loader::{DatasetCache, DatasetSource};
use models::{DashboardReport, ReportMetadata};
use query::{aggregate_metrics, filter_rows, hiring_rates, Filter, YearRange};
use report::{PresentationSink, ReportWriter};
use std::path::PathBuf;
use std::time::Instant;
use table::{CanonicalTable, FilterDomain};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("PayrollScope v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .payrollscope.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Set [source].location to your payroll CSV path or URL.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so a dashboard written to stdout stays clean.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the load, enrich, query and render pipeline. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let location = config.source.location.clone().ok_or_else(|| {
        anyhow!(
            "No dataset source given; pass --source or set [source].location in {}",
            CONFIG_FILE
        )
    })?;

    // Step 1: Fetch the raw snapshot
    let (source, dataset_id) = loader::open_source(
        &location,
        config.source.dataset_id.as_deref(),
        config.source.timeout_seconds,
        !args.quiet,
    )
    .context("Source fetch failed")?;

    let source_label = format!("{}/{}", source.describe(), dataset_id);
    if !args.quiet {
        eprintln!("📥 Loading dataset: {}", source_label);
    }

    let mut cache = DatasetCache::new(source);
    let raw = cache
        .get_or_fetch(&dataset_id)
        .await
        .context("Source fetch failed")?;

    // Step 2: Build the canonical table
    let settings = EnrichSettings::from(&config.enrich);
    let (table, stats) =
        CanonicalTable::build(&raw, &settings).context("Column parse failed")?;
    debug!("Enrichment stats: {:?}", stats);
    info!("Canonical table holds {} rows", table.len());

    let domain = table.filter_domain();

    if args.list_options {
        print_filter_domain(&domain);
        return Ok(0);
    }

    // Step 3: Resolve the filter and run both queries
    let years = resolve_year_range(&args, domain.year_bounds, settings.max_start_year)?;
    let filter = Filter::new(args.agency.as_deref(), args.title.as_deref(), years);
    warn_unknown_selection(&filter, &domain);
    info!("Active filter: {:?}", filter);

    let metrics = aggregate_metrics(&table, &filter);
    let rates = hiring_rates(&table, &filter, config.query.max_years);
    let rows_matched = filter_rows(&table, &filter).len();

    // Step 4: Map onto presentation payloads and render
    let report = DashboardReport {
        metadata: ReportMetadata {
            source: source_label,
            generated_at: Utc::now(),
            rows_loaded: stats.rows_in,
            rows_retained: stats.rows_out,
            rows_matched,
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        metrics: report::metric_cards(&metrics),
        chart: report::hiring_chart(&rates, &filter),
        hiring_rates: rates,
    };

    let output = config.report.output.as_ref().map(PathBuf::from);
    let mut writer = ReportWriter::new(config.report.format, output.clone());
    writer.render(&report)?;

    if !args.quiet {
        eprintln!("\n📊 Summary:");
        eprintln!(
            "   Rows: {} loaded, {} retained, {} matched",
            stats.rows_in, stats.rows_out, rows_matched
        );
        for card in &report.metrics.cards {
            eprintln!("   {}: {}", card.label, card.value);
        }
        if let Some(path) = output {
            eprintln!("\n✅ Dashboard saved to: {}", path.display());
        }
    }

    Ok(0)
}

/// Pick the start-year range: explicit flags win, the table's bounds fill the rest.
fn resolve_year_range(
    args: &Args,
    bounds: Option<(i32, i32)>,
    fallback_year: i32,
) -> Result<YearRange> {
    let (lo, hi) = bounds.unwrap_or_else(|| {
        warn!("No rows survived enrichment; metrics will be N/A");
        (fallback_year, fallback_year)
    });

    // A lone bound past the data must not invert the range against the default.
    let (from, to) = match (args.from_year, args.to_year) {
        (Some(from), None) if from > hi => {
            warn!("--from-year {} is after the latest start year {}", from, hi);
            (hi, hi)
        }
        (None, Some(to)) if to < lo => {
            warn!("--to-year {} is before the earliest start year {}", to, lo);
            (lo, lo)
        }
        (from, to) => (from.unwrap_or(lo), to.unwrap_or(hi)),
    };

    let requested = YearRange::new(from, to)?;

    if bounds.is_none() {
        return Ok(requested);
    }

    match requested.clamp_to((lo, hi)) {
        Some(clamped) if clamped != requested => {
            warn!(
                "Year range {}-{} narrowed to observed range {}-{}",
                requested.min(),
                requested.max(),
                clamped.min(),
                clamped.max()
            );
            Ok(clamped)
        }
        Some(clamped) => Ok(clamped),
        None => {
            warn!(
                "Year range {}-{} lies outside the observed range {}-{}",
                requested.min(),
                requested.max(),
                lo,
                hi
            );
            Ok(requested)
        }
    }
}

fn warn_unknown_selection(filter: &Filter, domain: &FilterDomain) {
    if let Some(ref agency) = filter.agency {
        if !domain.agencies.contains(agency) {
            warn!("Agency not found in dataset: {}", agency);
        }
    }
    if let Some(ref title) = filter.title {
        if !domain.titles.contains(title) {
            warn!("Title not found in dataset: {}", title);
        }
    }
}

/// Handle --list-options: print the values each filter control accepts.
fn print_filter_domain(domain: &FilterDomain) {
    println!("Agencies ({}):", domain.agencies.len());
    println!("  {}", schema::values::ALL);
    for agency in &domain.agencies {
        println!("  {}", agency);
    }

    println!("\nTitles ({}):", domain.titles.len());
    println!("  {}", schema::values::ALL);
    for title in &domain.titles {
        println!("  {}", title);
    }

    match domain.year_bounds {
        Some((min, max)) => println!("\nStart years: {} - {}", min, max),
        None => println!("\nStart years: none"),
    }
    if let Some((min, max)) = domain.salary_bounds {
        println!("Salary range: {:.2} - {:.2}", min, max);
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
