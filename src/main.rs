mod aggregation;
mod catalog;
mod config;
mod dashboard;
mod export;
mod filter;
mod loader;
mod models;
mod types;

use std::io::{stderr, stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::AnalysisConfig;
use crate::dashboard::{Dashboard, DashboardReport, FilterAction};
use crate::export::ExportError;
use crate::loader::SourceLoader;
use crate::models::FilterDimension;

/// Loads transaction extracts, applies the requested filters and prints the dashboard as JSON.
#[derive(Debug, Parser)]
#[command(name = "transaction-dashboard", version)]
struct Cli {
    /// CSV or Excel sources to merge.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    #[arg(long = "country")]
    countries: Vec<String>,

    #[arg(long = "service")]
    services: Vec<String>,

    #[arg(long = "month")]
    months: Vec<String>,

    #[arg(long = "source")]
    sources: Vec<String>,

    /// Select every country instead of the top-volume preset.
    #[arg(long)]
    all_countries: bool,

    /// Select the top-volume country preset explicitly.
    #[arg(long, conflicts_with = "all_countries")]
    top_countries: bool,

    /// Clear a dimension's selection (country, service, month or source) so it no longer restricts rows.
    #[arg(long = "clear", value_name = "DIMENSION")]
    cleared: Vec<FilterDimension>,

    /// JSON file overriding column names and ranking sizes.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    top_n: Option<usize>,

    #[arg(long)]
    export_csv: Option<PathBuf>,

    #[arg(long)]
    export_xlsx: Option<PathBuf>,

    /// error, warn, info, debug or trace.
    #[arg(long, default_value = "error")]
    log_level: String
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(parse_log_level(&cli.log_level));

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_path(path).await?,
        None => AnalysisConfig::default()
    };

    if let Some(top_n) = cli.top_n {
        config.top_n = top_n;
    }

    let loader = SourceLoader::new(config.columns.clone());

    let timer = Instant::now();
    let outcome = loader.load_paths(&cli.files).await?;
    info!("Loaded sources in: {:?}", timer.elapsed());
    debug!("[{}] parsed sources cached", loader.cached_sources().await);

    let mut dashboard = Dashboard::new(outcome);

    for action in filter_actions(&cli) {
        dashboard.apply(action);
    }

    let timer = Instant::now();
    let report = dashboard.report(&config);
    info!("Built report in: {:?}", timer.elapsed());

    if let Some(path) = &cli.export_csv {
        write_export(path, dashboard.export_csv()).await?;
    }

    if let Some(path) = &cli.export_xlsx {
        write_export(path, dashboard.export_xlsx()).await?;
    }

    write_report_to_stdout(&report)?;

    Ok(())
}

fn filter_actions(cli: &Cli) -> Vec<FilterAction> {
    let mut actions = Vec::new();

    if cli.all_countries {
        actions.push(FilterAction::SelectAll(FilterDimension::Country));
    }

    if cli.top_countries {
        actions.push(FilterAction::SelectTopCountries);
    }

    actions.extend(cli.cleared.iter().map(|dimension| FilterAction::SelectNone(*dimension)));

    let selections = [
        (FilterDimension::Country, &cli.countries),
        (FilterDimension::Service, &cli.services),
        (FilterDimension::Month, &cli.months),
        (FilterDimension::Source, &cli.sources)
    ];

    for (dimension, values) in selections {
        if !values.is_empty() {
            actions.push(FilterAction::Select(dimension, values.clone()));
        }
    }

    actions
}

async fn write_export(path: &Path, export: Result<Vec<u8>, ExportError>) -> Result<()> {
    match export {
        Ok(bytes) => {
            tokio::fs::write(path, bytes).await?;
            info!("Exported filtered rows to [{}]", path.display());
        }
        Err(error @ ExportError::CapacityExceeded { .. }) => {
            warn!("Skipping export to [{}]: {error}", path.display());
        }
        Err(error) => return Err(error.into())
    }

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: The report goes to stdout, so logging stays on stderr.
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_report_to_stdout(report: &DashboardReport) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    serde_json::to_writer_pretty(&mut output, report)?;
    writeln!(output)?;
    output.flush()?;

    Ok(())
}
