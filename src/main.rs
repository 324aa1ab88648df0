//! Heritage Dash - command line front end
//!
//! Prints the series behind the dashboard views as text or JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use heritage_dash::config::AppConfig;
use heritage_dash::data::{
    CategorySeries, CategoryTotal, DataLoader, DataProcessor, HeritageTable, RegionTotals,
};
use heritage_dash::regions::MAP_CENTER;
use heritage_dash::stats::{RegionSummary, StatsCalculator};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "heritage.toml";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration (defaults apply when the default file is absent)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Heritage CSV, overriding the configured path
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable regions
    Regions,
    /// Heritage counts by category for one region
    Breakdown {
        region: String,
    },
    /// Total heritage count per region with map coordinates
    Totals,
    /// Category totals and the distribution of region totals
    Summary,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct Summary {
    categories: Vec<CategoryTotal>,
    regions: RegionSummary,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref())?;

    let data_path = cli.data.unwrap_or_else(|| config.input.data_csv.clone());
    let loader = DataLoader::new(data_path, config.load_options());
    debug!(
        data = %loader.file_path().display(),
        summary_label = %loader.options().summary_label,
        "data source"
    );
    let table = loader
        .table()
        .with_context(|| format!("Failed to load {}", loader.file_path().display()))?;

    match &cli.command {
        Commands::Regions => {
            let regions = table.regions();
            match cli.format {
                OutputFormat::Text => regions.iter().for_each(|r| println!("{}", r)),
                OutputFormat::Json => print_json(&regions)?,
            }
        }
        Commands::Breakdown { region } => {
            let series = DataProcessor::category_breakdown_with(
                table,
                region,
                config.view.categories.as_slice(),
            )?;
            match cli.format {
                OutputFormat::Text => print_breakdown(&series),
                OutputFormat::Json => print_json(&series)?,
            }
        }
        Commands::Totals => {
            let totals = DataProcessor::region_totals(table, &config.coordinates());
            match cli.format {
                OutputFormat::Text => print_totals(&totals),
                OutputFormat::Json => print_json(&totals)?,
            }
        }
        Commands::Summary => {
            let summary = summarize(table, &config);
            match cli.format {
                OutputFormat::Text => print_summary(&summary),
                OutputFormat::Json => print_json(&summary)?,
            }
        }
    }

    Ok(())
}

/// An explicitly named config must exist; the default one is optional.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            info!(config = %path.display(), "loading configuration");
            Ok(AppConfig::load_from_file(path)?)
        }
        None if Path::new(DEFAULT_CONFIG).exists() => {
            info!(config = DEFAULT_CONFIG, "loading configuration");
            Ok(AppConfig::load_from_file(Path::new(DEFAULT_CONFIG))?)
        }
        None => {
            debug!("no configuration file, using defaults");
            Ok(AppConfig::default())
        }
    }
}

fn summarize(table: &HeritageTable, config: &AppConfig) -> Summary {
    let totals = DataProcessor::region_totals(table, &config.coordinates());
    Summary {
        categories: DataProcessor::category_totals(table),
        regions: StatsCalculator::summarize_regions(&totals),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn format_count(count: Option<f64>) -> String {
    count.map_or_else(|| "-".to_string(), |v| format!("{}", v))
}

fn print_breakdown(series: &CategorySeries) {
    println!("{} 지역의 문화유산 유형별 분포", series.region);
    for entry in &series.entries {
        println!("  {:<16} {:>8}", entry.category, format_count(entry.count));
    }
    println!("  {:<16} {:>8}", "계", series.total());
}

fn print_totals(totals: &RegionTotals) {
    println!(
        "대한민국 지역별 문화유산 분포 (center {:.1}, {:.1})",
        MAP_CENTER.lat, MAP_CENTER.lon
    );
    for entry in &totals.entries {
        println!(
            "  {:<8} {:>8} {:>10} {:>10}",
            entry.region,
            entry.total,
            format_count(entry.lat),
            format_count(entry.lon)
        );
    }
    println!("  {:<8} {:>8}", "계", totals.grand_total());
}

fn print_summary(summary: &Summary) {
    println!("Category totals");
    for entry in &summary.categories {
        println!("  {:<16} {:>8}", entry.category, entry.total);
    }

    let stats = &summary.regions.stats;
    println!("Region totals");
    println!("  regions  {}", stats.count);
    println!("  sum      {}", stats.sum);
    println!("  mean     {:.2}", stats.mean);
    println!("  median   {:.2}", stats.median);
    println!("  std      {:.2}", stats.std);
    println!("  p05      {:.2}", stats.p05);
    println!("  p95      {:.2}", stats.p95);
    if let Some(largest) = &summary.regions.largest {
        println!("  largest  {}", largest);
    }
    if let Some(smallest) = &summary.regions.smallest {
        println!("  smallest {}", smallest);
    }
}
