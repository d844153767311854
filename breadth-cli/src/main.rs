//! Breadth CLI: market-breadth report and index breakout view.
//!
//! Commands:
//! - `report`: load prices for the configured universe and print every table
//! - `breakouts --index NAME`: breakout stocks restricted to one index
//! - `init-config`: write the default Nifty configuration

use anyhow::{bail, Context, Result};
use breadth_core::breadth::{BreadthParams, IndexBreakouts};
use breadth_core::data::{PriceProvider, StderrProgress, YahooProvider};
use breadth_core::domain::MembershipCatalog;
use breadth_runner::{load_series, write_report, BreadthReport, DashboardConfig};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "breadth", about = "Breadth CLI: advance/decline, DMA participation, RS breakouts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that loads prices.
#[derive(Args)]
struct LoadArgs {
    /// Path to a TOML config file. Defaults to the built-in Nifty layout.
    #[arg(long)]
    config: Option<PathBuf>,

    /// As-of date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<String>,

    /// Offline mode: no network access.
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Use synthetic data as fallback.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full breadth report.
    Report {
        #[command(flatten)]
        load: LoadArgs,

        /// Also write CSV tables and report.json into this directory.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Print breakout stocks for one index.
    Breakouts {
        /// Index name as declared in the config (e.g. "Nifty IT").
        #[arg(long)]
        index: String,

        #[command(flatten)]
        load: LoadArgs,
    },
    /// Write the default configuration file.
    InitConfig {
        /// Destination file.
        #[arg(long, default_value = "breadth.toml")]
        output: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report { load, export } => run_report(&load, export.as_deref()),
        Commands::Breakouts { index, load } => run_breakouts(&load, &index),
        Commands::InitConfig { output, force } => run_init_config(&output, force),
    }
}

/// Logs go to stderr so stdout carries only the tables.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run_report(load: &LoadArgs, export: Option<&Path>) -> Result<()> {
    let (config, _, report) = build_report(load)?;

    print_advance_decline(&report);
    print_industry_participation(&report, &config.params);
    print_breakouts(&report);
    print_industry_breakouts(&report);
    print_index_breadth(&report, &config.params);

    if let Some(dir) = export {
        let written = write_report(&report, dir)?;
        println!();
        println!("Exported {} files to: {}", written.len(), dir.display());
    }
    Ok(())
}

fn run_breakouts(load: &LoadArgs, index: &str) -> Result<()> {
    let (_, catalog, report) = build_report(load)?;

    match report.index_breakouts(&catalog, index)? {
        IndexBreakouts::NoBreakouts => println!("No RS breakout stocks in {index}."),
        IndexBreakouts::Found(listings) => {
            println!("=== RS Breakouts in {index} ===");
            println!("{:<14} {:<36} {:>10} {:>9}", "Symbol", "Industry", "Close", "%Change");
            println!("{}", "-".repeat(72));
            for l in &listings {
                println!(
                    "{:<14} {:<36} {:>10.2} {:>9.2}",
                    l.symbol,
                    l.industry.as_deref().unwrap_or("-"),
                    l.close,
                    l.change_pct
                );
            }
        }
    }
    Ok(())
}

fn run_init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }
    let toml = DashboardConfig::default_nifty().to_toml()?;
    std::fs::write(output, toml)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Wrote default config to: {}", output.display());
    Ok(())
}

/// Config → catalog → prices → report.
fn build_report(load: &LoadArgs) -> Result<(DashboardConfig, MembershipCatalog, BreadthReport)> {
    let config = match &load.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default_nifty(),
    };
    let as_of = parse_as_of(load.as_of.as_deref())?;

    let catalog = config.load_catalog()?;
    if catalog.universe_len() == 0 {
        bail!(
            "universe list {} has no symbols",
            config.universe_file.display()
        );
    }

    let mut opts = config.load_options(as_of);
    opts.offline = load.offline;
    opts.synthetic = load.synthetic;

    let provider = if load.offline {
        None
    } else {
        Some(YahooProvider::new()?)
    };
    let provider_ref = provider.as_ref().map(|p| p as &dyn PriceProvider);

    let symbols: Vec<&str> = catalog.all_symbols().into_iter().collect();
    let loaded = load_series(&symbols, provider_ref, Some(&StderrProgress), &opts)?;
    if loaded.has_synthetic {
        eprintln!("WARNING: report includes synthetic prices");
    }
    tracing::info!(dataset_hash = %loaded.dataset_hash, "price snapshot ready");

    let report = BreadthReport::compute(&catalog, &loaded.table, as_of, &config.params)?;
    Ok((config, catalog, report))
}

fn parse_as_of(value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid --as-of date '{s}', expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn print_advance_decline(report: &BreadthReport) {
    println!("=== Advance/Decline (last {} days) ===", report.advance_decline.len());
    println!("{:<12} {:>10} {:>10} {:>10}", "Date", "Advancers", "Decliners", "A/D Ratio");
    println!("{}", "-".repeat(45));
    for row in &report.advance_decline {
        println!(
            "{:<12} {:>10} {:>10} {:>10.2}",
            row.date.to_string(),
            row.advancers,
            row.decliners,
            row.ratio
        );
    }
}

fn print_industry_participation(report: &BreadthReport, params: &BreadthParams) {
    let short = format!(">{}DMA", params.short_ma);
    let long = format!(">{}DMA", params.long_ma);
    println!();
    println!("=== Industry DMA Breadth ===");
    println!(
        "{:<36} {:>6} {:>9} {:>9} {:>9} {:>9}",
        "Industry",
        "Total",
        short,
        long,
        format!("%{short}"),
        format!("%{long}")
    );
    println!("{}", "-".repeat(83));
    for row in &report.industry_participation {
        println!(
            "{:<36} {:>6} {:>9} {:>9} {:>9.1} {:>9.1}",
            row.industry,
            row.total,
            row.above_short,
            row.above_long,
            row.pct_above_short,
            row.pct_above_long
        );
    }
}

fn print_breakouts(report: &BreadthReport) {
    println!();
    println!("=== RS Breakouts ===");
    if report.breakouts.is_empty() {
        println!("No RS breakout stocks.");
        return;
    }
    println!("{:<14} {:<36} {:>10} {:>9}", "Symbol", "Industry", "Close", "%Change");
    println!("{}", "-".repeat(72));
    for l in &report.breakouts {
        println!(
            "{:<14} {:<36} {:>10.2} {:>9.2}",
            l.symbol,
            l.industry.as_deref().unwrap_or("-"),
            l.close,
            l.change_pct
        );
    }
    println!();
    println!("Unique industries: {}", report.unique_breakout_industries);
}

fn print_industry_breakouts(report: &BreadthReport) {
    if report.industry_breakouts.is_empty() {
        return;
    }
    println!();
    println!("=== Industry Breakout Representation ===");
    println!("{:<36} {:>9} {:>6} {:>9}", "Industry", "Breakouts", "Total", "%");
    println!("{}", "-".repeat(63));
    for row in &report.industry_breakouts {
        println!(
            "{:<36} {:>9} {:>6} {:>9.2}",
            row.industry, row.breakouts, row.industry_total, row.pct_in_breakout
        );
    }
}

fn print_index_breadth(report: &BreadthReport, params: &BreadthParams) {
    println!();
    println!("=== Index Breadth ===");
    println!(
        "{:<22} {:>6} {:>9} {:>7} {:>9} {:>7} {:>9} {:>7}",
        "Index",
        "Total",
        format!(">{}DMA", params.short_ma),
        "%",
        format!(">{}DMA", params.long_ma),
        "%",
        "Breakout",
        "%"
    );
    println!("{}", "-".repeat(84));
    for row in &report.index_breadth {
        println!(
            "{:<22} {:>6} {:>9} {:>7.1} {:>9} {:>7.1} {:>9} {:>7.1}",
            row.index,
            row.total,
            row.above_short,
            row.pct_above_short,
            row.above_long,
            row.pct_above_long,
            row.breakouts,
            row.pct_in_breakout
        );
    }
}
