//! League statistics CLI.
//!
//! # Usage
//!
//! ```bash
//! # Print previews of every statistic table
//! manacore-stats report --data data/processed
//!
//! # Also write the tables as CSV files
//! manacore-stats report --config config/stats.toml --output data/processed
//!
//! # Cards available at each draft of a season
//! manacore-stats availability --season Season-4
//!
//! # Check the tables before trusting the numbers
//! manacore-stats validate --data data/processed
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use manacore_stats::availability::build_availability_map;
use manacore_stats::config::StatsConfig;
use manacore_stats::data::DataLoader;
use manacore_stats::report::Report;
use manacore_stats::validation::DataIntegrityValidator;

const SEPARATOR: &str = "============================================================";

#[derive(Parser)]
#[command(name = "manacore-stats")]
#[command(about = "Win-rate statistics for a cube draft league")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every statistic table and print a preview
    Report {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Path to data directory
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Write result CSVs to this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rows shown per table
        #[arg(short, long)]
        rows: Option<usize>,
    },

    /// Show which cards were available at each draft
    Availability {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Path to data directory
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Only show this season
        #[arg(short, long)]
        season: Option<String>,

        /// Print the full card lists as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run data integrity checks
    Validate {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Path to data directory
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

fn load_config(path: Option<PathBuf>, data: Option<PathBuf>) -> Result<StatsConfig> {
    let mut config = match path {
        Some(path) => StatsConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => StatsConfig::default(),
    };
    if let Some(data) = data {
        config.data_dir = data;
    }
    Ok(config)
}

fn cmd_report(config: StatsConfig) -> Result<()> {
    let loader = DataLoader::from_config(&config);
    let tables = loader
        .load_all()
        .with_context(|| format!("Failed to load tables from {}", config.data_dir.display()))?;

    let report = Report::build(&tables, &config);

    println!("{}", SEPARATOR);
    println!("{}", report.summary());
    println!("{}\n", SEPARATOR);
    println!("{}", report.preview(config.preview_rows)?);

    if let Some(output) = &config.output_dir {
        let written = report
            .write_csv(output)
            .with_context(|| format!("Failed to write results to {}", output.display()))?;
        println!("Wrote {} files to {}", written.len(), output.display());
    }

    Ok(())
}

fn cmd_availability(config: StatsConfig, season: Option<String>, json: bool) -> Result<()> {
    let loader = DataLoader::from_config(&config);
    let drafts = loader.load_drafts().context("Failed to load drafts")?;
    let cube_history = loader
        .load_cube_history()
        .context("Failed to load cube history")?;
    let mainboard = if loader.has_table(manacore_stats::data::loader::MAINBOARD_FILE) {
        loader.load_mainboard().context("Failed to load mainboard")?
    } else {
        Vec::new()
    };

    let map = build_availability_map(&drafts, &cube_history, &mainboard);

    let seasons: Vec<String> = match season {
        Some(season) => {
            if map.season(&season).is_none() {
                anyhow::bail!("Season {} has no drafts", season);
            }
            vec![season]
        }
        None => map.seasons().map(str::to_string).collect(),
    };

    if json {
        let selected: std::collections::BTreeMap<_, _> = seasons
            .iter()
            .filter_map(|s| map.season(s).map(|drafts| (s, drafts)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    println!("{}", SEPARATOR);
    println!("Card Availability");
    println!("{}", SEPARATOR);
    for season in &seasons {
        let Some(drafts) = map.season(season) else {
            continue;
        };
        println!("\n{} ({} drafts)", season, drafts.len());
        for (draft_id, cards) in drafts {
            println!("  {}: {} cards", draft_id, cards.len());
        }
    }
    println!("\n{}", SEPARATOR);

    Ok(())
}

fn cmd_validate(config: StatsConfig) -> Result<()> {
    println!("Validating {}...\n", config.data_dir.display());

    let report = DataIntegrityValidator::new(&config)
        .validate()
        .context("Validation could not run")?;

    for check in &report.checks {
        let status = if check.passed { "PASS" } else { "FAIL" };
        println!("  [{}] {}: {}", status, check.name, check.message);
        if let Some(details) = &check.details {
            println!("         {}", details);
        }
    }
    println!("\n{}", report.summary());

    if !report.all_passed() {
        anyhow::bail!("{} checks failed", report.failed_checks().len());
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("manacore_stats=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            config,
            data,
            output,
            rows,
        } => {
            let mut config = load_config(config, data)?;
            if output.is_some() {
                config.output_dir = output;
            }
            if let Some(rows) = rows {
                config.preview_rows = rows;
            }
            cmd_report(config)
        }
        Commands::Availability {
            config,
            data,
            season,
            json,
        } => cmd_availability(load_config(config, data)?, season, json),
        Commands::Validate { config, data } => cmd_validate(load_config(config, data)?),
    }
}
