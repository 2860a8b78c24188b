//! regioncast CLI
//!
//! Imports regions, runs weather refreshes and inspects stored results.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod context;
mod import;
mod output;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, bail};
use application::{ApplicationError, RegionStore, SnapshotStore};
use chrono::Utc;
use clap::{Parser, Subcommand};
use domain::Region;
use infrastructure::{
    AppConfig, AsyncDatabase, AsyncDatabaseConfig, SchedulerConfig, TaskScheduler,
    TracingBatchReporter, WEATHER_REFRESH_TASK, create_weather_refresh_task, init_telemetry,
};
use tracing::info;

use crate::context::AppContext;

/// Exit status of `show` for a region without coordinates
const EXIT_MISSING_COORDINATES: i32 = 4;

/// regioncast CLI
#[derive(Debug, Parser)]
#[command(name = "regioncast")]
#[command(author, version, about = "Regional weather snapshot aggregator", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./config.* when present)
    #[arg(short, long, global = true, env = "REGIONCAST_CONFIG")]
    config: Option<PathBuf>,

    /// Verbosity level (overrides the configured log filter)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,

    /// Insert or update regions from a JSON file
    ///
    /// The file holds an array of objects with `code`, `name` and optional
    /// `level`, `latitude` and `longitude`.
    ImportRegions {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// List tracked regions
    Regions,

    /// Fetch, aggregate and store weather for every region
    ///
    /// Exits with status 2 when at least one region failed.
    Fetch {
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch and print the live aggregate for one region without storing it
    Show {
        /// Region code
        code: String,
    },

    /// Print the stored snapshot for one region
    Snapshot {
        /// Region code
        code: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print stored hourly history for one region, newest first
    History {
        /// Region code
        code: String,

        /// Maximum rows to print
        #[arg(short, long, default_value_t = 24)]
        limit: u32,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the weather refresh on a cron schedule until interrupted
    Schedule {
        /// Cron expression (6 fields, seconds first); defaults to the
        /// configured `batch.schedule`
        #[arg(long)]
        cron: Option<String>,

        /// Run one refresh immediately before waiting for the schedule
        #[arg(long)]
        now: bool,
    },
}

/// Map `-v` occurrences to a log filter; `None` keeps the configured one
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("Invalid configuration")?;
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }
    Ok(config)
}

async fn find_region(ctx: &AppContext, code: &str) -> anyhow::Result<Region> {
    match ctx.regions.find_by_code(code).await? {
        Some(region) => Ok(region),
        None => bail!("Region {code} not found"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Migrate => {
            let database = AsyncDatabase::new(&AsyncDatabaseConfig::from(&config.database))
                .await
                .with_context(|| format!("Failed to open database {}", config.database.path))?;
            database.migrate().await.context("Failed to apply migrations")?;
            database.close().await;
            println!("✅ Database {} is up to date", config.database.path);
        },

        Commands::ImportRegions { file } => {
            let drafts = import::read_drafts(&file)?;
            let ctx = AppContext::connect(config).await?;
            let stored = import::import_regions(ctx.regions.as_ref(), &drafts).await?;
            let mapped = stored.iter().filter(|r| r.latitude.is_some()).count();
            println!(
                "✅ Imported {} regions ({mapped} with coordinates)",
                stored.len()
            );
        },

        Commands::Regions => {
            let ctx = AppContext::connect(config).await?;
            let regions = ctx.regions.list_regions().await?;
            if regions.is_empty() {
                println!("No regions. Import some with `regioncast import-regions <file>`.");
            }
            for region in regions {
                let coords = match (region.latitude, region.longitude) {
                    (Some(lat), Some(lon)) => format!("{lat:.4}, {lon:.4}"),
                    _ => "no coordinates".to_string(),
                };
                println!("{:>8}  {:<32} {coords}", region.code, region.name);
            }
        },

        Commands::Fetch { json } => {
            let ctx = AppContext::connect(config).await?;
            let reporter = TracingBatchReporter::new();
            let summary = ctx
                .runner()
                .run(Utc::now(), &reporter)
                .await
                .context("Weather refresh could not start")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", output::render_summary(&summary));
            }

            let code = summary.exit_code();
            if code != 0 {
                ctx.database.close().await;
                std::process::exit(code);
            }
        },

        Commands::Show { code } => {
            let ctx = AppContext::connect(config).await?;
            let region = find_region(&ctx, &code).await?;

            match ctx.aggregator.aggregate_region(&region, Utc::now()).await {
                Ok(aggregate) => println!("{}", serde_json::to_string_pretty(&aggregate)?),
                Err(e @ ApplicationError::MissingCoordinates { .. }) => {
                    eprintln!("❌ {e}");
                    ctx.database.close().await;
                    std::process::exit(EXIT_MISSING_COORDINATES);
                },
                Err(e) => return Err(e).context(format!("Failed to aggregate region {code}")),
            }
        },

        Commands::Snapshot { code, json } => {
            let ctx = AppContext::connect(config).await?;
            let region = find_region(&ctx, &code).await?;

            match ctx.snapshots.get_snapshot(region.id).await? {
                Some(snapshot) if json => {
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                },
                Some(snapshot) => println!("{}", output::render_snapshot(&code, &snapshot)),
                None => println!("No snapshot stored for region {code}"),
            }
        },

        Commands::History { code, limit, json } => {
            let ctx = AppContext::connect(config).await?;
            let region = find_region(&ctx, &code).await?;
            let records = ctx.snapshots.recent_history(region.id, limit).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                let total = ctx.snapshots.count_history(region.id).await?;
                print!("{}", output::render_history(&records));
                println!("{} of {total} stored rows", records.len());
            }
        },

        Commands::Schedule { cron, now } => {
            let cron = cron.unwrap_or_else(|| config.batch.schedule.clone());
            let ctx = AppContext::connect(config).await?;
            let runner = Arc::new(ctx.runner());
            let task = create_weather_refresh_task(Arc::clone(&runner));

            if now {
                task().await.map_err(anyhow::Error::msg)?;
            }

            let scheduler = TaskScheduler::new(SchedulerConfig::default()).await?;
            scheduler.add_task(WEATHER_REFRESH_TASK, &cron, task).await?;
            println!("⏱  Weather refresh scheduled ({cron}). Press Ctrl+C to stop.");

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl+C")?;

            info!("Shutdown requested");
            if let Some(stats) = scheduler.get_task_stats(WEATHER_REFRESH_TASK) {
                println!(
                    "Runs: {} ok, {} failed, {} skipped",
                    stats.success_count, stats.failure_count, stats.skipped_count
                );
            }
            scheduler.stop().await?;
            ctx.database.close().await;
        },
    }

    Ok(())
}
