//! Station Walk CLI
//!
//! Resolves points of interest to their nearest station and walking route.

#![allow(clippy::print_stdout)]

mod app;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use application::ports::{ResolvedLocationStorePort, StationStorePort};
use application::{BatchConfig, BatchRunner, Resolution};
use clap::{Parser, Subcommand};
use domain::entities::{PointOfInterest, Station};
use domain::value_objects::GeoLocation;
use infrastructure::{AppConfig, LogFormat, init_tracing, read_points_of_interest, read_stations};
use tracing::info;

use crate::app::App;

/// Station Walk CLI
#[derive(Parser)]
#[command(name = "station-walk")]
#[command(author, version, about = "Nearest-station walking distance resolver", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, global = true, env = "STATION_WALK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single point of interest
    ///
    /// Example: station-walk resolve "Test Cafe" --address "1 Example Road"
    Resolve {
        /// Place name
        name: String,

        /// Free-text address to disambiguate the search
        #[arg(short, long)]
        address: Option<String>,

        /// Known latitude (skips geocoding, requires --lon)
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Known longitude (skips geocoding, requires --lat)
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Identifier for the stored row (defaults to the name)
        #[arg(long)]
        id: Option<String>,

        /// Store the result in the database
        #[arg(long)]
        save: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a JSON file of points of interest
    ///
    /// Example: station-walk batch places.json --offset 0 --limit 500
    Batch {
        /// JSON array of {id, name, address?, latitude?, longitude?}
        input: PathBuf,

        /// Index of the first item of this partition
        #[arg(long)]
        offset: Option<usize>,

        /// Maximum number of items in this partition
        #[arg(long)]
        limit: Option<usize>,

        /// Pause between items in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Re-resolve items that already have a stored row
        #[arg(long)]
        no_skip_existing: bool,

        /// Measure only the k planar-closest stations exactly
        #[arg(long)]
        prefilter: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load stations from a JSON file into the database
    ///
    /// Example: station-walk import-stations stations.json
    ImportStations {
        /// JSON array of {id, name, latitude?, longitude?}
        file: PathBuf,
    },

    /// Show the stored result for one point of interest
    ///
    /// Example: station-walk show p1
    Show {
        /// Point-of-interest identifier
        poi_id: String,

        /// Print the row as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored stations
    Stations {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

const fn log_format(json: bool) -> LogFormat {
    if json { LogFormat::Json } else { LogFormat::Pretty }
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => AppConfig::load().context("Failed to load configuration"),
    }
}

/// Apply command-line overrides to the configured batch settings
fn batch_config(
    base: &BatchConfig,
    offset: Option<usize>,
    limit: Option<usize>,
    delay_ms: Option<u64>,
    no_skip_existing: bool,
) -> BatchConfig {
    BatchConfig {
        offset: offset.unwrap_or(base.offset),
        limit: limit.or(base.limit),
        delay_ms: delay_ms.unwrap_or(base.delay_ms),
        skip_existing: base.skip_existing && !no_skip_existing,
        ..base.clone()
    }
}

fn point_of_interest(
    name: String,
    address: Option<String>,
    coordinate: Option<(f64, f64)>,
    id: Option<String>,
) -> Result<PointOfInterest> {
    let id = id.unwrap_or_else(|| name.clone());
    let mut poi = PointOfInterest::new(id, name);
    if let Some(address) = address {
        poi = poi.with_address(address);
    }
    if let Some((lat, lon)) = coordinate {
        let location = GeoLocation::new(lat, lon).context("Invalid --lat/--lon")?;
        poi = poi.with_location(location);
    }
    Ok(poi)
}

fn format_station(station: &Station) -> String {
    match station.location {
        Some(location) => format!("{:<12} {:<32} {location}", station.id, station.name),
        None => format!("{:<12} {:<32} (no location)", station.id, station.name),
    }
}

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(log_filter_from_verbosity(cli.verbose), log_format(cli.log_json))?;

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Resolve {
            name,
            address,
            lat,
            lon,
            id,
            save,
            json,
        } => {
            let app = App::open(config)?;
            let poi = point_of_interest(name, address, lat.zip(lon), id)?;
            let resolver = app.resolver().await?;

            match resolver.resolve(&poi).await? {
                Resolution::Resolved(location) => {
                    if save {
                        app.resolved_store().save(&location).await?;
                        info!(poi_id = %location.poi_id, "Saved");
                    }
                    if json {
                        println!("{}", serde_json::to_string_pretty(&location)?);
                    } else {
                        println!("{}: {}", location.poi_name, location.summary());
                        if let Some(provider_name) = &location.provider_name {
                            println!("  matched: {provider_name} at {}", location.location);
                        }
                    }
                },
                Resolution::Flagged { reason } => {
                    if json {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&serde_json::json!({
                                "poi_id": poi.id,
                                "name": poi.name,
                                "flagged": reason,
                            }))?
                        );
                    } else {
                        println!("{}: flagged ({reason})", poi.name);
                    }
                    std::process::exit(2);
                },
            }
        },

        Commands::Batch {
            input,
            offset,
            limit,
            delay_ms,
            no_skip_existing,
            prefilter,
            json,
        } => {
            let mut config = config;
            config.batch = batch_config(&config.batch, offset, limit, delay_ms, no_skip_existing);
            if prefilter.is_some() {
                config.locator.prefilter_k = prefilter;
            }

            let items = read_points_of_interest(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;

            let app = App::open(config)?;
            let runner = BatchRunner::new(app.resolver().await?, Arc::new(app.resolved_store()))
                .with_config(app.config.batch.clone());

            let report = runner.run(&items).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }

            if report.errored > 0 {
                std::process::exit(1);
            }
        },

        Commands::ImportStations { file } => {
            let stations = read_stations(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let app = App::open(config)?;
            let store = app.station_store();
            let written = store.upsert_many(&stations).await?;
            let total = store.count().await?;
            let located = stations.iter().filter(|s| s.has_location()).count();

            println!(
                "Imported {written} stations ({located} with coordinates); {total} stored in total"
            );
        },

        Commands::Show { poi_id, json } => {
            let app = App::open(config)?;
            let store = app.resolved_store();
            let Some(location) = store.get(&poi_id).await? else {
                bail!("No stored result for {poi_id}");
            };
            let resolved_at = store.resolved_at(&poi_id).await?;

            if json {
                let mut row = serde_json::to_value(&location)?;
                row["resolved_at"] = serde_json::to_value(resolved_at)?;
                println!("{}", serde_json::to_string_pretty(&row)?);
            } else {
                println!("{}: {}", location.poi_name, location.summary());
                if let Some(resolved_at) = resolved_at {
                    println!("  resolved at {}", resolved_at.to_rfc3339());
                }
            }
        },

        Commands::Stations { json } => {
            let app = App::open(config)?;
            let stations = app.station_store().load_all().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stations)?);
            } else {
                for station in &stations {
                    println!("{}", format_station(station));
                }
                println!("{} stations", stations.len());
            }
        },
    }

    Ok(())
}
