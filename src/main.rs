use anyhow::{Context, Result};
use breatheprint::{
    AirQualityService, BreathePrintConfig, Coordinate, NewWitnessReport, ReportStore, logging,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Regional air quality estimates and witness reports
#[derive(Parser, Debug)]
#[command(name = "breatheprint", version, about, long_about = None)]
struct Cli {
    /// Configuration file, defaults to the user config directory
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// Estimate air quality at a coordinate
    Estimate {
        #[arg(value_parser = parse_latitude, allow_negative_numbers = true)]
        lat: f64,
        #[arg(value_parser = parse_longitude, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Estimate air quality for a listed city
    City {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// List known cities
    Cities,
    /// Estimate and save a witness report
    Report {
        #[arg(value_parser = parse_latitude, allow_negative_numbers = true)]
        lat: f64,
        #[arg(value_parser = parse_longitude, allow_negative_numbers = true)]
        lon: f64,
        description: Vec<String>,
    },
    /// List saved witness reports, optionally near a coordinate
    Reports {
        #[arg(value_parser = parse_latitude, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,
        #[arg(value_parser = parse_longitude, allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Search radius, defaults to `reports.search_radius_km`
        #[arg(value_parser = parse_radius)]
        radius_km: Option<f64>,
    },
}

fn parse_bounded(value: &str, min: f64, max: f64) -> Result<f64, String> {
    let number: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !(min..=max).contains(&number) {
        return Err(format!("{number} is outside {min}..={max}"));
    }
    Ok(number)
}

fn parse_latitude(value: &str) -> Result<f64, String> {
    parse_bounded(value, -90.0, 90.0)
}

fn parse_longitude(value: &str) -> Result<f64, String> {
    parse_bounded(value, -180.0, 180.0)
}

fn parse_radius(value: &str) -> Result<f64, String> {
    parse_bounded(value, 0.0, 20_000.0)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> breatheprint::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(std::io::stdout().lock(), "{json}")?;
    Ok(())
}

fn open_store(config: &BreathePrintConfig) -> Result<ReportStore> {
    ReportStore::open(&config.reports.location)
        .with_context(|| format!("Reports location: {}", config.reports.location))
}

fn run(command: Command, config: &BreathePrintConfig) -> Result<()> {
    let service = AirQualityService::new(config);

    match command {
        Command::Estimate { lat, lon } => {
            print_json(&service.current_air_quality(Coordinate::new(lat, lon)))?;
        }
        Command::City { name } => {
            print_json(&service.air_quality_for_city(&name.join(" "))?)?;
        }
        Command::Cities => print_json(service.gazetteer().entries())?,
        Command::Report {
            lat,
            lon,
            description,
        } => {
            let store = open_store(config)?;
            let location = Coordinate::new(lat, lon);
            let reading = service.current_air_quality(location);
            let report =
                NewWitnessReport::new(location, reading).with_description(description.join(" "));
            print_json(&store.save(report)?)?;
        }
        Command::Reports {
            lat,
            lon,
            radius_km,
        } => {
            let store = open_store(config)?;
            let reports = match (lat, lon) {
                (Some(lat), Some(lon)) => {
                    let radius =
                        radius_km.unwrap_or_else(|| f64::from(config.reports.search_radius_km));
                    store.near(&Coordinate::new(lat, lon), radius)?
                }
                _ => store.all()?,
            };
            print_json(&reports)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = BreathePrintConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging)?;
    debug!("Running {:?}", cli.command);

    run(cli.command, &config)
}
