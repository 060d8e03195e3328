//! Survey plan due-diligence CLI.
//!
//! Reads an extraction record, converts its Minna coordinates to WGS84 and
//! optionally checks the parcel against the restricted-zone registry.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use omo_radar::error::{TransformationError, ValidationError};
use omo_radar::models::ZoneType;
use omo_radar::{Config, CoordinateTransformer, ExtractionRecord, ProjectedZone, RiskRadar};

#[derive(Parser, Debug)]
#[command(name = "radar")]
#[command(about = "Convert survey plan coordinates and screen parcels for restricted zones")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a record's coordinates to WGS84
    Convert {
        /// Extraction record JSON, or - for stdin
        record: PathBuf,

        /// Projected zone of the survey (west, east, 31n, 26332, ...)
        #[arg(short, long)]
        zone: ProjectedZone,

        /// Write CSV instead of JSON
        #[arg(long)]
        csv: bool,
    },
    /// Convert a record's boundary and check it against restricted zones
    Check {
        /// Extraction record JSON, or - for stdin
        record: PathBuf,

        /// Projected zone of the survey
        #[arg(short, long)]
        zone: ProjectedZone,

        /// Only check against this zone id
        #[arg(long)]
        zone_filter: Option<String>,
    },
    /// List active restricted zones
    Zones {
        /// Only list zones of this type, e.g. "Military Reserve"
        #[arg(long)]
        zone_type: Option<String>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            if is_validation(&e) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Bad input, as opposed to a system failure. A batch counts when every
/// point in it failed validation.
fn is_validation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if cause.is::<ValidationError>() {
            return true;
        }
        match cause.downcast_ref::<omo_radar::Error>() {
            Some(omo_radar::Error::Transformation(TransformationError::Batch { failures, .. })) => {
                failures.iter().all(|f| f.error.is_validation())
            }
            Some(e) => e.is_validation(),
            None => false,
        }
    })
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::load_from_file(path)?
        }
        None => Config::default(),
    };

    match args.command {
        Command::Convert { record, zone, csv } => {
            let record = load_record(&record)?;
            let transformer = CoordinateTransformer::new(&config.transform)?;
            let converted = transformer.convert_batch(&record.coordinates, zone)?;

            if csv {
                let mut writer = csv::Writer::from_writer(io::stdout());
                for coord in &converted {
                    writer.serialize(coord)?;
                }
                writer.flush()?;
            } else {
                serde_json::to_writer_pretty(io::stdout(), &converted)?;
                println!();
            }
        }
        Command::Check {
            record,
            zone,
            zone_filter,
        } => {
            let record = load_record(&record)?;
            let transformer = CoordinateTransformer::new(&config.transform)?;
            let radar = RiskRadar::new(config.registry(), config.risk.clone())?;

            let converted = transformer.convert_batch(&record.coordinates, zone)?;
            let vertices: Vec<(f64, f64)> = converted.iter().map(|c| c.lat_lon()).collect();
            let verdict = radar.check_intersection(&vertices, zone_filter.as_deref())?;

            info!(
                "Survey {} by {}: {}",
                record.survey_number, record.surveyor_name, verdict.status
            );
            serde_json::to_writer_pretty(io::stdout(), &verdict)?;
            println!();
        }
        Command::Zones { zone_type } => {
            let radar = RiskRadar::new(config.registry(), config.risk.clone())?;

            let zones: Vec<_> = match zone_type.as_deref() {
                Some(name) => radar.zones_by_type(&parse_zone_type(name)),
                None => radar.zones().iter().collect(),
            };
            let active: Vec<_> = zones
                .into_iter()
                .filter(|z| radar.is_active(&z.zone_id))
                .collect();

            info!(
                "{} of {} registry zones listed",
                active.len(),
                radar.zones().len()
            );
            serde_json::to_writer_pretty(io::stdout(), &active)?;
            println!();
        }
    }

    Ok(())
}

fn load_record(path: &Path) -> Result<ExtractionRecord> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read record from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read record {}", path.display()))?
    };

    let value: serde_json::Value =
        serde_json::from_str(&content).context("Failed to parse record JSON")?;
    let record = ExtractionRecord::from_json(&value)?;

    info!(
        "Loaded survey {} ({}) with {} coordinates",
        record.survey_number,
        record.location_text,
        record.coordinates.len()
    );
    debug!("{}", record.coordinates_summary());
    for flag in &record.red_flags {
        warn!("Extraction red flag: {}", flag);
    }

    Ok(record)
}

/// Known types match case-insensitively; anything else is taken verbatim
fn parse_zone_type(name: &str) -> ZoneType {
    let name = name.trim();
    ZoneType::KNOWN
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(name))
        .unwrap_or_else(|| ZoneType::Other(name.to_string()))
}
