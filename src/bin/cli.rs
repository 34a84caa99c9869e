//! CLI front-end (`cli` feature): reads a vehicle GPX, a route GPX, an
//! optional stop-zone CSV, and a parameters JSON file, runs the analysis,
//! and prints the report as JSON.
//!
//! Grounded on `coursepointer-cli`'s `clap::Parser` shape, with explicit
//! exit codes instead of a single opaque error type: `0` success, `2` parse
//! error, `3` parameter error, `4` degenerate grid, `1` other.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use trajectory_analytics::error::AnalysisError;
use trajectory_analytics::sample::{parse_gpx, parse_stop_csv};
use trajectory_analytics::stop::zones_from_points;
use trajectory_analytics::{analyze, AnalyzeInputs, AnalyzeReport, Parameters};

/// Run fleet trajectory analytics against a vehicle trace and a reference route.
#[derive(Parser)]
#[command(name = "trajectory-analytics")]
struct Args {
    /// Vehicle GPS trace (GPX)
    vehicle_gpx: PathBuf,
    /// Reference route trace (GPX)
    route_gpx: PathBuf,
    /// Parameters (JSON, see `Parameters`)
    params: PathBuf,
    /// Legacy stop-zone CSV ingest (id,lat1,long1,lat2,long2)
    #[arg(long)]
    stops_csv: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(report) => {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::from(0)
                }
                Err(e) => {
                    eprintln!("error: failed to serialize report: {}", e);
                    ExitCode::from(1)
                }
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn exit_code_for(err: &AnalysisError) -> u8 {
    match err {
        AnalysisError::ParseError { .. } => 2,
        AnalysisError::ParameterError { .. } => 3,
        AnalysisError::DegenerateGridError { .. } => 4,
        AnalysisError::OutOfRangeError { .. } => 1,
    }
}

fn read_source(path: &PathBuf, source: &str) -> Result<Vec<u8>, AnalysisError> {
    fs::read(path).map_err(|e| AnalysisError::ParseError {
        source: source.to_string(),
        message: format!("could not read {}: {}", path.display(), e),
        line: None,
    })
}

fn run(args: &Args) -> Result<AnalyzeReport, AnalysisError> {
    info!("reading vehicle trace from {}", args.vehicle_gpx.display());
    let vehicle_samples = parse_gpx(&read_source(&args.vehicle_gpx, "vehicle-gpx")?)?;

    info!("reading route trace from {}", args.route_gpx.display());
    let route_samples = parse_gpx(&read_source(&args.route_gpx, "route-gpx")?)?;

    let stop_zones = match &args.stops_csv {
        Some(path) => {
            info!("reading stop zones from {}", path.display());
            let points = parse_stop_csv(&read_source(path, "stop-csv")?)?;
            zones_from_points(&points)
        }
        None => Vec::new(),
    };

    info!("reading parameters from {}", args.params.display());
    let params_bytes = read_source(&args.params, "params")?;
    let params: Parameters =
        serde_json::from_slice(&params_bytes).map_err(|e| AnalysisError::ParseError {
            source: "params".to_string(),
            message: e.to_string(),
            line: None,
        })?;

    let inputs = AnalyzeInputs {
        vehicle_samples: &vehicle_samples,
        route_samples: &route_samples,
        stop_zones: &stop_zones,
        params: &params,
    };

    info!("running analysis over {} vehicle samples", vehicle_samples.len());
    analyze(&inputs)
}
