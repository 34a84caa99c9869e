//! Orchestration contract: the composition layer that drives the grid
//! builder and path encoder once per trace, then runs the five analyzers
//! independently and aggregates their results.
//!
//! Each analyzer runs regardless of whether its neighbors succeed, same as
//! a batch job that persists each sub-report independently — a missing or
//! invalid parameter skips just that analyzer and records why in
//! `warnings`, rather than failing the whole request.

use log::warn;
use serde::Serialize;

use crate::distance::compute_distance_km_str;
use crate::error::{AnalysisError, Result};
use crate::grid::build_grid;
use crate::liveness::{analyze_liveness, LivenessReport};
use crate::loops::{count_loops, LoopResult};
use crate::params::Parameters;
use crate::path::encode_path;
use crate::sample::Sample;
use crate::speed::{analyze_speed, SpeedMode, SpeedViolation};
use crate::stop::{analyze_stops, StopViolation, StopZone};

/// Everything the orchestrator needs for one analysis request.
#[derive(Debug, Clone)]
pub struct AnalyzeInputs<'a> {
    pub vehicle_samples: &'a [Sample],
    pub route_samples: &'a [Sample],
    pub stop_zones: &'a [StopZone],
    pub params: &'a Parameters,
}

/// The aggregated report, one sub-report per analyzer plus a distance total.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeReport {
    pub distance_km_str: String,
    pub loops: Option<LoopResult>,
    pub speed_violations: Vec<SpeedViolation>,
    pub stop_violations: Vec<StopViolation>,
    pub liveness: Option<LivenessReport>,
    /// Non-fatal per-analyzer failures (e.g. a missing parameter), one
    /// message per skipped sub-report.
    pub warnings: Vec<String>,
}

/// Run every analyzer over `inputs`, omitting the sub-report of any
/// analyzer that fails due to missing or invalid parameters and recording
/// why in `warnings`. A `ParseError` upstream of this call is fatal and
/// should prevent `analyze()` from being invoked at all; everything inside
/// `analyze()` degrades gracefully instead.
pub fn analyze(inputs: &AnalyzeInputs<'_>) -> Result<AnalyzeReport> {
    let mut warnings = Vec::new();

    let distance_km_str = compute_distance_km_str(inputs.vehicle_samples);

    let loops = match inputs.params.cell_size_km() {
        Ok(cell_size_km) => match run_loop_counter(inputs, cell_size_km) {
            Ok(n) => Some(LoopResult { loops: n }),
            Err(e) => {
                warn!("loop counter skipped: {}", e);
                warnings.push(format!("loops: {}", e));
                None
            }
        },
        Err(e) => {
            warn!("loop counter skipped: {}", e);
            warnings.push(format!("loops: {}", e));
            None
        }
    };

    let speed_violations = match inputs.params.speeding_bounds() {
        Ok((speed_kmh, min_duration_s)) => {
            analyze_speed(inputs.vehicle_samples, SpeedMode::Explicit, speed_kmh, min_duration_s)
        }
        Err(e) => {
            warn!("speed analyzer skipped: {}", e);
            warnings.push(format!("speed: {}", e));
            Vec::new()
        }
    };

    let stop_violations = match inputs.params.stop_bounds() {
        Ok((min_s, max_s)) => analyze_stops(inputs.vehicle_samples, inputs.stop_zones, min_s, max_s),
        Err(e) => {
            warn!("stop analyzer skipped: {}", e);
            warnings.push(format!("stop: {}", e));
            Vec::new()
        }
    };

    let liveness = match inputs.params.liveness_gap_s() {
        Ok(gap_s) => analyze_liveness(inputs.vehicle_samples, gap_s),
        Err(e) => {
            warn!("liveness analyzer skipped: {}", e);
            warnings.push(format!("liveness: {}", e));
            None
        }
    };

    Ok(AnalyzeReport {
        distance_km_str,
        loops,
        speed_violations,
        stop_violations,
        liveness,
        warnings,
    })
}

fn run_loop_counter(inputs: &AnalyzeInputs<'_>, cell_size_km: f64) -> Result<u32> {
    let grid = build_grid(inputs.vehicle_samples, cell_size_km)?;
    let vehicle_path = encode_path(inputs.vehicle_samples, &grid);
    let route_path = encode_path(inputs.route_samples, &grid);
    if route_path.is_empty() {
        return Err(AnalysisError::ParameterError {
            parameter: "route_samples".to_string(),
            message: "route produced an empty cell path against the vehicle grid".to_string(),
        });
    }
    Ok(count_loops(&route_path, &vehicle_path, &grid))
}

/// Run [`analyze`] over many independent traces in parallel using rayon.
/// Never used inside a single analysis — only across independent calls,
/// which is the only place traces are embarrassingly parallel.
#[cfg(feature = "parallel")]
pub fn analyze_many(batch: &[AnalyzeInputs<'_>]) -> Vec<Result<AnalyzeReport>> {
    use rayon::prelude::*;
    batch.par_iter().map(analyze).collect()
}
