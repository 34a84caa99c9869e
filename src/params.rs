//! Analysis parameters and their validation.
//!
//! `label` is bookkeeping only — no analyzer requires it.
//!
//! Every threshold is optional at the wire level: an absent entry disables
//! its respective analyzer. The accessor methods below turn "absent" and
//! "present but out of bounds" into the same
//! [`AnalysisError::ParameterError`] so the orchestrator can treat both
//! uniformly under its partial-failure policy.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// The six tunable thresholds shared by every analyzer, plus an optional
/// label for a saved preset. Each threshold is independently optional;
/// an absent threshold disables the analyzer that needs it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Optional name of a saved parameter preset (bookkeeping only).
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub cell_size_km: Option<f64>,
    #[serde(default)]
    pub stop_min_s: Option<f64>,
    #[serde(default)]
    pub stop_max_s: Option<f64>,
    #[serde(default)]
    pub speeding_speed_kmh: Option<f64>,
    #[serde(default)]
    pub speeding_time_s: Option<f64>,
    #[serde(default)]
    pub liveness_gap_s: Option<f64>,
}

fn missing(parameter: &str) -> AnalysisError {
    AnalysisError::ParameterError {
        parameter: parameter.to_string(),
        message: "required but not supplied".to_string(),
    }
}

fn invalid(parameter: &str, message: impl Into<String>) -> AnalysisError {
    AnalysisError::ParameterError {
        parameter: parameter.to_string(),
        message: message.into(),
    }
}

impl Parameters {
    /// `cell_size_km`, required by the grid builder, path encoder, and loop
    /// counter. Must be `> 0`.
    pub fn cell_size_km(&self) -> Result<f64> {
        let value = self.cell_size_km.ok_or_else(|| missing("cell_size_km"))?;
        if value <= 0.0 {
            return Err(invalid("cell_size_km", "must be greater than zero"));
        }
        Ok(value)
    }

    /// `(stop_min_s, stop_max_s)`, required by the stop analyzer. Both must
    /// be present, `stop_min_s >= 0`, and `stop_max_s >= stop_min_s`.
    pub fn stop_bounds(&self) -> Result<(f64, f64)> {
        let min = self.stop_min_s.ok_or_else(|| missing("stop_min_s"))?;
        let max = self.stop_max_s.ok_or_else(|| missing("stop_max_s"))?;
        if min < 0.0 {
            return Err(invalid("stop_min_s", "must be non-negative"));
        }
        if max < min {
            return Err(invalid(
                "stop_max_s",
                "must be greater than or equal to stop_min_s",
            ));
        }
        Ok((min, max))
    }

    /// `(speeding_speed_kmh, speeding_time_s)`, required by the speed
    /// analyzer. Speed must be `> 0`, duration `>= 0`.
    pub fn speeding_bounds(&self) -> Result<(f64, f64)> {
        let speed = self
            .speeding_speed_kmh
            .ok_or_else(|| missing("speeding_speed_kmh"))?;
        let duration = self
            .speeding_time_s
            .ok_or_else(|| missing("speeding_time_s"))?;
        if speed <= 0.0 {
            return Err(invalid("speeding_speed_kmh", "must be greater than zero"));
        }
        if duration < 0.0 {
            return Err(invalid("speeding_time_s", "must be non-negative"));
        }
        Ok((speed, duration))
    }

    /// `liveness_gap_s`, required by the liveness analyzer. Must be `> 0`.
    pub fn liveness_gap_s(&self) -> Result<f64> {
        let value = self
            .liveness_gap_s
            .ok_or_else(|| missing("liveness_gap_s"))?;
        if value <= 0.0 {
            return Err(invalid("liveness_gap_s", "must be greater than zero"));
        }
        Ok(value)
    }
}
