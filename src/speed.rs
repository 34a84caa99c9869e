//! Speed analyzer (C6): emits intervals where speed holds at or above a
//! threshold for at least a minimum duration.
//!
//! One quirk is carried over verbatim rather than "fixed": `elapsed` grows
//! by `t_i - t_{i-1}` (the *previous* sample's gap), not `t_{i+1} - t_i`, so
//! a run's reported duration lags its true span by one sample. See
//! DESIGN.md for the rationale — this is a preserved-not-corrected behavior.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::geo::{haversine, Point};
use crate::sample::Sample;

/// How a sample's instantaneous speed is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedMode {
    /// Use the sample's own recorded `speed` when present, otherwise derive
    /// it from consecutive positions.
    Explicit,
    /// Always derive speed from consecutive positions, ignoring any
    /// recorded `speed` field.
    Location,
}

/// A contiguous span where speed held at or above `speed_kmh` for at least
/// `min_duration_s`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedViolation {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_point: Point,
    pub end_point: Point,
    pub duration_s: f64,
}

fn speed_between(a: &Sample, b: &Sample) -> f64 {
    let hours = (b.time - a.time).num_milliseconds() as f64 / 1000.0 / 3600.0;
    if hours <= 0.0 {
        return 0.0;
    }
    let d = haversine(Point::new(a.lat, a.lon), Point::new(b.lat, b.lon));
    d / hours
}

/// Find runs of at-or-above-threshold speed held for at least
/// `min_duration_s`, returning one violation per completed run.
///
/// Terminal runs that never drop back below `speed_kmh` by end-of-stream are
/// discarded — open-ended runs are never reported.
pub fn analyze_speed(
    samples: &[Sample],
    mode: SpeedMode,
    speed_kmh: f64,
    min_duration_s: f64,
) -> Vec<SpeedViolation> {
    if samples.len() < 2 {
        return Vec::new();
    }

    let mut elapsed = 0.0_f64;
    let mut first_point = true;
    let mut starting_point: Option<&Sample> = None;
    let mut violations = Vec::new();

    for i in 0..samples.len() - 1 {
        let p1 = &samples[i];
        let p2 = &samples[i + 1];

        let speed = match mode {
            SpeedMode::Explicit => p1.speed.unwrap_or_else(|| speed_between(p1, p2)),
            SpeedMode::Location => speed_between(p1, p2),
        };

        if speed >= speed_kmh {
            if first_point {
                starting_point = Some(p1);
                first_point = false;
            } else {
                let time0 = if i > 0 { samples[i - 1].time } else { p1.time };
                elapsed += (p1.time - time0).num_milliseconds() as f64 / 1000.0;
            }
        } else {
            if elapsed >= min_duration_s {
                if let Some(start) = starting_point {
                    let end = if i > 0 { &samples[i - 1] } else { start };
                    violations.push(SpeedViolation {
                        start_time: start.time,
                        end_time: end.time,
                        start_point: Point::new(start.lat, start.lon),
                        end_point: Point::new(end.lat, end.lon),
                        duration_s: elapsed,
                    });
                }
            }
            elapsed = 0.0;
            first_point = true;
        }
    }

    violations
}
