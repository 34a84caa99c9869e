//! Liveness analyzer (C8): segments the stream wherever the gap between
//! consecutive samples meets or exceeds a threshold.
//!
//! Grounded on the original `compute_liveness`: every gap-exceeding
//! transition splits the stream into a new segment regardless of cause, and
//! the final segment always closes at the last sample (there is no
//! "open" tail, unlike the stop and speed analyzers).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sample::Sample;

/// A contiguous span of "alive" time, bounded by the stream's start/end or
/// by a gap meeting or exceeding `gap_s`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LivenessSegment {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_s: f64,
}

/// Total liveness plus the segment breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LivenessReport {
    pub total_s: f64,
    pub segments: Vec<LivenessSegment>,
}

/// Walk adjacent sample pairs, closing a segment whenever `Δt >= gap_s`; the
/// final segment always closes at the last sample.
pub fn analyze_liveness(samples: &[Sample], gap_s: f64) -> Option<LivenessReport> {
    if samples.is_empty() {
        return None;
    }
    if samples.len() == 1 {
        return Some(LivenessReport {
            total_s: 0.0,
            segments: vec![LivenessSegment {
                start_time: samples[0].time,
                end_time: samples[0].time,
                duration_s: 0.0,
            }],
        });
    }

    let mut segments = Vec::new();
    let mut total_s = 0.0;
    let mut start_index = 0;

    for i in 0..samples.len() - 1 {
        let t0 = samples[i].time;
        let t1 = samples[i + 1].time;
        let gap = (t1 - t0).num_milliseconds() as f64 / 1000.0;

        if gap >= gap_s {
            let duration_s =
                (samples[i].time - samples[start_index].time).num_milliseconds() as f64 / 1000.0;
            segments.push(LivenessSegment {
                start_time: samples[start_index].time,
                end_time: samples[i].time,
                duration_s,
            });
            total_s += duration_s;
            start_index = i + 1;
        }
    }

    let last = samples.len() - 1;
    let duration_s =
        (samples[last].time - samples[start_index].time).num_milliseconds() as f64 / 1000.0;
    segments.push(LivenessSegment {
        start_time: samples[start_index].time,
        end_time: samples[last].time,
        duration_s,
    });
    total_s += duration_s;

    Some(LivenessReport { total_s, segments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(sec: u32) -> Sample {
        Sample {
            lat: 0.0,
            lon: 0.0,
            elevation: None,
            time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, sec).unwrap(),
            speed: None,
        }
    }

    #[test]
    fn test_liveness_splits_on_gap() {
        // t=0,10,100,110, gap_s=30 -> two segments of 10 and 10, total 20.
        let samples = vec![sample(0), sample(10), sample(100), sample(110)];
        let report = analyze_liveness(&samples, 30.0).unwrap();
        assert_eq!(report.segments.len(), 2);
        assert_eq!(report.segments[0].duration_s, 10.0);
        assert_eq!(report.segments[1].duration_s, 10.0);
        assert_eq!(report.total_s, 20.0);
    }

    #[test]
    fn test_liveness_total_equals_sum_of_segments() {
        let samples = vec![sample(0), sample(5), sample(50), sample(55), sample(56)];
        let report = analyze_liveness(&samples, 20.0).unwrap();
        let sum: f64 = report.segments.iter().map(|s| s.duration_s).sum();
        assert!((report.total_s - sum).abs() < 1e-9);
    }

    #[test]
    fn test_liveness_empty_stream_is_none() {
        let samples: Vec<Sample> = vec![];
        assert!(analyze_liveness(&samples, 10.0).is_none());
    }

    #[test]
    fn test_liveness_single_sample_is_trivial_segment() {
        let samples = vec![sample(0)];
        let report = analyze_liveness(&samples, 10.0).unwrap();
        assert_eq!(report.segments.len(), 1);
        assert_eq!(report.total_s, 0.0);
    }
}
