//! Stop analyzer (C7): detects dwell-time violations inside stop zones.
//!
//! Grounded on the original `stop_violation`/`compute_stop_violation`: each
//! zone is an axis-aligned polygon (a pair of corner points), and the
//! stream is scanned for maximal contiguous spans contained in it. A span
//! still open at end-of-stream is discarded, matching the original's
//! `index_start != -1` never being flushed after the loop.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::geo::Point;
use crate::sample::Sample;

/// An axis-aligned stop zone: a pair of corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopZone {
    pub corner1: Point,
    pub corner2: Point,
}

impl StopZone {
    /// Bbox corners, normalized to `top_left`/`bottom_right` the way the
    /// original `Polygon` expects them regardless of input corner order.
    fn bounds(&self) -> (Point, Point) {
        let top_left = Point::new(
            self.corner1.lat.max(self.corner2.lat),
            self.corner1.lon.min(self.corner2.lon),
        );
        let bottom_right = Point::new(
            self.corner1.lat.min(self.corner2.lat),
            self.corner1.lon.max(self.corner2.lon),
        );
        (top_left, bottom_right)
    }

    /// Half-open containment: `top_left.lat >= p.lat > bottom_right.lat` and
    /// `top_left.lon <= p.lon < bottom_right.lon`, as in the original
    /// `Polygon.contains`.
    fn contains(&self, point: Point) -> bool {
        let (top_left, bottom_right) = self.bounds();
        top_left.lat >= point.lat
            && top_left.lon <= point.lon
            && bottom_right.lat < point.lat
            && bottom_right.lon > point.lon
    }

    /// Midpoint of the zone's two corners.
    pub fn center(&self) -> Point {
        Point::new(
            (self.corner1.lat + self.corner2.lat) / 2.0,
            (self.corner1.lon + self.corner2.lon) / 2.0,
        )
    }
}

/// Which bound a [`StopViolation`] breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopViolationKind {
    Below,
    Above,
}

/// A completed dwell span inside a stop zone that breached `stop_min_s` or
/// `stop_max_s`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopViolation {
    pub kind: StopViolationKind,
    pub duration_s: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub center_point: Point,
}

/// Scan `samples` for maximal contiguous spans inside `zone`, emitting a
/// violation for each completed span whose duration falls outside
/// `[stop_min_s, stop_max_s]`. A span still open at end-of-stream is
/// discarded.
pub fn analyze_stop_zone(
    samples: &[Sample],
    zone: &StopZone,
    stop_min_s: f64,
    stop_max_s: f64,
) -> Vec<StopViolation> {
    let mut results = Vec::new();
    let mut index_start: Option<usize> = None;

    for i in 0..samples.len() {
        let point = Point::new(samples[i].lat, samples[i].lon);
        if zone.contains(point) {
            if index_start.is_none() {
                index_start = Some(i);
            }
        } else if let Some(start) = index_start.take() {
            let end = i - 1;
            let duration_s =
                (samples[end].time - samples[start].time).num_milliseconds() as f64 / 1000.0;

            if duration_s < stop_min_s || duration_s > stop_max_s {
                let kind = if duration_s < stop_min_s {
                    StopViolationKind::Below
                } else {
                    StopViolationKind::Above
                };
                results.push(StopViolation {
                    kind,
                    duration_s,
                    start_time: samples[start].time,
                    end_time: samples[end].time,
                    center_point: zone.center(),
                });
            }
        }
    }

    results
}

/// Run [`analyze_stop_zone`] over every zone in `zones` (a flat, corner-pair
/// list as produced by `parse_waypoints`/`parse_stop_csv`), concatenating
/// results in zone order.
pub fn analyze_stops(
    samples: &[Sample],
    zones: &[StopZone],
    stop_min_s: f64,
    stop_max_s: f64,
) -> Vec<StopViolation> {
    zones
        .iter()
        .flat_map(|zone| analyze_stop_zone(samples, zone, stop_min_s, stop_max_s))
        .collect()
}

/// Pair up a flat, alternating-corner point list into [`StopZone`]s, as the
/// original `compute_stop_violation` does by indexing `stops[2k]`/
/// `stops[2k+1]`.
pub fn zones_from_points(points: &[Point]) -> Vec<StopZone> {
    points
        .chunks_exact(2)
        .map(|pair| StopZone {
            corner1: pair[0],
            corner2: pair[1],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(lat: f64, lon: f64, sec: u32) -> Sample {
        Sample {
            lat,
            lon,
            elevation: None,
            time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, sec).unwrap(),
            speed: None,
        }
    }

    #[test]
    fn test_stop_below_limit() {
        let zone = StopZone {
            corner1: Point::new(1.0, -1.0),
            corner2: Point::new(-1.0, 1.0),
        };
        let samples = vec![sample(0.0, 0.0, 0), sample(0.0, 0.0, 5)];
        let violations = analyze_stop_zone(&samples, &zone, 10.0, 600.0);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, StopViolationKind::Below);
        assert_eq!(violations[0].duration_s, 5.0);
    }

    #[test]
    fn test_stop_above_limit() {
        let zone = StopZone {
            corner1: Point::new(1.0, -1.0),
            corner2: Point::new(-1.0, 1.0),
        };
        let samples = vec![sample(0.0, 0.0, 0), sample(0.0, 0.0, 1000)];
        let violations = analyze_stop_zone(&samples, &zone, 10.0, 600.0);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, StopViolationKind::Above);
    }

    #[test]
    fn test_stop_span_open_at_end_is_discarded() {
        let zone = StopZone {
            corner1: Point::new(1.0, -1.0),
            corner2: Point::new(-1.0, 1.0),
        };
        // Never leaves the zone before the stream ends, so the span stays
        // open and is discarded regardless of its would-be duration.
        let samples = vec![sample(0.0, 0.0, 0), sample(0.0, 0.0, 5)];
        let violations = analyze_stop_zone(&samples, &zone, 100.0, 600.0);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_zones_from_points_pairs_by_index() {
        let points = vec![
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
            Point::new(4.0, 4.0),
        ];
        let zones = zones_from_points(&points);
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[1].corner1, Point::new(3.0, 3.0));
    }
}
