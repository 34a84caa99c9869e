//! Path encoder (C4): maps a sample stream onto a grid, producing a
//! compressed sequence of visited cell indices.
//!
//! Computes `(row, col)` directly from coordinates rather than linear-
//! scanning the grid fence for each point, which is equivalent under the
//! half-open containment rule and avoids an `O(N*W*H)` scan.

use crate::grid::Grid;
use crate::sample::Sample;

/// A compressed, ordered sequence of cell indices: consecutive duplicates
/// are elided, but the path is not otherwise simplified (non-adjacent
/// repeats are kept).
pub type CellPath = Vec<usize>;

/// Encode a sample stream against `grid` into a [`CellPath`].
///
/// Samples that fall outside `grid`'s bounding box are silently skipped —
/// this is expected when encoding a route trace against a grid built from
/// the vehicle trace.
pub fn encode_path(samples: &[Sample], grid: &Grid) -> CellPath {
    let mut path = Vec::new();
    let mut current: Option<usize> = None;

    for sample in samples {
        let point = crate::geo::Point::new(sample.lat, sample.lon);
        let Some(cell) = grid.index_of_point(point) else {
            continue;
        };
        if current != Some(cell.index) {
            current = Some(cell.index);
            path.push(cell.index);
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid;
    use chrono::{TimeZone, Utc};

    fn sample(lat: f64, lon: f64) -> Sample {
        Sample {
            lat,
            lon,
            elevation: None,
            time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            speed: None,
        }
    }

    #[test]
    fn test_encode_path_no_consecutive_duplicates() {
        let samples = vec![
            sample(0.0, 0.0),
            sample(0.0001, 0.0001),
            sample(0.0, 0.0),
            sample(1.0, 1.0),
        ];
        let grid = build_grid(&samples, 1.0).unwrap();
        let path = encode_path(&samples, &grid);
        for w in path.windows(2) {
            assert_ne!(w[0], w[1]);
        }
    }

    #[test]
    fn test_encode_path_skips_points_outside_grid() {
        let samples = vec![sample(0.0, 0.0), sample(1.0, 1.0)];
        let grid = build_grid(&samples, 1.0).unwrap();
        let far_sample = vec![sample(grid.bbox.nw.lat + 50.0, grid.bbox.nw.lon)];
        let path = encode_path(&far_sample, &grid);
        assert!(path.is_empty());
    }
}
