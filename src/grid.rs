//! Grid builder (C3): turns a sample stream into a bounding box and a
//! row-major tessellation of fixed-size cells.
//!
//! Grounded on the original `generate_corner_pts`/`generate_grid_fence`
//! pair: extrema over the stream, buffered outward by `cell_size_km`, then
//! stepped row-major from the north-west corner. This crate unifies the
//! original's two coexisting grid shapes (flat list vs. nested list) into
//! one 2-D representation with a linear-index view (see
//! [`Grid::index_of_point`]).

use crate::error::{AnalysisError, Result};
use crate::geo::{BBox, Point, DEG_PER_KM};
use crate::sample::Sample;

/// A single axis-aligned tile of the grid, identified by its linear index
/// `row * width + col` (row 0 is the northernmost row).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub index: usize,
    pub row: usize,
    pub col: usize,
}

/// A row-major tessellation of the bounding box into `width * height`
/// square cells of side `cell_size_km` (expressed in degrees as
/// `cell_size_km * DEG_PER_KM`).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub bbox: BBox,
    pub side_deg: f64,
    pub width: usize,
    pub height: usize,
}

impl Grid {
    /// Linear cell count, `width * height`.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locate the cell containing `point`, using the half-open containment
    /// rule (left-inclusive/right-exclusive longitude, top-inclusive/
    /// bottom-exclusive latitude). Returns `None` if the point falls outside
    /// the grid's bounding box — this happens when encoding a second stream
    /// (e.g. the route) against a grid built from a different stream (the
    /// vehicle trace).
    pub fn index_of_point(&self, point: Point) -> Option<Cell> {
        if point.lat > self.bbox.nw.lat
            || point.lat <= self.bbox.se.lat
            || point.lon < self.bbox.nw.lon
            || point.lon >= self.bbox.se.lon
        {
            return None;
        }
        let row = ((self.bbox.nw.lat - point.lat) / self.side_deg).floor() as usize;
        let col = ((point.lon - self.bbox.nw.lon) / self.side_deg).floor() as usize;
        let row = row.min(self.height - 1);
        let col = col.min(self.width - 1);
        Some(Cell {
            index: row * self.width + col,
            row,
            col,
        })
    }
}

/// Build a grid covering `samples`, buffered outward by `cell_size_km`, and
/// tessellated into cells of side `cell_size_km`.
///
/// Fails with [`AnalysisError::DegenerateGridError`] if the resulting width
/// or height is zero (a single distinct point, or a `cell_size_km` larger
/// than the buffered extent).
pub fn build_grid(samples: &[Sample], cell_size_km: f64) -> Result<Grid> {
    if samples.is_empty() {
        return Err(AnalysisError::DegenerateGridError {
            width: 0,
            height: 0,
        });
    }

    let mut max_lat = samples[0].lat;
    let mut min_lat = samples[0].lat;
    let mut max_lon = samples[0].lon;
    let mut min_lon = samples[0].lon;
    for s in samples {
        if s.lat > max_lat {
            max_lat = s.lat;
        } else if s.lat < min_lat {
            min_lat = s.lat;
        }
        if s.lon > max_lon {
            max_lon = s.lon;
        } else if s.lon < min_lon {
            min_lon = s.lon;
        }
    }

    let buffer = cell_size_km * DEG_PER_KM;
    let nw = Point::new(max_lat + buffer, min_lon - buffer);
    let se = Point::new(min_lat - buffer, max_lon + buffer);
    let bbox = BBox { nw, se };

    let side_deg = cell_size_km * DEG_PER_KM;
    let width = ((bbox.se.lon - bbox.nw.lon) / side_deg).ceil() as usize;
    let height = ((bbox.nw.lat - bbox.se.lat) / side_deg).ceil() as usize;

    if width == 0 || height == 0 {
        return Err(AnalysisError::DegenerateGridError { width, height });
    }

    Ok(Grid {
        bbox,
        side_deg,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_build_grid_basic() {
        let samples = vec![sample(0.0, 0.0), sample(1.0, 1.0)];
        let grid = build_grid(&samples, 1.0).unwrap();
        assert_eq!(grid.width * grid.height, grid.len());
        assert!(grid.width > 0 && grid.height > 0);
    }

    #[test]
    fn test_build_grid_empty_is_degenerate() {
        let samples: Vec<Sample> = vec![];
        let err = build_grid(&samples, 1.0).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateGridError { .. }));
    }

    #[test]
    fn test_index_of_point_half_open_containment() {
        let samples = vec![sample(0.0, 0.0), sample(1.0, 1.0)];
        let grid = build_grid(&samples, 1.0).unwrap();
        // nw corner itself must land in cell (0,0): top-inclusive, left-inclusive.
        let cell = grid.index_of_point(grid.bbox.nw).unwrap();
        assert_eq!(cell.row, 0);
        assert_eq!(cell.col, 0);
    }

    #[test]
    fn test_index_of_point_outside_grid_is_none() {
        let samples = vec![sample(0.0, 0.0), sample(1.0, 1.0)];
        let grid = build_grid(&samples, 1.0).unwrap();
        let far = Point::new(grid.bbox.nw.lat + 100.0, grid.bbox.nw.lon);
        assert!(grid.index_of_point(far).is_none());
    }
}
