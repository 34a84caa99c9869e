//! Geographic primitives shared by every analyzer: points, axis-aligned
//! bounding boxes, and the haversine distance.
//!
//! The system is deliberately equirectangular at working latitudes: grid
//! sizing and bbox buffering both use the same degrees-per-kilometer
//! constant on both axes, with no per-latitude longitude correction. This
//! preserves bit-compatibility with the existing analytics this crate
//! replaces; do not "fix" it to use a latitude-scaled longitude step.

use geo::{Distance, Haversine};

/// Degrees of latitude/longitude per kilometer at the equator, used for grid
/// sizing and bounding-box buffering throughout this crate.
pub const DEG_PER_KM: f64 = 0.009;

/// A geographic point: latitude and longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Point { lat, lon }
    }
}

/// An axis-aligned bounding box: `nw` (north-west corner) and `se`
/// (south-east corner), with `nw.lat >= se.lat` and `nw.lon <= se.lon`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub nw: Point,
    pub se: Point,
}

/// Great-circle distance between two points, in kilometers, via the `geo`
/// crate's haversine algorithm (`geo::Point::new` takes `(x, y)` i.e.
/// `(lon, lat)`, the opposite of this module's own `Point`; `Haversine`
/// returns meters).
pub fn haversine(a: Point, b: Point) -> f64 {
    let p1 = geo::Point::new(a.lon, a.lat);
    let p2 = geo::Point::new(b.lon, b.lat);
    Haversine::distance(p1, p2) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // One degree of latitude is ~111.19 km.
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 1.0);
        let d = haversine(a, b);
        assert!((d - 111.19).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_haversine_zero_distance() {
        let a = Point::new(12.3, 45.6);
        assert_eq!(haversine(a, a), 0.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Point::new(51.5074, -0.1278);
        let b = Point::new(48.8566, 2.3522);
        assert!((haversine(a, b) - haversine(b, a)).abs() < 1e-9);
    }
}
