//! Distance calculator (C5): sums pairwise haversine distance over a
//! sample stream.
//!
//! Grounded on the original `compute_distance_travelled`, including its
//! two-decimal string display contract (`'%.2f' % distance`).

use crate::geo::{haversine, Point};
use crate::sample::Sample;

/// Sum of haversine distance between every adjacent pair of samples, in
/// kilometers.
pub fn compute_distance_km(samples: &[Sample]) -> f64 {
    samples
        .windows(2)
        .map(|pair| {
            let a = Point::new(pair[0].lat, pair[0].lon);
            let b = Point::new(pair[1].lat, pair[1].lon);
            haversine(a, b)
        })
        .sum()
}

/// Total distance, formatted to two decimal places (the report's display
/// contract).
pub fn compute_distance_km_str(samples: &[Sample]) -> String {
    format!("{:.2}", compute_distance_km(samples))
}
