//! # Algorithm Toolbox
//!
//! Direct access to every analyzer in this crate, for callers embedding a
//! single algorithm (e.g. just the loop counter) without going through
//! [`crate::analyze::analyze`].
//!
//! ## Geographic Utilities
//!
//! - **Haversine distance**: great-circle distance between GPS points
//! - **Grid building**: bounding-box expansion + cell tessellation
//! - **Path encoding**: sample stream to compressed cell-index sequence
//!
//! ## Analyzers
//!
//! - **Distance**: total haversine distance along a stream
//! - **Speed**: sustained-threshold interval detection
//! - **Stop**: zone dwell-time violations
//! - **Liveness**: gap-bounded segment coverage
//! - **Loop counter**: tolerant route-completion counting
//!
//! # Example
//!
//! ```rust
//! use trajectory_analytics::algorithms::{haversine, Point};
//!
//! let depot = Point::new(51.5074, -0.1278);
//! let stop = Point::new(48.8566, 2.3522);
//! let distance_km = haversine(depot, stop);
//! println!("depot to stop: {:.0} km", distance_km);
//! ```

// =============================================================================
// Geographic primitives
// =============================================================================

pub use crate::geo::{haversine, BBox, Point, DEG_PER_KM};

// =============================================================================
// Sample stream
// =============================================================================

pub use crate::sample::{parse_gpx, parse_stop_csv, parse_waypoints, Sample};

// =============================================================================
// Grid builder and path encoder
// =============================================================================

pub use crate::grid::{build_grid, Cell, Grid};
pub use crate::path::{encode_path, CellPath};

// =============================================================================
// Analyzers
// =============================================================================

pub use crate::distance::{compute_distance_km, compute_distance_km_str};
pub use crate::liveness::{analyze_liveness, LivenessReport, LivenessSegment};
pub use crate::loops::{count_loops, LoopResult};
pub use crate::speed::{analyze_speed, SpeedMode, SpeedViolation};
pub use crate::stop::{
    analyze_stops, zones_from_points, StopViolation, StopViolationKind, StopZone,
};

// =============================================================================
// Parameters and orchestration
// =============================================================================

#[cfg(feature = "parallel")]
pub use crate::analyze::analyze_many;
pub use crate::analyze::{analyze, AnalyzeInputs, AnalyzeReport};
pub use crate::params::Parameters;
