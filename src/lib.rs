//! # trajectory-analytics
//!
//! Fleet GPS trajectory analytics: distance travelled, tolerant loop
//! counting against a reference route, speeding intervals, stop-zone dwell
//! violations, and GPS liveness coverage.
//!
//! This crate is the pure, synchronous core described in its design
//! document: given parsed GPS samples and a handful of parameters, it
//! computes all five analytics with no I/O, no shared state, and no
//! dependency on how the traces were fetched or where the results end up.
//! HTTP, persistence, and auth are the caller's concern.
//!
//! ## Quick start
//!
//! ```rust
//! use trajectory_analytics::{analyze, AnalyzeInputs, Parameters};
//!
//! let vehicle_samples = vec![]; // parsed via `sample::parse_gpx`
//! let route_samples = vec![];
//! let params = Parameters::default();
//!
//! let inputs = AnalyzeInputs {
//!     vehicle_samples: &vehicle_samples,
//!     route_samples: &route_samples,
//!     stop_zones: &[],
//!     params: &params,
//! };
//!
//! let report = analyze(&inputs).unwrap();
//! println!("distance: {} km", report.distance_km_str);
//! ```
//!
//! ## Features
//!
//! - **`parallel`** — batch independent traces across cores with
//!   [`analyze_many`] (rayon).
//! - **`cli`** — build the `trajectory-analytics` binary front-end.

// Unified error handling
pub mod error;
pub use error::{AnalysisError, OptionExt, Result};

// Geographic primitives (C1)
pub mod geo;

// Sample stream: GPX/waypoint/CSV parsing (C2)
pub mod sample;

// Grid builder (C3)
pub mod grid;

// Path encoder (C4)
pub mod path;

// Distance calculator (C5)
pub mod distance;

// Speed analyzer (C6)
pub mod speed;

// Stop analyzer (C7)
pub mod stop;

// Liveness analyzer (C8)
pub mod liveness;

// Loop counter (C9) — the tolerant sequence matcher, see loops module docs.
pub mod loops;

// Analysis parameters and validation
pub mod params;

// Orchestration contract: runs every analyzer and aggregates the report.
pub mod analyze;
pub use analyze::{analyze, AnalyzeInputs, AnalyzeReport};
#[cfg(feature = "parallel")]
pub use analyze::analyze_many;
pub use params::Parameters;

// Algorithm toolbox — modular access to all algorithms.
// Use trajectory_analytics::algorithms::{...} for standalone algorithm access.
pub mod algorithms;
