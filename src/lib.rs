//! Probemap measures how a target URL is reachable from a set of
//! geographically distributed probe points.
//!
//! The engine fans out one concurrent probe per selected point, streams
//! progress and per-point results as they arrive, joins every outcome into
//! a run, and offers aggregation, latency classification and CSV export on
//! top of the collected results. The actual measurement lives behind the
//! [`probe::Prober`] trait; [`probe::HttpProber`] issues real requests and
//! [`probe::SimProber`] is a seedable simulator.

pub mod catalog;
pub mod error;
pub mod orchestrator;
pub mod probe;
pub mod report;

pub use catalog::{fetch_probe_points, Catalog, ProbePoint};
pub use error::MeasureError;
pub use orchestrator::{CancelToken, Orchestrator, Run, RunEvent};
pub use probe::{HttpProber, ProbeOutcome, ProbeResult, Prober, SimProber};
pub use report::{summarize, LatencyClass, Summary};
