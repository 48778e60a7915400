use serde::{Deserialize, Serialize};

/// Geographic position of a probe point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A named location capable of being targeted for a measurement.
///
/// Probe points are immutable and sourced entirely from the catalog; the
/// orchestrator never invents or mutates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbePoint {
    pub id: String,
    pub name: String,
    pub url: String,
    pub continent: String,
    pub country: String,
    pub region: String,
    pub coordinates: Coordinates,
}
