use serde::Serialize;

use crate::probe::ProbeOutcome;

/// Discrete severity bucket for a response time, used for display coloring.
///
/// Thresholds at 100/300/600 ms; a value exactly on a threshold belongs to
/// the higher bucket. Failed probes classify as `Unknown`, never `Good`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LatencyClass {
    Good,
    Ok,
    Warn,
    Bad,
    Unknown,
}

impl LatencyClass {
    pub fn classify(response_time_ms: f64) -> Self {
        if response_time_ms < 100.0 {
            LatencyClass::Good
        } else if response_time_ms < 300.0 {
            LatencyClass::Ok
        } else if response_time_ms < 600.0 {
            LatencyClass::Warn
        } else {
            LatencyClass::Bad
        }
    }

    pub fn from_outcome(outcome: &ProbeOutcome) -> Self {
        match outcome.response_time_ms() {
            Some(ms) => Self::classify(ms),
            None => LatencyClass::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LatencyClass::Good => "GOOD",
            LatencyClass::Ok => "OK",
            LatencyClass::Warn => "WARN",
            LatencyClass::Bad => "BAD",
            LatencyClass::Unknown => "UNKNOWN",
        }
    }
}
