use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ProbePoint;

/// What a single probe attempt produced: measured metrics or a failure reason.
///
/// Exactly one variant per attempt; a failed probe carries no metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Success {
        response_time_ms: f64,
        packet_loss_pct: f64,
        download_mbps: f64,
        upload_mbps: f64,
        cloudflare_detected: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response_headers: Option<BTreeMap<String, String>>,
    },
    Failure {
        reason: String,
    },
}

impl ProbeOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        ProbeOutcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }

    /// Response time in milliseconds, `None` for failed probes.
    pub fn response_time_ms(&self) -> Option<f64> {
        match self {
            ProbeOutcome::Success {
                response_time_ms, ..
            } => Some(*response_time_ms),
            ProbeOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ProbeOutcome::Failure { reason } => Some(reason),
            ProbeOutcome::Success { .. } => None,
        }
    }
}

/// One probe's outcome, tied to the point it ran from and when it finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub point: ProbePoint,
    pub outcome: ProbeOutcome,
    pub observed_at: DateTime<Utc>,
}

impl ProbeResult {
    pub fn new(point: ProbePoint, outcome: ProbeOutcome) -> Self {
        Self {
            point,
            outcome,
            observed_at: Utc::now(),
        }
    }
}
