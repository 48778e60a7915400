use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::probe::ProbeResult;

/// Streamed notification from a run in progress.
///
/// For each finishing probe the orchestrator emits `Progress` then `Result`,
/// exactly once per probe point, in arrival order. The counter carried by
/// `Progress` always equals the number of `Result` events delivered so far
/// including the one that follows it.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Progress { completed: usize, total: usize },
    Result(ProbeResult),
}

/// One user-initiated batch of probes across a selected set of probe points.
#[derive(Debug, Clone, Serialize)]
pub struct Run {
    pub target_url: String,
    pub selected: Vec<String>,
    /// Completed results, in arrival order (not selection order).
    pub results: Vec<ProbeResult>,
    pub started_at: DateTime<Utc>,
}

impl Run {
    pub(crate) fn new(target_url: String, selected: Vec<String>) -> Self {
        Self {
            target_url,
            selected,
            results: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// A run is terminal once every selected point has reported.
    pub fn is_complete(&self) -> bool {
        self.results.len() == self.selected.len()
    }
}
