use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

use super::cancel::CancelToken;
use super::event::{Run, RunEvent};
use crate::catalog::{Catalog, ProbePoint};
use crate::error::MeasureError;
use crate::probe::{ProbeOutcome, ProbeResult, Prober};

/// Fans out one concurrent probe per selected point and joins all outcomes.
pub struct Orchestrator {
    prober: Arc<dyn Prober>,
}

impl Orchestrator {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    /// Resolve probe point ids against the catalog and run the measurement.
    ///
    /// Unknown ids are ignored; an id set that selects nothing is rejected
    /// the same way an empty selection is.
    pub async fn run_from_catalog<S: AsRef<str>>(
        &self,
        target_url: &str,
        catalog: &Catalog,
        ids: &[S],
        events: mpsc::UnboundedSender<RunEvent>,
        cancel: CancelToken,
    ) -> Result<Run, MeasureError> {
        let points = catalog.select(ids);
        self.run_measurement(target_url, points, events, cancel)
            .await
    }

    /// Run one measurement batch: one concurrent probe unit per point, no
    /// concurrency cap, joined only once every unit has finished.
    ///
    /// For each finishing unit, in arrival order, the run appends the result
    /// and emits `Progress` then `Result` — a single serialized step, so an
    /// observer can never see a counter inconsistent with the results
    /// delivered so far. A probe failure is data in the result collection;
    /// an unexpected panic inside a probe unit is converted to
    /// `Failure { reason: "network error" }` and cannot abort the run.
    ///
    /// Cancelling the token stops outstanding units at their next await
    /// point and resolves the call with `Err(Cancelled)`; the partial run is
    /// discarded.
    pub async fn run_measurement(
        &self,
        target_url: &str,
        points: Vec<ProbePoint>,
        events: mpsc::UnboundedSender<RunEvent>,
        cancel: CancelToken,
    ) -> Result<Run, MeasureError> {
        let target = Url::parse(target_url).map_err(|source| MeasureError::InvalidTargetUrl {
            url: target_url.to_string(),
            source,
        })?;

        let mut seen = Vec::with_capacity(points.len());
        let points: Vec<ProbePoint> = points
            .into_iter()
            .filter(|p| {
                if seen.contains(&p.id) {
                    false
                } else {
                    seen.push(p.id.clone());
                    true
                }
            })
            .collect();

        if points.is_empty() {
            return Err(MeasureError::EmptySelection);
        }

        let total = points.len();
        let mut run = Run::new(
            target.to_string(),
            points.iter().map(|p| p.id.clone()).collect(),
        );
        log::info!("starting run against {target}: {total} probe points");

        let (tx, mut rx) = mpsc::unbounded_channel::<ProbeResult>();
        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(total);

        for point in points {
            let prober = Arc::clone(&self.prober);
            let target = target.clone();
            let tx = tx.clone();
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                // The probe call runs in its own task so a panic surfaces
                // here as a JoinError instead of taking the unit down.
                let mut inner = {
                    let prober = Arc::clone(&prober);
                    let target = target.clone();
                    let point = point.clone();
                    tokio::spawn(async move { prober.probe(&target, &point).await })
                };

                let outcome = tokio::select! {
                    _ = cancel.cancelled() => {
                        inner.abort();
                        return;
                    }
                    joined = &mut inner => match joined {
                        Ok(outcome) => outcome,
                        Err(_) => ProbeOutcome::failure("network error"),
                    },
                };

                let _ = tx.send(ProbeResult::new(point, outcome));
            }));
        }
        drop(tx);

        while run.results.len() < total {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::info!("run against {target} cancelled with {}/{total} results", run.results.len());
                    for handle in &handles {
                        handle.abort();
                    }
                    for handle in handles {
                        let _ = handle.await;
                    }
                    return Err(MeasureError::Cancelled);
                }
                received = rx.recv() => match received {
                    Some(result) => {
                        run.results.push(result.clone());
                        let _ = events.send(RunEvent::Progress {
                            completed: run.results.len(),
                            total,
                        });
                        let _ = events.send(RunEvent::Result(result));
                    }
                    // Every sender finished; with an uncancelled token this
                    // only happens once all results are in.
                    None => break,
                },
            }
        }

        for handle in handles {
            let _ = handle.await;
        }

        log::info!("run against {target} complete: {}/{total} results", run.results.len());
        Ok(run)
    }
}
