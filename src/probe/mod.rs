pub mod http;
pub mod result;
pub mod sim;

pub use http::HttpProber;
pub use result::{ProbeOutcome, ProbeResult};
pub use sim::SimProber;

use async_trait::async_trait;
use url::Url;

use crate::catalog::ProbePoint;

/// The single seam between the orchestrator and whatever actually measures.
///
/// A prober always settles to a `ProbeOutcome`: timeouts, connection errors
/// and the like are reported as `ProbeOutcome::Failure`, never as a panic or
/// an `Err`. The prober owns its own resource lifecycle (clients, sockets)
/// and its own timeout policy.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &Url, point: &ProbePoint) -> ProbeOutcome;
}
