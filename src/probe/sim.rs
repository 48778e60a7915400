use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::sleep;
use url::Url;

use super::result::ProbeOutcome;
use super::Prober;
use crate::catalog::ProbePoint;

/// Simulated probe capability: random delay, a small failure rate, and
/// synthetic metrics, all drawn from one injectable seedable generator so
/// a seeded run is reproducible.
pub struct SimProber {
    rng: Mutex<StdRng>,
    delay_ms: Range<u64>,
    failure_rate: f64,
}

impl SimProber {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            delay_ms: 50..3050,
            failure_rate: 0.05,
        }
    }

    /// Override the simulated round-trip delay range; tests shrink it so a
    /// full run finishes in milliseconds.
    pub fn with_delay_ms(mut self, delay_ms: Range<u64>) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

impl Default for SimProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for SimProber {
    async fn probe(&self, _target: &Url, _point: &ProbePoint) -> ProbeOutcome {
        // All draws happen up front: the lock must not be held across the
        // sleep, and the delay itself is part of the seeded sequence.
        let (delay_ms, outcome) = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            let delay_ms = rng.gen_range(self.delay_ms.clone());
            if rng.gen_bool(self.failure_rate) {
                (delay_ms, ProbeOutcome::failure("Connection timed out"))
            } else {
                let cloudflare_detected = rng.gen_bool(0.7);
                let outcome = ProbeOutcome::Success {
                    response_time_ms: delay_ms as f64,
                    packet_loss_pct: rng.gen_range(0.0..5.0),
                    download_mbps: rng.gen_range(0.0..1000.0),
                    upload_mbps: rng.gen_range(0.0..1000.0),
                    cloudflare_detected,
                    response_headers: Some(synthetic_headers(cloudflare_detected)),
                };
                (delay_ms, outcome)
            }
        };

        sleep(Duration::from_millis(delay_ms)).await;
        outcome
    }
}

fn synthetic_headers(cloudflare: bool) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("content-type".to_string(), "text/html".to_string()),
        (
            "server".to_string(),
            if cloudflare { "cloudflare" } else { "nginx" }.to_string(),
        ),
        ("date".to_string(), Utc::now().to_rfc2822()),
    ])
}
