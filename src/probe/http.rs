use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::result::ProbeOutcome;
use super::Prober;
use crate::catalog::ProbePoint;

/// Probes a target with a real HTTP GET and measures the elapsed time.
///
/// Packet loss and upload throughput cannot be observed over a single GET
/// and are reported as zero; download throughput is derived from the body
/// size over the transfer time.
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .user_agent(concat!("probemap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &Url, point: &ProbePoint) -> ProbeOutcome {
        let start = Instant::now();
        let response = match self.client.get(target.clone()).send().await {
            Ok(resp) => resp,
            Err(e) => {
                log::debug!("probe from {} failed: {e}", point.id);
                return ProbeOutcome::failure(e.to_string());
            }
        };

        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let cloudflare_detected = headers
            .get("server")
            .is_some_and(|s| s.to_ascii_lowercase().contains("cloudflare"));

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return ProbeOutcome::failure(e.to_string()),
        };
        let elapsed = start.elapsed();

        let secs = elapsed.as_secs_f64();
        let download_mbps = if secs > 0.0 {
            (body.len() as f64 * 8.0) / 1_000_000.0 / secs
        } else {
            0.0
        };

        ProbeOutcome::Success {
            response_time_ms: secs * 1000.0,
            packet_loss_pct: 0.0,
            download_mbps,
            upload_mbps: 0.0,
            cloudflare_detected,
            response_headers: Some(headers),
        }
    }
}
