use std::collections::BTreeMap;

use serde::Serialize;

use crate::probe::{ProbeOutcome, ProbeResult};

/// Arithmetic means over the successful outcomes of a run.
///
/// A field with no contributing samples averages to 0, never NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalStats {
    pub avg_response_time_ms: f64,
    pub avg_packet_loss_pct: f64,
    pub avg_download_mbps: f64,
    pub avg_upload_mbps: f64,
}

/// Per-region response time summary. Regions without a single successful
/// probe are omitted rather than zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub region: String,
    pub avg_response_time_ms: u64,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub global: GlobalStats,
    pub by_region: Vec<RegionSummary>,
}

/// Compute global and per-region statistics for a result collection.
///
/// Pure and order-independent: only `Success` outcomes contribute, and
/// `by_region` comes back sorted by region name.
pub fn summarize(results: &[ProbeResult]) -> Summary {
    let mut time_sum = 0.0;
    let mut loss_sum = 0.0;
    let mut download_sum = 0.0;
    let mut upload_sum = 0.0;
    let mut successes = 0usize;

    let mut regions: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for result in results {
        let ProbeOutcome::Success {
            response_time_ms,
            packet_loss_pct,
            download_mbps,
            upload_mbps,
            ..
        } = &result.outcome
        else {
            continue;
        };

        successes += 1;
        time_sum += response_time_ms;
        loss_sum += packet_loss_pct;
        download_sum += download_mbps;
        upload_sum += upload_mbps;

        let entry = regions.entry(result.point.region.as_str()).or_default();
        entry.0 += response_time_ms;
        entry.1 += 1;
    }

    let mean = |sum: f64| if successes == 0 { 0.0 } else { sum / successes as f64 };

    Summary {
        global: GlobalStats {
            avg_response_time_ms: mean(time_sum),
            avg_packet_loss_pct: mean(loss_sum),
            avg_download_mbps: mean(download_sum),
            avg_upload_mbps: mean(upload_sum),
        },
        by_region: regions
            .into_iter()
            .map(|(region, (sum, count))| RegionSummary {
                region: region.to_string(),
                avg_response_time_ms: (sum / count as f64).round() as u64,
                sample_count: count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Coordinates, ProbePoint};

    fn result(region: &str, outcome: ProbeOutcome) -> ProbeResult {
        ProbeResult::new(
            ProbePoint {
                id: format!("{region}-pt"),
                name: format!("{region} point"),
                url: "https://pt.example.com".to_string(),
                continent: "Test".to_string(),
                country: "Test".to_string(),
                region: region.to_string(),
                coordinates: Coordinates { lat: 0.0, lng: 0.0 },
            },
            outcome,
        )
    }

    fn success(ms: f64) -> ProbeOutcome {
        ProbeOutcome::Success {
            response_time_ms: ms,
            packet_loss_pct: 2.0,
            download_mbps: 400.0,
            upload_mbps: 100.0,
            cloudflare_detected: false,
            response_headers: None,
        }
    }

    #[test]
    fn empty_results_are_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.global, GlobalStats::default());
        assert!(summary.by_region.is_empty());
    }

    #[test]
    fn all_failures_are_all_zero() {
        let results = vec![
            result("West", ProbeOutcome::failure("timeout")),
            result("East", ProbeOutcome::failure("refused")),
        ];
        let summary = summarize(&results);
        assert_eq!(summary.global.avg_response_time_ms, 0.0);
        assert!(summary.by_region.is_empty());
    }

    #[test]
    fn failures_are_excluded_from_means() {
        let results = vec![
            result("West", success(50.0)),
            result("West", success(300.0)),
            result("East", ProbeOutcome::failure("timeout")),
        ];
        let summary = summarize(&results);
        assert_eq!(summary.global.avg_response_time_ms, 175.0);
        assert_eq!(summary.global.avg_packet_loss_pct, 2.0);
        assert_eq!(summary.global.avg_download_mbps, 400.0);
        assert_eq!(summary.global.avg_upload_mbps, 100.0);
    }

    #[test]
    fn region_means_are_rounded_and_counted() {
        let results = vec![
            result("West", success(100.0)),
            result("West", success(200.0)),
            result("West", success(300.0)),
        ];
        let summary = summarize(&results);
        assert_eq!(
            summary.by_region,
            vec![RegionSummary {
                region: "West".to_string(),
                avg_response_time_ms: 200,
                sample_count: 3,
            }]
        );
    }

    #[test]
    fn regions_come_back_sorted_regardless_of_arrival() {
        let results = vec![
            result("West", success(10.0)),
            result("East", success(20.0)),
            result("Central", success(30.0)),
        ];
        let summary = summarize(&results);
        let regions: Vec<&str> = summary.by_region.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["Central", "East", "West"]);
    }

    #[test]
    fn rounding_happens_at_the_region_mean() {
        let results = vec![result("West", success(100.0)), result("West", success(101.0))];
        let summary = summarize(&results);
        // 100.5 rounds away from zero.
        assert_eq!(summary.by_region[0].avg_response_time_ms, 101);
    }
}
