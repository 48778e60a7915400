use chrono::{DateTime, SecondsFormat, Utc};

use crate::probe::{ProbeOutcome, ProbeResult};

/// Column names of the exported table, in contract order. Downstream
/// consumers of exported files depend on this exact header.
pub const CSV_COLUMNS: [&str; 9] = [
    "location",
    "region",
    "responseTime",
    "packetLoss",
    "download",
    "upload",
    "cloudflare",
    "timestamp",
    "error",
];

/// One flattened, display-formatted result row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub location: String,
    pub region: String,
    pub response_time: String,
    pub packet_loss: String,
    pub download: String,
    pub upload: String,
    pub cloudflare: String,
    pub timestamp: String,
    pub error: String,
}

impl ExportRow {
    fn values(&self) -> [&str; 9] {
        [
            self.location.as_str(),
            self.region.as_str(),
            self.response_time.as_str(),
            self.packet_loss.as_str(),
            self.download.as_str(),
            self.upload.as_str(),
            self.cloudflare.as_str(),
            self.timestamp.as_str(),
            self.error.as_str(),
        ]
    }
}

/// Flatten a result collection into export rows, preserving arrival order.
pub fn to_table(results: &[ProbeResult]) -> Vec<ExportRow> {
    results.iter().map(to_row).collect()
}

fn to_row(result: &ProbeResult) -> ExportRow {
    let timestamp = result
        .observed_at
        .to_rfc3339_opts(SecondsFormat::Millis, true);

    match &result.outcome {
        ProbeOutcome::Success {
            response_time_ms,
            packet_loss_pct,
            download_mbps,
            upload_mbps,
            cloudflare_detected,
            ..
        } => ExportRow {
            location: result.point.name.clone(),
            region: result.point.region.clone(),
            response_time: format!("{}ms", response_time_ms.round() as u64),
            packet_loss: format!("{packet_loss_pct:.2}%"),
            download: format!("{download_mbps:.2} Mbps"),
            upload: format!("{upload_mbps:.2} Mbps"),
            cloudflare: if *cloudflare_detected { "Yes" } else { "No" }.to_string(),
            timestamp,
            error: "None".to_string(),
        },
        ProbeOutcome::Failure { reason } => ExportRow {
            location: result.point.name.clone(),
            region: result.point.region.clone(),
            response_time: "Failed".to_string(),
            packet_loss: "N/A".to_string(),
            download: "N/A".to_string(),
            upload: "N/A".to_string(),
            cloudflare: "No".to_string(),
            timestamp,
            error: reason.clone(),
        },
    }
}

/// Render rows as delimited text: a header line, then one line per row with
/// every value double-quoted (embedded quotes doubled). An empty collection
/// yields the header line alone.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_COLUMNS.join(","));
    for row in rows {
        let quoted: Vec<String> = row
            .values()
            .iter()
            .map(|v| format!("\"{}\"", v.replace('"', "\"\"")))
            .collect();
        lines.push(quoted.join(","));
    }
    lines.join("\n")
}

/// Timestamped name for the downloadable artifact.
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!(
        "speedtest-results-{}.csv",
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Coordinates, ProbePoint};
    use chrono::TimeZone;

    fn result(name: &str, region: &str, outcome: ProbeOutcome) -> ProbeResult {
        ProbeResult {
            point: ProbePoint {
                id: name.to_lowercase().replace(' ', "-"),
                name: name.to_string(),
                url: "https://pt.example.com".to_string(),
                continent: "Test".to_string(),
                country: "Test".to_string(),
                region: region.to_string(),
                coordinates: Coordinates { lat: 0.0, lng: 0.0 },
            },
            outcome,
            observed_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn success(ms: f64) -> ProbeOutcome {
        ProbeOutcome::Success {
            response_time_ms: ms,
            packet_loss_pct: 1.5,
            download_mbps: 512.25,
            upload_mbps: 128.5,
            cloudflare_detected: true,
            response_headers: None,
        }
    }

    #[test]
    fn success_row_formats_every_field() {
        let rows = to_table(&[result("US East", "East Coast", success(50.0))]);
        let row = &rows[0];
        assert_eq!(row.location, "US East");
        assert_eq!(row.region, "East Coast");
        assert_eq!(row.response_time, "50ms");
        assert_eq!(row.packet_loss, "1.50%");
        assert_eq!(row.download, "512.25 Mbps");
        assert_eq!(row.upload, "128.50 Mbps");
        assert_eq!(row.cloudflare, "Yes");
        assert_eq!(row.timestamp, "2024-05-01T12:00:00.000Z");
        assert_eq!(row.error, "None");
    }

    #[test]
    fn failed_row_uses_placeholders() {
        let rows = to_table(&[result(
            "EU West",
            "West",
            ProbeOutcome::failure("Connection timed out"),
        )]);
        let row = &rows[0];
        assert_eq!(row.response_time, "Failed");
        assert_eq!(row.packet_loss, "N/A");
        assert_eq!(row.download, "N/A");
        assert_eq!(row.upload, "N/A");
        assert_eq!(row.cloudflare, "No");
        assert_eq!(row.error, "Connection timed out");
    }

    #[test]
    fn csv_has_header_plus_one_line_per_row() {
        let rows = to_table(&[
            result("A", "West", success(50.0)),
            result("B", "West", success(300.0)),
            result("C", "East", ProbeOutcome::failure("timeout")),
        ]);
        let csv = to_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "location,region,responseTime,packetLoss,download,upload,cloudflare,timestamp,error"
        );
        assert!(lines[1].starts_with("\"A\",\"West\",\"50ms\""));
        assert!(lines[3].contains("\"Failed\""));
        assert!(lines[3].ends_with("\"timeout\""));
    }

    #[test]
    fn every_csv_value_is_quoted() {
        let rows = to_table(&[result("A", "West", success(50.0))]);
        let csv = to_csv(&rows);
        let data_line = csv.lines().nth(1).unwrap();
        for field in data_line.split(',') {
            assert!(field.starts_with('"') && field.ends_with('"'), "{field}");
        }
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let rows = to_table(&[result(
            "A",
            "West",
            ProbeOutcome::failure("server said \"no\""),
        )]);
        let csv = to_csv(&rows);
        assert!(csv.contains("\"server said \"\"no\"\"\""));
    }

    #[test]
    fn empty_collection_exports_header_only() {
        let csv = to_csv(&to_table(&[]));
        assert_eq!(
            csv,
            "location,region,responseTime,packetLoss,download,upload,cloudflare,timestamp,error"
        );
    }

    #[test]
    fn filename_is_timestamped() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(
            export_filename(at),
            "speedtest-results-2024-05-01T12:00:00.000Z.csv"
        );
    }
}
