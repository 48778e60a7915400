use std::env;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;

use probemap::report::{export_filename, to_csv, to_table};
use probemap::{
    CancelToken, Catalog, HttpProber, LatencyClass, MeasureError, Orchestrator, ProbeOutcome,
    Prober, RunEvent, SimProber, summarize,
};

fn to_fixed_width(input: &str, width: usize) -> String {
    use unicode_truncate::UnicodeTruncateStr;

    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let target_url =
        env::var("TARGET_URL").unwrap_or_else(|_| "https://www.cloudflare.com".to_string());
    let selection = env::var("PROBE_POINTS").unwrap_or_else(|_| "all".to_string());
    let mode = env::var("PROBE_MODE").unwrap_or_else(|_| "sim".to_string());
    let export_dir = env::var("EXPORT_DIR").unwrap_or_else(|_| ".".to_string());

    let catalog = match Catalog::load().await {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("cannot load probe point catalog: {e}");
            std::process::exit(1);
        }
    };

    let ids: Vec<String> = if selection == "all" {
        catalog.points().iter().map(|p| p.id.clone()).collect()
    } else {
        selection.split(',').map(|s| s.trim().to_string()).collect()
    };

    let prober: Arc<dyn Prober> = match mode.as_str() {
        "http" => Arc::new(HttpProber::new().expect("Failed to create HTTP client")),
        _ => match env::var("PROBE_SEED").ok().and_then(|s| s.parse().ok()) {
            Some(seed) => Arc::new(SimProber::seeded(seed)),
            None => Arc::new(SimProber::new()),
        },
    };

    let max_name_width = catalog
        .points()
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(10);

    println!("Measuring {target_url} from {} probe points", ids.len());

    let cancel = CancelToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_signal.cancel();
        }
    });

    let (tx, mut rx) = mpsc::unbounded_channel::<RunEvent>();
    let printer = tokio::spawn(async move {
        let mut progress = (0usize, 0usize);
        while let Some(event) = rx.recv().await {
            match event {
                RunEvent::Progress { completed, total } => progress = (completed, total),
                RunEvent::Result(result) => {
                    let name = to_fixed_width(&result.point.name, max_name_width);
                    let class = LatencyClass::from_outcome(&result.outcome).label();
                    match &result.outcome {
                        ProbeOutcome::Success {
                            response_time_ms,
                            download_mbps,
                            ..
                        } => println!(
                            "[{}/{}] ✅ {name}  {class:<7} {response_time_ms:.0}ms, {download_mbps:.2} Mbps down",
                            progress.0, progress.1
                        ),
                        ProbeOutcome::Failure { reason } => println!(
                            "[{}/{}] ❌ {name}  {class:<7} {reason}",
                            progress.0, progress.1
                        ),
                    }
                }
            }
        }
    });

    let orchestrator = Orchestrator::new(prober);
    let run = match orchestrator
        .run_from_catalog(&target_url, &catalog, &ids, tx, cancel)
        .await
    {
        Ok(run) => run,
        Err(MeasureError::Cancelled) => {
            let _ = printer.await;
            println!("Measurement cancelled");
            return;
        }
        Err(e) => {
            log::error!("measurement rejected: {e}");
            std::process::exit(1);
        }
    };
    let _ = printer.await;

    let summary = summarize(&run.results);
    println!();
    println!(
        "Average: {:.0}ms response, {:.2}% loss, {:.2} Mbps down, {:.2} Mbps up",
        summary.global.avg_response_time_ms,
        summary.global.avg_packet_loss_pct,
        summary.global.avg_download_mbps,
        summary.global.avg_upload_mbps,
    );
    for region in &summary.by_region {
        println!(
            "  {}: {}ms avg over {} sample(s)",
            region.region, region.avg_response_time_ms, region.sample_count
        );
    }

    let csv = to_csv(&to_table(&run.results));
    let path = std::path::Path::new(&export_dir).join(export_filename(Utc::now()));
    match tokio::fs::write(&path, csv).await {
        Ok(()) => println!("Exported results to {}", path.display()),
        Err(e) => log::error!("failed to write {}: {e}", path.display()),
    }
}
