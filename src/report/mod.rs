pub mod aggregate;
pub mod classify;
pub mod export;

pub use aggregate::{summarize, GlobalStats, RegionSummary, Summary};
pub use classify::LatencyClass;
pub use export::{export_filename, to_csv, to_table, ExportRow, CSV_COLUMNS};
