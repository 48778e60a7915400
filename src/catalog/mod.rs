pub mod model;

pub use model::{Coordinates, ProbePoint};

use crate::error::MeasureError;

/// Catalog bundled into the binary, used when `CATALOG_FILE` is not set.
const DEFAULT_CATALOG: &str = include_str!("../../catalog.yml");

/// Read-only lookup table of probe points, keyed by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    points: Vec<ProbePoint>,
}

impl Catalog {
    /// Parse a catalog from a YAML sequence of probe points.
    pub fn from_yaml(yaml: &str) -> Result<Self, MeasureError> {
        let points: Vec<ProbePoint> = serde_yaml::from_str(yaml)?;
        Ok(Self { points })
    }

    /// Load the catalog from the file named by `CATALOG_FILE`, falling back
    /// to the built-in catalog when the variable is not set.
    pub async fn load() -> Result<Self, MeasureError> {
        match std::env::var("CATALOG_FILE") {
            Ok(path) => {
                let yaml = tokio::fs::read_to_string(&path).await?;
                Self::from_yaml(&yaml)
            }
            Err(_) => Self::from_yaml(DEFAULT_CATALOG),
        }
    }

    pub fn points(&self) -> &[ProbePoint] {
        &self.points
    }

    pub fn get(&self, id: &str) -> Option<&ProbePoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Resolve a set of ids to probe points, preserving catalog order.
    /// Unknown ids are skipped; each catalog entry is selected at most once.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Vec<ProbePoint> {
        self.points
            .iter()
            .filter(|p| ids.iter().any(|id| id.as_ref() == p.id))
            .cloned()
            .collect()
    }
}

/// Fetch the selectable probe points, degrading to an empty set on failure.
///
/// Catalog trouble is a recoverable, user-visible state: the caller simply
/// has nothing to select, and the run precondition rejects an empty set.
pub async fn fetch_probe_points() -> Vec<ProbePoint> {
    match Catalog::load().await {
        Ok(catalog) => catalog.points,
        Err(e) => {
            log::warn!("catalog unavailable, continuing with no probe points: {e}");
            Vec::new()
        }
    }
}
