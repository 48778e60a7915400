use thiserror::Error;

/// Errors surfaced to the caller of the measurement engine.
///
/// Probe-level failures are never represented here; they are data
/// (`ProbeOutcome::Failure`) and always count toward run progress.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// A run was requested with no probe points selected.
    #[error("no probe points selected")]
    EmptySelection,

    /// The target URL did not parse.
    #[error("invalid target url `{url}`: {source}")]
    InvalidTargetUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The cancellation token fired before every probe unit finished.
    #[error("measurement cancelled before completion")]
    Cancelled,

    /// The probe point catalog could not be read.
    #[error("failed to read probe point catalog")]
    CatalogIo(#[from] std::io::Error),

    /// The probe point catalog did not parse as YAML.
    #[error("invalid probe point catalog")]
    CatalogFormat(#[from] serde_yaml::Error),
}
