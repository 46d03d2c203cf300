use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, InventoryError>;

/// Failure modes of a report run. Per-resource tagging failures reported by
/// the service are not errors; they are captured as rows in the report.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A listing or tagging call failed at the transport or service level.
    /// Not retried; aborts the remaining pagination for the current profile.
    #[error("{operation} failed: {message}")]
    RemoteApi { operation: String, message: String },

    /// Missing or unusable CLI input, detected before any API call.
    #[error("{0}")]
    Configuration(String),

    /// A requested tag did not have exactly one `=` separator. Aborts the
    /// whole run before any tagging call is issued.
    #[error("invalid tag '{0}': expected key=value")]
    MalformedTag(String),

    /// The report file could not be written. Logged by the caller; the run
    /// still completes for all profiles.
    #[error("could not write report to {}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl InventoryError {
    pub fn remote(operation: &str, err: impl std::fmt::Display) -> Self {
        Self::RemoteApi {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }
}
