use std::path::PathBuf;

/// Result type for loading timeline content.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Failures that can happen while fetching raw records or configuration.
///
/// The timeline core itself never fails; these only cover the I/O boundary.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of records, found {0}")]
    NotAnArray(&'static str),

    #[error("content fetch panicked")]
    FetchPanicked,
}
