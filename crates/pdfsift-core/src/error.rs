//! Error types for the template store, region reads, and table output.

use std::path::PathBuf;

/// The template library could not be loaded. Fatal for a batch run.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The file could not be read.
    #[error("failed to read template library {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The content is not valid JSON.
    #[error("template library is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON root or a template entry has the wrong shape.
    #[error("invalid template library: {0}")]
    Shape(String),
}

/// A single region could not be evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegionError {
    /// The region geometry is missing or non-numeric.
    #[error("malformed region: {0}")]
    Malformed(String),
    /// The page could not supply text for the region.
    #[error("page access failed: {0}")]
    PageAccess(String),
}

/// Writing the output table failed.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
