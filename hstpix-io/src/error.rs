//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be decoded.
    #[error("cannot decode {path}: {source}")]
    Decode {
        /// Offending file.
        path: std::path::PathBuf,
        /// Decoder error.
        #[source]
        source: hstpix_hst::Error,
    },

    /// Output naming or layout error.
    #[error("invalid output: {0}")]
    InvalidOutput(String),

    /// Rebinning error.
    #[error("rebin error: {0}")]
    Rebin(#[from] hstpix_rebin::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
