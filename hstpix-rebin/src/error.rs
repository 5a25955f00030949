//! Rebinning error types.

use thiserror::Error;

/// Result type for rebinning operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Rebinning error types.
///
/// A failed rebin leaves the event set untouched; the next call may use
/// different bins against the same events.
#[derive(Error, Debug)]
pub enum Error {
    /// No timestamp span to derive evenly spaced edges from.
    #[error("cannot derive {n_bins} time bins: {reason}")]
    Range {
        /// Requested number of bins.
        n_bins: usize,
        /// Why no span exists.
        reason: &'static str,
    },

    /// Explicit edges or step are unusable.
    #[error("invalid time bins: {0}")]
    InvalidEdges(String),

    /// Two volumes or results were built against different bins.
    #[error("cannot merge histograms with different time bins")]
    BinMismatch,

    /// Event outside the carriage reached the engine.
    #[error("event {index}: {source}")]
    InvalidEvent {
        /// Event index.
        index: usize,
        /// Geometry error.
        #[source]
        source: hstpix_core::Error,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] hstpix_core::Error),
}
