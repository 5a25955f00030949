//! Error types for hstpix-core.

use thiserror::Error;

/// Result type alias for hstpix operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for hstpix operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Tube id outside the detector carriage.
    #[error("tube id {0} outside detector range [0, {max})", max = crate::N_TUBES)]
    InvalidTube(u8),

    /// Pixel outside the tube length.
    #[error("pixel {0} outside tube range [0, {max})", max = crate::N_PIXELS)]
    InvalidPixel(u8),

    /// Unknown panel name or key.
    #[error("unknown detector panel: {0}")]
    UnknownPanel(String),
}
