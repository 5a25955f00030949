//! `.hst` decoding error types.

use crate::header::{HEADER_SIZE, MAGIC};
use thiserror::Error;

/// Result type for `.hst` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `.hst` decoding error types.
///
/// Everything except [`Error::Io`] is a format error: the file is not a
/// well-formed event file and no partial event set is produced.
#[derive(Error, Debug)]
pub enum Error {
    /// Magic number mismatch.
    #[error("invalid magic number {found:?} (expected {expected:?})", expected = MAGIC)]
    BadMagic {
        /// The five bytes found at offset 0.
        found: [u8; 5],
    },

    /// Fewer bytes than a full header.
    #[error("truncated header: need {needed} bytes, have {available}", needed = HEADER_SIZE)]
    TruncatedHeader {
        /// Bytes available.
        available: usize,
    },

    /// Data offset points inside the header.
    #[error("data offset {0} lies inside the {size} byte header", size = HEADER_SIZE)]
    DataOffsetInsideHeader(u16),

    /// Data offset points past the end of the file.
    #[error("data offset {offset} is past end of file ({len} bytes)")]
    DataOffsetPastEnd {
        /// Offset from the header.
        offset: u16,
        /// Total file length.
        len: usize,
    },

    /// Event payload ends in a partial record.
    #[error("event payload of {len} bytes is not a multiple of {record_size}")]
    TrailingBytes {
        /// Payload length in bytes.
        len: usize,
        /// Record size in bytes.
        record_size: usize,
    },

    /// An event record addresses a tube/pixel outside the carriage.
    #[error("event record {index}: {source}")]
    InvalidEvent {
        /// Record index in file order.
        index: usize,
        /// Geometry error.
        #[source]
        source: hstpix_core::Error,
    },

    /// Disabled-tube list too long for the 16-bit data offset.
    #[error("{0} disabled tubes do not fit before a 16-bit data offset")]
    TooManyDisabledTubes(usize),

    /// Event timestamp too large for the 6-byte record field.
    #[error("event record {index}: timestamp {ticks} does not fit in 6 bytes")]
    TickOverflow {
        /// Event index.
        index: usize,
        /// Offending tick count.
        ticks: u64,
    },

    /// Origin timestamp seconds too large for the 6-byte field.
    #[error("origin timestamp seconds {0} do not fit in 6 bytes")]
    OriginOverflow(u64),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means the input is not a well-formed event file.
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}
