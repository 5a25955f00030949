//! hstpix-hst: VSANS `.hst` event file decoder.
//!
//! An event file is a fixed 26-byte header, a list of disabled tube ids,
//! and a run of 8-byte event records to end of file. Decoding is eager:
//! [`EventFile::from_bytes`] validates the whole file and returns the
//! events in columnar form, or fails without a partial result.
//!
//! # Key Components
//!
//! - [`FileHeader`] - Header fields, including the packed origin timestamp
//! - [`decode_events`] - Record stream decoder with tube/pixel bounds checks
//! - [`EventFile`] - Immutable decoded event set

mod error;
mod file;
pub mod header;
pub mod record;

pub use error::{Error, Result};
pub use file::EventFile;
pub use header::{CarriageGroup, FileHeader, OriginTimestamp, HEADER_SIZE, MAGIC};
pub use record::{decode_events, decode_record, encode_record, RECORD_SIZE, TICK_BYTES};

// Re-export core types for convenience
pub use hstpix_core::{EventBatch, EventRecord};
