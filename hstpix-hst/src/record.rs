//! Event record stream.
//!
//! Each record is 8 bytes: tube id (1), pixel (1), timestamp (6). The
//! records run from the header's data offset to end of file.

use crate::{Error, Result};
use hstpix_core::geometry::locate;
use hstpix_core::{truncate_le, zero_extend_le, EventBatch, EventRecord};

/// Bytes of timestamp in one record.
pub const TICK_BYTES: usize = 6;

/// Size of one event record in bytes.
pub const RECORD_SIZE: usize = 1 + 1 + TICK_BYTES;

/// Decodes a single 8-byte record.
///
/// The timestamp is widened to `u64` with two zero high-order bytes.
#[inline]
#[must_use]
pub fn decode_record(raw: [u8; RECORD_SIZE]) -> EventRecord {
    let [tube, pixel, t0, t1, t2, t3, t4, t5] = raw;
    EventRecord {
        tube,
        pixel,
        ticks: zero_extend_le([t0, t1, t2, t3, t4, t5]),
    }
}

/// Encodes a record into its 8-byte layout.
///
/// Timestamp bits above 48 are dropped; [`EventFile::from_parts`]
/// rejects such events before they can be written.
///
/// [`EventFile::from_parts`]: crate::EventFile::from_parts
#[inline]
#[must_use]
pub fn encode_record(event: &EventRecord) -> [u8; RECORD_SIZE] {
    let ticks: [u8; 6] = truncate_le(event.ticks);
    let mut out = [0u8; RECORD_SIZE];
    out[0] = event.tube;
    out[1] = event.pixel;
    out[2..].copy_from_slice(&ticks);
    out
}

/// Decodes the event payload that follows the data offset.
///
/// # Errors
/// Returns an error if the payload ends in a partial record or any record
/// addresses a tube/pixel outside the detector carriage.
pub fn decode_events(payload: &[u8]) -> Result<EventBatch> {
    if !payload.len().is_multiple_of(RECORD_SIZE) {
        return Err(Error::TrailingBytes {
            len: payload.len(),
            record_size: RECORD_SIZE,
        });
    }

    let mut batch = EventBatch::with_capacity(payload.len() / RECORD_SIZE);
    for (index, chunk) in payload.chunks_exact(RECORD_SIZE).enumerate() {
        let mut raw = [0u8; RECORD_SIZE];
        raw.copy_from_slice(chunk);
        let event = decode_record(raw);
        // Reject before the event can reach the dense count volume.
        locate(event.tube, event.pixel).map_err(|source| Error::InvalidEvent { index, source })?;
        batch.push(event);
    }

    Ok(batch)
}
