//! `.hst` file header.
//!
//! Layout (little-endian, 26 bytes):
//!
//! | offset | width | field                     |
//! |--------|-------|---------------------------|
//! | 0      | 5     | magic number              |
//! | 5      | 2     | revision                  |
//! | 7      | 2     | data offset               |
//! | 9      | 10    | origin timestamp (ns, s)  |
//! | 19     | 1     | detector carriage group   |
//! | 20     | 2     | HV reading                |
//! | 22     | 4     | timestamp frequency       |

use crate::{Error, Result};
use hstpix_core::packed::fits_in;
use hstpix_core::{truncate_le, zero_extend_le};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 5 + 2 + 2 + 10 + 1 + 2 + 4;

/// Magic number at offset 0 of every event file.
pub const MAGIC: [u8; 5] = *b"MESON";

/// Wall-clock origin of the event timestamps.
///
/// Stored as 4 bytes of nanoseconds followed by 6 bytes of seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OriginTimestamp {
    /// Whole seconds (48 significant bits).
    pub seconds: u64,
    /// Nanoseconds within the second.
    pub nanoseconds: u32,
}

impl OriginTimestamp {
    /// Width of the packed field in bytes.
    pub const SIZE: usize = 10;

    /// Creates a new origin timestamp.
    #[must_use]
    pub fn new(seconds: u64, nanoseconds: u32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Unpacks the 10-byte field.
    #[must_use]
    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        let [n0, n1, n2, n3, s0, s1, s2, s3, s4, s5] = bytes;
        Self {
            nanoseconds: zero_extend_le([n0, n1, n2, n3]),
            seconds: zero_extend_le([s0, s1, s2, s3, s4, s5]),
        }
    }

    /// Packs into the 10-byte field.
    ///
    /// # Errors
    /// Returns [`Error::OriginOverflow`] if `seconds` needs more than 6 bytes.
    pub fn to_bytes(&self) -> Result<[u8; Self::SIZE]> {
        if !fits_in(self.seconds, 6) {
            return Err(Error::OriginOverflow(self.seconds));
        }
        let ns: [u8; 4] = truncate_le(self.nanoseconds);
        let s: [u8; 6] = truncate_le(self.seconds);
        let mut out = [0u8; Self::SIZE];
        out[..4].copy_from_slice(&ns);
        out[4..].copy_from_slice(&s);
        Ok(out)
    }

    /// Origin as fractional seconds.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds as f64 + f64::from(self.nanoseconds) * 1e-9
    }
}

/// Which detector carriage wrote the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarriageGroup {
    /// Front carriage (`F`).
    Front,
    /// Middle carriage (`M`).
    Middle,
    /// Any other tag byte, preserved as-is.
    Other(u8),
}

impl CarriageGroup {
    /// Interprets the header tag byte.
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'F' => CarriageGroup::Front,
            b'M' => CarriageGroup::Middle,
            other => CarriageGroup::Other(other),
        }
    }

    /// The header tag byte.
    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            CarriageGroup::Front => b'F',
            CarriageGroup::Middle => b'M',
            CarriageGroup::Other(byte) => byte,
        }
    }

    /// Single-letter key used by the data container (`detector_FR`, ...).
    #[must_use]
    pub fn key(self) -> char {
        char::from(self.as_byte()).to_ascii_uppercase()
    }
}

impl fmt::Display for CarriageGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarriageGroup::Front => f.write_str("front"),
            CarriageGroup::Middle => f.write_str("middle"),
            CarriageGroup::Other(byte) => write!(f, "other({:?})", char::from(*byte)),
        }
    }
}

/// Decoded `.hst` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    /// Format tag, always [`MAGIC`] once parsed.
    pub magic_number: [u8; 5],
    /// Format revision.
    pub revision: u16,
    /// Byte offset of the first event record.
    pub data_offset: u16,
    /// Wall-clock origin of tick zero.
    pub origin_timestamp: OriginTimestamp,
    /// Carriage that wrote the file.
    pub detector_carriage_group: CarriageGroup,
    /// High-voltage reading (informational).
    pub hv_reading: u16,
    /// Reported timestamp clock frequency (informational).
    pub timestamp_frequency: u32,
}

/// Copies `N` bytes starting at `*pos` and advances the cursor.
///
/// Callers check the slice length up front.
fn take<const N: usize>(bytes: &[u8], pos: &mut usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[*pos..*pos + N]);
    *pos += N;
    out
}

impl FileHeader {
    /// Parses the header from the first [`HEADER_SIZE`] bytes of `bytes`.
    ///
    /// # Errors
    /// Returns an error if the input is too short, the magic number does not
    /// match, or the data offset points inside the header.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::TruncatedHeader {
                available: bytes.len(),
            });
        }

        let mut pos = 0;
        let magic_number: [u8; 5] = take(bytes, &mut pos);
        if magic_number != MAGIC {
            return Err(Error::BadMagic {
                found: magic_number,
            });
        }
        let revision: u16 = zero_extend_le(take::<2>(bytes, &mut pos));
        let data_offset: u16 = zero_extend_le(take::<2>(bytes, &mut pos));
        let origin_timestamp = OriginTimestamp::from_bytes(take(bytes, &mut pos));
        let [carriage] = take::<1>(bytes, &mut pos);
        let hv_reading: u16 = zero_extend_le(take::<2>(bytes, &mut pos));
        let timestamp_frequency: u32 = zero_extend_le(take::<4>(bytes, &mut pos));
        debug_assert_eq!(pos, HEADER_SIZE);

        if usize::from(data_offset) < HEADER_SIZE {
            return Err(Error::DataOffsetInsideHeader(data_offset));
        }

        let detector_carriage_group = CarriageGroup::from_byte(carriage);
        if let CarriageGroup::Other(byte) = detector_carriage_group {
            log::warn!("unrecognised detector carriage tag {:?}", char::from(byte));
        }

        Ok(Self {
            magic_number,
            revision,
            data_offset,
            origin_timestamp,
            detector_carriage_group,
            hv_reading,
            timestamp_frequency,
        })
    }

    /// Serialises the header back to its 26-byte layout.
    ///
    /// # Errors
    /// Returns an error if the origin timestamp does not fit its field.
    pub fn to_bytes(&self) -> Result<[u8; HEADER_SIZE]> {
        let mut out = [0u8; HEADER_SIZE];
        out[0..5].copy_from_slice(&self.magic_number);
        out[5..7].copy_from_slice(&self.revision.to_le_bytes());
        out[7..9].copy_from_slice(&self.data_offset.to_le_bytes());
        out[9..19].copy_from_slice(&self.origin_timestamp.to_bytes()?);
        out[19] = self.detector_carriage_group.as_byte();
        out[20..22].copy_from_slice(&self.hv_reading.to_le_bytes());
        out[22..26].copy_from_slice(&self.timestamp_frequency.to_le_bytes());
        Ok(out)
    }

    /// Number of disabled-tube bytes between the header and the events.
    #[must_use]
    pub fn disabled_tube_count(&self) -> usize {
        usize::from(self.data_offset).saturating_sub(HEADER_SIZE)
    }
}

impl Default for FileHeader {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            magic_number: MAGIC,
            revision: 0,
            data_offset: HEADER_SIZE as u16,
            origin_timestamp: OriginTimestamp::default(),
            detector_carriage_group: CarriageGroup::Front,
            hv_reading: 0,
            timestamp_frequency: 10_000_000,
        }
    }
}
