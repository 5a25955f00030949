//! Decoded `.hst` event file.

use crate::header::{FileHeader, OriginTimestamp, HEADER_SIZE};
use crate::record::{decode_events, encode_record, RECORD_SIZE, TICK_BYTES};
use crate::{Error, Result};
use hstpix_core::packed::fits_in;
use hstpix_core::{ticks_to_seconds, EventBatch, EventRecord};
use std::io::{Read, Write};

/// A fully decoded event file.
///
/// Decoding is eager and all-or-nothing: either every record is valid and
/// the whole file is held in memory, or construction fails. The result is
/// never mutated, so any number of rebinning passes can share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFile {
    header: FileHeader,
    disabled_tubes: Vec<u8>,
    events: EventBatch,
}

impl EventFile {
    /// Decodes a complete event file held in memory.
    ///
    /// # Errors
    /// Returns a format error for a bad header, a data offset past the end
    /// of the input, a partial trailing record, or an out-of-range record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = FileHeader::parse(bytes)?;
        let data_offset = usize::from(header.data_offset);
        if data_offset > bytes.len() {
            return Err(Error::DataOffsetPastEnd {
                offset: header.data_offset,
                len: bytes.len(),
            });
        }

        let disabled_tubes = bytes[HEADER_SIZE..data_offset].to_vec();
        let events = decode_events(&bytes[data_offset..])?;

        log::debug!(
            "decoded {} events from {} carriage ({} disabled tubes, revision {})",
            events.len(),
            header.detector_carriage_group,
            disabled_tubes.len(),
            header.revision
        );
        if !events.is_time_ordered() {
            log::warn!("event timestamps are not monotonically non-decreasing");
        }

        Ok(Self {
            header,
            disabled_tubes,
            events,
        })
    }

    /// Reads a source to the end and decodes it.
    ///
    /// # Errors
    /// Returns an I/O error if reading fails, otherwise as [`Self::from_bytes`].
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Builds an event file from parts.
    ///
    /// The header's data offset is recomputed from the disabled-tube list.
    ///
    /// # Errors
    /// Returns an error if the disabled-tube list does not fit the 16-bit
    /// data offset, any event is outside the carriage, or any timestamp
    /// needs more than the 6 bytes a record stores.
    pub fn from_parts(
        mut header: FileHeader,
        disabled_tubes: Vec<u8>,
        events: EventBatch,
    ) -> Result<Self> {
        header.data_offset = u16::try_from(HEADER_SIZE + disabled_tubes.len())
            .map_err(|_| Error::TooManyDisabledTubes(disabled_tubes.len()))?;
        for (index, event) in events.iter().enumerate() {
            hstpix_core::geometry::locate(event.tube, event.pixel)
                .map_err(|source| Error::InvalidEvent { index, source })?;
            if !fits_in(event.ticks, TICK_BYTES) {
                return Err(Error::TickOverflow {
                    index,
                    ticks: event.ticks,
                });
            }
        }
        Ok(Self {
            header,
            disabled_tubes,
            events,
        })
    }

    /// Writes the file in `.hst` layout.
    ///
    /// # Errors
    /// Returns an error if writing fails or the header cannot be encoded.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.header.to_bytes()?)?;
        writer.write_all(&self.disabled_tubes)?;
        for event in self.events.iter() {
            writer.write_all(&encode_record(&event))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Serialises the file to a byte vector.
    ///
    /// # Errors
    /// Returns an error if the header cannot be encoded.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Size of the file in `.hst` layout.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        usize::from(self.header.data_offset) + self.events.len() * RECORD_SIZE
    }

    /// The decoded header.
    #[must_use]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Wall-clock origin of tick zero.
    #[must_use]
    pub fn origin_timestamp(&self) -> OriginTimestamp {
        self.header.origin_timestamp
    }

    /// Tube ids flagged as disabled in the file.
    ///
    /// Informational: events from these tubes are kept.
    #[must_use]
    pub fn disabled_tubes(&self) -> &[u8] {
        &self.disabled_tubes
    }

    /// Whether `tube` appears in the disabled-tube list.
    #[must_use]
    pub fn is_tube_disabled(&self, tube: u8) -> bool {
        self.disabled_tubes.contains(&tube)
    }

    /// All events in file order.
    #[must_use]
    pub fn events(&self) -> &EventBatch {
        &self.events
    }

    /// Iterates over the events in file order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = EventRecord> + '_ {
        self.events.iter()
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the file holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Smallest and largest timestamp in ticks.
    #[must_use]
    pub fn tick_range(&self) -> Option<(u64, u64)> {
        self.events.tick_range()
    }

    /// Span between first and last timestamp in seconds.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        self.tick_range()
            .map_or(0.0, |(min, max)| ticks_to_seconds((max - min) as f64))
    }
}

impl AsRef<EventBatch> for EventFile {
    fn as_ref(&self) -> &EventBatch {
        &self.events
    }
}
