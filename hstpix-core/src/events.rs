//! Event storage.
//!
//! Decoded events are stored column-wise in an [`EventBatch`], the same
//! `SoA` layout the histogram passes iterate over.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single decoded detector event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventRecord {
    /// Detector tube id.
    pub tube: u8,
    /// Position along the tube.
    pub pixel: u8,
    /// Timestamp in 100 ns ticks.
    pub ticks: u64,
}

impl EventRecord {
    /// Creates a new event record.
    #[inline]
    #[must_use]
    pub fn new(tube: u8, pixel: u8, ticks: u64) -> Self {
        Self { tube, pixel, ticks }
    }
}

/// A batch of events stored in Structure of Arrays (`SoA`) format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventBatch {
    /// Columnar storage for tube ids.
    pub tube: Vec<u8>,
    /// Columnar storage for pixels.
    pub pixel: Vec<u8>,
    /// Columnar storage for timestamps (ticks).
    pub ticks: Vec<u64>,
}

impl EventBatch {
    /// Creates a new empty batch with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tube: Vec::with_capacity(capacity),
            pixel: Vec::with_capacity(capacity),
            ticks: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of events in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Pushes a single event into the batch.
    pub fn push(&mut self, event: EventRecord) {
        self.tube.push(event.tube);
        self.pixel.push(event.pixel);
        self.ticks.push(event.ticks);
    }

    /// Appends all events from another batch to this one.
    pub fn append(&mut self, other: &EventBatch) {
        self.tube.extend_from_slice(&other.tube);
        self.pixel.extend_from_slice(&other.pixel);
        self.ticks.extend_from_slice(&other.ticks);
    }

    /// Returns the event at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<EventRecord> {
        Some(EventRecord {
            tube: *self.tube.get(index)?,
            pixel: *self.pixel.get(index)?,
            ticks: *self.ticks.get(index)?,
        })
    }

    /// Iterates over the events in file order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = EventRecord> + '_ {
        self.tube
            .iter()
            .zip(&self.pixel)
            .zip(&self.ticks)
            .map(|((&tube, &pixel), &ticks)| EventRecord { tube, pixel, ticks })
    }

    /// Smallest and largest timestamp, or `None` for an empty batch.
    #[must_use]
    pub fn tick_range(&self) -> Option<(u64, u64)> {
        let min = self.ticks.iter().copied().min()?;
        let max = self.ticks.iter().copied().max()?;
        Some((min, max))
    }

    /// Whether timestamps never decrease in file order.
    #[must_use]
    pub fn is_time_ordered(&self) -> bool {
        self.ticks.windows(2).all(|w| w[0] <= w[1])
    }

    /// Splits the batch in two by a predicate, preserving order.
    #[must_use]
    pub fn partition<F>(&self, mut predicate: F) -> (EventBatch, EventBatch)
    where
        F: FnMut(&EventRecord) -> bool,
    {
        let mut matched = EventBatch::default();
        let mut rest = EventBatch::default();
        for event in self.iter() {
            if predicate(&event) {
                matched.push(event);
            } else {
                rest.push(event);
            }
        }
        (matched, rest)
    }
}

impl FromIterator<EventRecord> for EventBatch {
    fn from_iter<I: IntoIterator<Item = EventRecord>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut batch = EventBatch::with_capacity(iter.size_hint().0);
        for event in iter {
            batch.push(event);
        }
        batch
    }
}

impl AsRef<EventBatch> for EventBatch {
    fn as_ref(&self) -> &EventBatch {
        self
    }
}
