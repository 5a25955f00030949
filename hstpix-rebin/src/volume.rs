//! Dense tube × pixel × time-bin count volume.

use crate::bins::TimeEdges;
use crate::{Error, Result};
use hstpix_core::{EventBatch, N_PIXELS, N_TUBES};
use ndarray::{s, Array3, ArrayView3, Axis, Zip};

/// Scatter-add histogram over the whole carriage.
///
/// The time axis has `n_bins + 2` slots: slot 0 collects events before the
/// first edge and the last slot collects events at or after the last edge.
/// Every event lands somewhere, so a single pass needs no pre-filter, and
/// [`CountVolume::interior`] trims the two overflow slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountVolume {
    counts: Array3<u64>,
}

impl CountVolume {
    /// Creates an all-zero volume for `n_bins` interior bins.
    #[must_use]
    pub fn new(n_bins: usize) -> Self {
        Self {
            counts: Array3::zeros((N_TUBES, N_PIXELS, n_bins + 2)),
        }
    }

    /// Number of interior bins.
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.counts.len_of(Axis(2)) - 2
    }

    /// Adds column slices of events.
    ///
    /// Callers must have bounds-checked tube and pixel (see [`check_bounds`]).
    pub(crate) fn accumulate_columns(
        &mut self,
        tube: &[u8],
        pixel: &[u8],
        ticks: &[u64],
        edges: &TimeEdges,
    ) {
        debug_assert_eq!(edges.n_bins(), self.n_bins());
        for ((&t, &p), &ts) in tube.iter().zip(pixel).zip(ticks) {
            let slot = edges.bin_index(ts);
            self.counts[[usize::from(t), usize::from(p), slot]] += 1;
        }
    }

    /// Adds every event in `events`.
    ///
    /// # Errors
    /// Returns an error if the edges do not match this volume or an event
    /// lies outside the carriage.
    pub fn accumulate(&mut self, events: &EventBatch, edges: &TimeEdges) -> Result<()> {
        if edges.n_bins() != self.n_bins() {
            return Err(Error::BinMismatch);
        }
        check_bounds(events)?;
        self.accumulate_columns(&events.tube, &events.pixel, &events.ticks, edges);
        Ok(())
    }

    /// Adds another volume element-wise.
    ///
    /// Volumes built over disjoint events with the same edges merge into
    /// exactly the volume a single pass over all events would produce.
    ///
    /// # Errors
    /// Returns [`Error::BinMismatch`] if the volumes have different shapes.
    pub fn merge(&mut self, other: &CountVolume) -> Result<()> {
        if self.counts.dim() != other.counts.dim() {
            return Err(Error::BinMismatch);
        }
        self.add_assign(other);
        Ok(())
    }

    pub(crate) fn add_assign(&mut self, other: &CountVolume) {
        Zip::from(&mut self.counts)
            .and(&other.counts)
            .for_each(|a, &b| *a += b);
    }

    /// Counts with the overflow slots trimmed, shape `(192, 128, n_bins)`.
    #[must_use]
    pub fn interior(&self) -> ArrayView3<'_, u64> {
        let n = self.n_bins();
        self.counts.slice(s![.., .., 1..=n])
    }

    /// Events before the first edge.
    #[must_use]
    pub fn below_range(&self) -> u64 {
        self.counts.index_axis(Axis(2), 0).sum()
    }

    /// Events at or after the last edge.
    #[must_use]
    pub fn above_range(&self) -> u64 {
        let last = self.counts.len_of(Axis(2)) - 1;
        self.counts.index_axis(Axis(2), last).sum()
    }

    /// Events inside the edges.
    #[must_use]
    pub fn in_range(&self) -> u64 {
        self.interior().sum()
    }
}

/// Rejects events whose tube or pixel would index past the volume.
///
/// # Errors
/// Returns [`Error::InvalidEvent`] for the first offending event.
pub fn check_bounds(events: &EventBatch) -> Result<()> {
    let bad = events
        .tube
        .iter()
        .zip(&events.pixel)
        .position(|(&t, &p)| usize::from(t) >= N_TUBES || usize::from(p) >= N_PIXELS);
    match bad {
        None => Ok(()),
        Some(index) => {
            let source = if usize::from(events.tube[index]) >= N_TUBES {
                hstpix_core::Error::InvalidTube(events.tube[index])
            } else {
                hstpix_core::Error::InvalidPixel(events.pixel[index])
            };
            Err(Error::InvalidEvent { index, source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hstpix_core::EventRecord;

    fn edges(ticks: &[f64]) -> TimeEdges {
        TimeEdges::from_ticks(ticks.to_vec()).unwrap()
    }

    #[test]
    fn test_overflow_slots() {
        let events: EventBatch = [
            EventRecord::new(1, 2, 5),    // below
            EventRecord::new(1, 2, 15),   // bin 0
            EventRecord::new(1, 2, 25),   // bin 1
            EventRecord::new(1, 2, 30),   // at last edge: above
            EventRecord::new(1, 2, 1000), // above
        ]
        .into_iter()
        .collect();
        let edges = edges(&[10.0, 20.0, 30.0]);
        let mut volume = CountVolume::new(edges.n_bins());
        volume.accumulate(&events, &edges).unwrap();

        assert_eq!(volume.below_range(), 1);
        assert_eq!(volume.above_range(), 2);
        assert_eq!(volume.in_range(), 2);
        let interior = volume.interior();
        assert_eq!(interior.dim(), (N_TUBES, N_PIXELS, 2));
        assert_eq!(interior[[1, 2, 0]], 1);
        assert_eq!(interior[[1, 2, 1]], 1);
    }

    #[test]
    fn test_zero_bins() {
        let events: EventBatch = [EventRecord::new(0, 0, 3)].into_iter().collect();
        let edges = TimeEdges::resolve(&crate::BinSpec::Count(0), None).unwrap();
        let mut volume = CountVolume::new(0);
        volume.accumulate(&events, &edges).unwrap();
        assert_eq!(volume.interior().len(), 0);
        assert_eq!(volume.below_range(), 1);
    }

    #[test]
    fn test_merge_shape_mismatch() {
        let mut a = CountVolume::new(2);
        let b = CountVolume::new(3);
        assert!(matches!(a.merge(&b), Err(Error::BinMismatch)));
    }

    #[test]
    fn test_bounds_checked_before_write() {
        let mut events = EventBatch::default();
        events.push(EventRecord::new(0, 0, 0));
        events.push(EventRecord::new(192, 0, 0));
        let edges = edges(&[0.0, 10.0]);
        let mut volume = CountVolume::new(1);
        assert!(matches!(
            volume.accumulate(&events, &edges),
            Err(Error::InvalidEvent {
                index: 1,
                source: hstpix_core::Error::InvalidTube(192)
            })
        ));
        // nothing was written
        assert_eq!(volume.in_range() + volume.below_range() + volume.above_range(), 0);
    }
}
