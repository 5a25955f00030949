//! Per-slice data for the integrated-exposure container.

use crate::{Error, Result};
use hstpix_core::Panel;
use ndarray::Array2;
use serde::Serialize;
use std::collections::BTreeMap;

/// One time bin of a rebin result, ready to replace a container's images.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlice {
    index: usize,
    start_s: f64,
    stop_s: f64,
    images: BTreeMap<Panel, Array2<u64>>,
}

impl TimeSlice {
    pub(crate) fn new(
        index: usize,
        start_s: f64,
        stop_s: f64,
        images: BTreeMap<Panel, Array2<u64>>,
    ) -> Self {
        Self {
            index,
            start_s,
            stop_s,
            images,
        }
    }

    /// Zero-based slice index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Start of the slice in seconds.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start_s
    }

    /// End of the slice in seconds.
    #[must_use]
    pub fn stop(&self) -> f64 {
        self.stop_s
    }

    /// Slice width in seconds; replaces the container's count time.
    #[must_use]
    pub fn live_time(&self) -> f64 {
        self.stop_s - self.start_s
    }

    /// `(row, col)` image for one panel.
    #[must_use]
    pub fn image(&self, panel: Panel) -> Option<&Array2<u64>> {
        self.images.get(&panel)
    }

    /// Iterates over `(panel, image)` in panel order.
    pub fn images(&self) -> impl Iterator<Item = (Panel, &Array2<u64>)> {
        self.images.iter().map(|(&panel, image)| (panel, image))
    }

    /// Total counts on one panel.
    #[must_use]
    pub fn integrated_count(&self, panel: Panel) -> u64 {
        self.images.get(&panel).map_or(0, Array2::sum)
    }

    /// Total counts across all panels.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.images.values().map(Array2::sum).sum()
    }

    /// Serializable summary without the images.
    #[must_use]
    pub fn summary(&self) -> SliceSummary {
        SliceSummary {
            index: self.index,
            start_s: self.start_s,
            stop_s: self.stop_s,
            live_time_s: self.live_time(),
            integrated_counts: self
                .images
                .iter()
                .map(|(&panel, image)| (panel, image.sum()))
                .collect(),
        }
    }
}

/// JSON-friendly description of a [`TimeSlice`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceSummary {
    /// Zero-based slice index.
    pub index: usize,
    /// Start in seconds.
    pub start_s: f64,
    /// End in seconds.
    pub stop_s: f64,
    /// Slice width in seconds.
    pub live_time_s: f64,
    /// Counts per panel.
    pub integrated_counts: BTreeMap<Panel, u64>,
}

/// Monitor count for a slice, scaled from the whole-run monitor.
///
/// Computes `floor(monitor * bin_width / count_time)`.
///
/// # Errors
/// Returns [`Error::InvalidEdges`] if `count_time` is not positive or the
/// bin width is negative or non-finite.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn scaled_monitor(monitor: u64, bin_width: f64, count_time: f64) -> Result<u64> {
    if !count_time.is_finite() || count_time <= 0.0 {
        return Err(Error::InvalidEdges(format!(
            "count time must be positive, got {count_time}"
        )));
    }
    if !bin_width.is_finite() || bin_width < 0.0 {
        return Err(Error::InvalidEdges(format!(
            "bin width must be non-negative, got {bin_width}"
        )));
    }
    Ok((monitor as f64 * bin_width / count_time).floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scaled_monitor() {
        assert_eq!(scaled_monitor(1000, 2.5, 10.0).unwrap(), 250);
        // truncates
        assert_eq!(scaled_monitor(999, 1.0, 10.0).unwrap(), 99);
        assert_eq!(scaled_monitor(1000, 0.0, 10.0).unwrap(), 0);
        assert!(matches!(
            scaled_monitor(1000, 1.0, 0.0),
            Err(Error::InvalidEdges(_))
        ));
    }

    #[test]
    fn test_slice_counts() {
        let mut images = BTreeMap::new();
        images.insert(Panel::Right, Array2::from_elem((2, 2), 3u64));
        images.insert(Panel::Top, Array2::from_elem((2, 2), 1u64));
        let slice = TimeSlice::new(1, 0.5, 2.0, images);

        assert_relative_eq!(slice.live_time(), 1.5);
        assert_eq!(slice.integrated_count(Panel::Right), 12);
        assert_eq!(slice.integrated_count(Panel::Left), 0);
        assert_eq!(slice.total_count(), 16);

        let summary = slice.summary();
        assert_eq!(summary.index, 1);
        assert_eq!(summary.integrated_counts[&Panel::Top], 4);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains(r#""right":12"#));
    }
}
