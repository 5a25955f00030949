//! Rebinning output.

use crate::export::TimeSlice;
use crate::{Error, Result};
use hstpix_core::Panel;
use ndarray::{Array3, ArrayView2, Axis, Zip};
use std::collections::BTreeMap;

/// Per-panel time-binned count arrays.
///
/// Each panel array is indexed `(row, col, bin)` in export orientation.
/// Counts from outside `[edges[0], edges[last])` are not present in any
/// array; their totals are kept in [`RebinResult::below_range`] and
/// [`RebinResult::above_range`].
#[derive(Debug, Clone, PartialEq)]
pub struct RebinResult {
    panels: BTreeMap<Panel, Array3<u64>>,
    edges_seconds: Vec<f64>,
    below_range: u64,
    above_range: u64,
}

impl RebinResult {
    pub(crate) fn new(
        panels: BTreeMap<Panel, Array3<u64>>,
        edges_seconds: Vec<f64>,
        below_range: u64,
        above_range: u64,
    ) -> Self {
        Self {
            panels,
            edges_seconds,
            below_range,
            above_range,
        }
    }

    /// Count array for one panel.
    ///
    /// # Panics
    /// Never: every result holds all four panels.
    #[must_use]
    pub fn panel(&self, panel: Panel) -> &Array3<u64> {
        &self.panels[&panel]
    }

    /// Count array by panel name (`"right"`, `"left"`, `"top"`, `"bottom"`).
    ///
    /// # Errors
    /// Returns a lookup error for an unknown name.
    pub fn get(&self, name: &str) -> Result<&Array3<u64>> {
        let panel: Panel = name.parse()?;
        Ok(self.panel(panel))
    }

    /// Iterates over `(panel, counts)` in panel order.
    pub fn iter(&self) -> impl Iterator<Item = (Panel, &Array3<u64>)> {
        self.panels.iter().map(|(&panel, counts)| (panel, counts))
    }

    /// Bin edges in seconds.
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges_seconds
    }

    /// Width of every bin in seconds.
    #[must_use]
    pub fn bin_widths(&self) -> Vec<f64> {
        self.edges_seconds.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Number of time bins.
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.edges_seconds.len().saturating_sub(1)
    }

    /// Events that fell before the first edge.
    #[must_use]
    pub fn below_range(&self) -> u64 {
        self.below_range
    }

    /// Events at or after the last edge.
    #[must_use]
    pub fn above_range(&self) -> u64 {
        self.above_range
    }

    /// Sum over every panel, pixel and bin.
    #[must_use]
    pub fn total_counts(&self) -> u64 {
        self.panels.values().map(|counts| counts.sum()).sum()
    }

    /// Total counts in each bin across all panels.
    #[must_use]
    pub fn counts_per_bin(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.n_bins()];
        for counts in self.panels.values() {
            for (bin, plane) in counts.axis_iter(Axis(2)).enumerate() {
                totals[bin] += plane.sum();
            }
        }
        totals
    }

    /// 2-D image of one panel for one bin.
    ///
    /// # Errors
    /// Returns [`Error::InvalidEdges`] if `bin` is out of range.
    pub fn image(&self, panel: Panel, bin: usize) -> Result<ArrayView2<'_, u64>> {
        if bin >= self.n_bins() {
            return Err(Error::InvalidEdges(format!(
                "bin {bin} out of range for {} bins",
                self.n_bins()
            )));
        }
        Ok(self.panel(panel).index_axis(Axis(2), bin))
    }

    /// Everything the data container needs for one bin.
    ///
    /// # Errors
    /// Returns an error if `bin` is out of range.
    pub fn time_slice(&self, bin: usize) -> Result<TimeSlice> {
        let mut images = BTreeMap::new();
        for (panel, _) in self.iter() {
            images.insert(panel, self.image(panel, bin)?.to_owned());
        }
        Ok(TimeSlice::new(
            bin,
            self.edges_seconds[bin],
            self.edges_seconds[bin + 1],
            images,
        ))
    }

    /// All time slices in order.
    ///
    /// # Errors
    /// Never fails for a well-formed result; errors are propagated from
    /// [`Self::time_slice`].
    pub fn time_slices(&self) -> Result<Vec<TimeSlice>> {
        (0..self.n_bins()).map(|bin| self.time_slice(bin)).collect()
    }

    /// Adds another result built against the same edges.
    ///
    /// # Errors
    /// Returns [`Error::BinMismatch`] if the edges differ.
    pub fn merge(&mut self, other: &RebinResult) -> Result<()> {
        if self.edges_seconds != other.edges_seconds {
            return Err(Error::BinMismatch);
        }
        for (panel, counts) in &mut self.panels {
            Zip::from(counts)
                .and(other.panel(*panel))
                .for_each(|a, &b| *a += b);
        }
        self.below_range += other.below_range;
        self.above_range += other.above_range;
        Ok(())
    }
}
