//! Time-bin edges.
//!
//! Edges are held in fractional ticks. Bins are left-closed,
//! `[edge[i], edge[i + 1])`, and [`TimeEdges::bin_index`] reserves slot 0
//! for events before the first edge and slot `n_bins + 1` for events at or
//! after the last edge.

use crate::{Error, Result};
use hstpix_core::{seconds_to_ticks, ticks_to_seconds};

/// Largest number of time bins a single rebin may request.
///
/// The count volume holds `192 * 128 * (n_bins + 2)` counters, about
/// 2 GB at this limit.
pub const MAX_BINS: usize = 10_000;

/// How to slice the event time axis.
#[derive(Debug, Clone, PartialEq)]
pub enum BinSpec {
    /// Evenly spaced bins spanning every observed timestamp.
    ///
    /// The last edge sits one tick (100 ns) past the latest event so that
    /// event is inside the left-closed last bin; the final slice therefore
    /// stops 100 ns after the latest timestamp.
    Count(usize),
    /// Explicit ascending edges in seconds.
    Edges(Vec<f64>),
}

impl From<usize> for BinSpec {
    fn from(n_bins: usize) -> Self {
        BinSpec::Count(n_bins)
    }
}

impl From<Vec<f64>> for BinSpec {
    fn from(edges: Vec<f64>) -> Self {
        BinSpec::Edges(edges)
    }
}

impl From<&[f64]> for BinSpec {
    fn from(edges: &[f64]) -> Self {
        BinSpec::Edges(edges.to_vec())
    }
}

/// Validated time-bin edges in ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEdges {
    ticks: Vec<f64>,
}

impl TimeEdges {
    /// Resolves a bin specification against the observed tick range.
    ///
    /// A bin count of zero yields no edges and no bins.
    ///
    /// # Errors
    /// Returns [`Error::Range`] for a bin count with no span (no events, or
    /// a single distinct timestamp) or above [`MAX_BINS`], and
    /// [`Error::InvalidEdges`] for unusable explicit edges.
    pub fn resolve(spec: &BinSpec, tick_range: Option<(u64, u64)>) -> Result<Self> {
        match spec {
            BinSpec::Count(0) => Ok(Self { ticks: Vec::new() }),
            BinSpec::Count(n_bins) if *n_bins > MAX_BINS => Err(Error::Range {
                n_bins: *n_bins,
                reason: "too many bins",
            }),
            BinSpec::Count(n_bins) => {
                let (min, max) = tick_range.ok_or(Error::Range {
                    n_bins: *n_bins,
                    reason: "event set is empty",
                })?;
                if min == max {
                    return Err(Error::Range {
                        n_bins: *n_bins,
                        reason: "all events share one timestamp",
                    });
                }
                Ok(Self::uniform(*n_bins, min, max))
            }
            BinSpec::Edges(seconds) => Self::from_seconds(seconds),
        }
    }

    /// Evenly spaced edges covering ticks `min..=max`.
    ///
    /// Ticks are integers, so the half-open span `[min, max + 1)` contains
    /// every observed timestamp including the last one.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn uniform(n_bins: usize, min: u64, max: u64) -> Self {
        if n_bins == 0 {
            return Self { ticks: Vec::new() };
        }
        let start = min as f64;
        let stop = max as f64 + 1.0;
        let step = (stop - start) / n_bins as f64;
        let mut ticks: Vec<f64> = (0..n_bins).map(|i| start + step * i as f64).collect();
        ticks.push(stop);
        Self { ticks }
    }

    /// Builds edges from seconds.
    ///
    /// # Errors
    /// Returns [`Error::InvalidEdges`] if any edge is not finite, the edges
    /// decrease, or they describe more than [`MAX_BINS`] bins.
    pub fn from_seconds(seconds: &[f64]) -> Result<Self> {
        validate_ascending(seconds)?;
        Ok(Self {
            ticks: seconds.iter().copied().map(seconds_to_ticks).collect(),
        })
    }

    /// Builds edges directly from fractional ticks.
    ///
    /// # Errors
    /// Returns [`Error::InvalidEdges`] if any edge is not finite, the edges
    /// decrease, or they describe more than [`MAX_BINS`] bins.
    pub fn from_ticks(ticks: Vec<f64>) -> Result<Self> {
        validate_ascending(&ticks)?;
        Ok(Self { ticks })
    }

    /// Number of interior bins.
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.ticks.len().saturating_sub(1)
    }

    /// Edges in ticks.
    #[must_use]
    pub fn as_ticks(&self) -> &[f64] {
        &self.ticks
    }

    /// Edges in seconds.
    #[must_use]
    pub fn to_seconds(&self) -> Vec<f64> {
        self.ticks.iter().copied().map(ticks_to_seconds).collect()
    }

    /// Slot for a timestamp: 0 below range, `1..=n_bins` interior,
    /// `n_bins + 1` at or past the last edge.
    #[allow(clippy::cast_precision_loss)]
    #[inline]
    #[must_use]
    pub fn bin_index(&self, ticks: u64) -> usize {
        let t = ticks as f64;
        self.ticks.partition_point(|&edge| edge <= t)
    }

    /// Whether a timestamp falls in `[first edge, last edge)`.
    #[must_use]
    pub fn contains(&self, ticks: u64) -> bool {
        let slot = self.bin_index(ticks);
        slot >= 1 && slot <= self.n_bins()
    }
}

fn validate_ascending(edges: &[f64]) -> Result<()> {
    if edges.len() > MAX_BINS + 1 {
        return Err(Error::InvalidEdges(format!(
            "{} edges exceed the limit of {MAX_BINS} bins",
            edges.len()
        )));
    }
    if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
        return Err(Error::InvalidEdges(format!("edge {bad} is not finite")));
    }
    if let Some(w) = edges.windows(2).find(|w| w[1] < w[0]) {
        return Err(Error::InvalidEdges(format!(
            "edges must be ascending ({} follows {})",
            w[1], w[0]
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bin_index_left_closed() {
        let edges = TimeEdges {
            ticks: vec![0.0, 100.0, 200.0],
        };
        assert_eq!(edges.n_bins(), 2);
        assert_eq!(edges.bin_index(0), 1);
        assert_eq!(edges.bin_index(99), 1);
        assert_eq!(edges.bin_index(100), 2);
        assert_eq!(edges.bin_index(199), 2);
        assert_eq!(edges.bin_index(200), 3); // at last edge: overflow
        assert_eq!(edges.bin_index(5000), 3);

        let shifted = TimeEdges {
            ticks: vec![10.0, 20.0],
        };
        assert_eq!(shifted.bin_index(9), 0);
        assert!(!shifted.contains(9));
        assert!(shifted.contains(10));
    }

    #[test]
    fn test_uniform_covers_max() {
        let edges = TimeEdges::uniform(4, 100, 499);
        assert_eq!(edges.as_ticks().len(), 5);
        assert_relative_eq!(edges.as_ticks()[0], 100.0);
        assert_relative_eq!(edges.as_ticks()[4], 500.0);
        assert_relative_eq!(edges.as_ticks()[1], 200.0);
        assert!(edges.contains(100));
        assert!(edges.contains(499));
        assert_eq!(edges.bin_index(499), 4);
    }

    #[test]
    fn test_resolve_count_errors() {
        assert!(matches!(
            TimeEdges::resolve(&BinSpec::Count(5), None),
            Err(Error::Range { n_bins: 5, .. })
        ));
        assert!(matches!(
            TimeEdges::resolve(&BinSpec::Count(5), Some((7, 7))),
            Err(Error::Range { .. })
        ));
        let empty = TimeEdges::resolve(&BinSpec::Count(0), None).unwrap();
        assert_eq!(empty.n_bins(), 0);
        assert_eq!(empty.bin_index(12), 0);
    }

    #[test]
    fn test_from_seconds() {
        let edges = TimeEdges::from_seconds(&[0.0, 1.0, 2.5]).unwrap();
        assert_relative_eq!(edges.as_ticks()[1], 10_000_000.0);
        assert_relative_eq!(edges.to_seconds()[2], 2.5);

        assert!(matches!(
            TimeEdges::from_seconds(&[1.0, 0.5]),
            Err(Error::InvalidEdges(_))
        ));
        assert!(matches!(
            TimeEdges::from_seconds(&[0.0, f64::NAN]),
            Err(Error::InvalidEdges(_))
        ));
    }

    #[test]
    fn test_event_on_decimal_edge_opens_its_bin() {
        // 1.1e-6 s and 2.5e-6 s are ticks 11 and 25
        let edges = TimeEdges::from_seconds(&[1.1e-6, 2.5e-6, 1e-3]).unwrap();
        assert_eq!(edges.as_ticks(), &[11.0, 25.0, 10_000.0]);
        assert_eq!(edges.bin_index(10), 0);
        assert_eq!(edges.bin_index(11), 1);
        assert_eq!(edges.bin_index(24), 1);
        assert_eq!(edges.bin_index(25), 2);
        assert!(edges.contains(11));
    }

    #[test]
    fn test_bin_limit() {
        assert!(matches!(
            TimeEdges::resolve(&BinSpec::Count(usize::MAX), Some((0, 100))),
            Err(Error::Range { .. })
        ));
        assert!(matches!(
            TimeEdges::resolve(&BinSpec::Count(MAX_BINS + 1), Some((0, 100))),
            Err(Error::Range { .. })
        ));
        assert_eq!(
            TimeEdges::resolve(&BinSpec::Count(MAX_BINS), Some((0, 100)))
                .unwrap()
                .n_bins(),
            MAX_BINS
        );
        #[allow(clippy::cast_precision_loss)]
        let too_many: Vec<f64> = (0..=MAX_BINS + 1).map(|i| i as f64).collect();
        assert!(matches!(
            TimeEdges::from_ticks(too_many),
            Err(Error::InvalidEdges(_))
        ));
    }

    #[test]
    fn test_single_edge_has_no_bins() {
        let edges = TimeEdges::from_seconds(&[1.0]).unwrap();
        assert_eq!(edges.n_bins(), 0);
        // everything lands in an overflow slot
        assert_eq!(edges.bin_index(0), 0);
        assert_eq!(edges.bin_index(u64::from(u32::MAX)), 1);
    }
}
