//! Whole-detector counts versus time.

use crate::{Error, Result};
use hstpix_core::{seconds_to_ticks, ticks_to_seconds, EventBatch};
use serde::Serialize;

/// Coarse 1-D time histogram over every tube and pixel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeHistogram {
    /// Bin centres in seconds.
    pub time_axis: Vec<f64>,
    /// Events per bin.
    pub counts: Vec<u64>,
    /// Bin width in seconds.
    pub step_seconds: f64,
}

impl TimeHistogram {
    /// Number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the histogram has no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum over all bins.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Iterates over `(bin centre, count)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.time_axis.iter().copied().zip(self.counts.iter().copied())
    }
}

/// Counts events in fixed-width bins starting at `start_s`.
///
/// Edges are `start + k * step` for every `k` whose edge lies below
/// `max + step`, so the last edge is at or past the latest event. Bins are
/// left-closed except the last, which also takes events exactly on its
/// upper edge. Events before `start_s` are ignored. A start past the
/// latest event yields an empty histogram.
///
/// # Errors
/// Returns [`Error::Range`] for an empty event set and
/// [`Error::InvalidEdges`] for a non-positive or non-finite step or a
/// non-finite start.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn counts_vs_time(events: &EventBatch, start_s: f64, step_s: f64) -> Result<TimeHistogram> {
    if !step_s.is_finite() || step_s <= 0.0 {
        return Err(Error::InvalidEdges(format!(
            "step must be positive and finite, got {step_s}"
        )));
    }
    if !start_s.is_finite() {
        return Err(Error::InvalidEdges(format!(
            "start must be finite, got {start_s}"
        )));
    }
    let (_, max) = events.tick_range().ok_or(Error::Range {
        n_bins: 0,
        reason: "event set is empty",
    })?;

    let start = seconds_to_ticks(start_s);
    let step = seconds_to_ticks(step_s);
    let limit = max as f64 + step;
    let n_edges = if start < limit {
        ((limit - start) / step).ceil() as usize
    } else {
        0
    };
    let edges: Vec<f64> = (0..n_edges)
        .map(|k| start + step * k as f64)
        .filter(|&edge| edge < limit)
        .collect();

    if edges.len() < 2 {
        log::debug!("counts_vs_time: start {start_s}s lies past the last event");
        return Ok(TimeHistogram {
            time_axis: Vec::new(),
            counts: Vec::new(),
            step_seconds: step_s,
        });
    }

    let n_bins = edges.len() - 1;
    let last_edge = edges[n_bins];
    let mut counts = vec![0u64; n_bins];
    for &ts in &events.ticks {
        let t = ts as f64;
        let slot = edges.partition_point(|&edge| edge <= t);
        if slot == 0 {
            continue;
        }
        if slot <= n_bins {
            counts[slot - 1] += 1;
        } else if (t - last_edge).abs() < f64::EPSILON {
            counts[n_bins - 1] += 1;
        }
    }

    let time_axis = edges[..n_bins]
        .iter()
        .map(|&edge| ticks_to_seconds(edge + step / 2.0))
        .collect();

    log::debug!(
        "counts_vs_time: {} bins of {step_s}s, {} of {} events counted",
        n_bins,
        counts.iter().sum::<u64>(),
        events.len()
    );

    Ok(TimeHistogram {
        time_axis,
        counts,
        step_seconds: step_s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hstpix_core::EventRecord;

    fn batch(ticks: &[u64]) -> EventBatch {
        ticks.iter().map(|&t| EventRecord::new(0, 0, t)).collect()
    }

    // one-second steps keep every edge an exact tick count
    const SECOND: u64 = 10_000_000;

    #[test]
    fn test_bin_centres() {
        let events = batch(&[0, SECOND / 2, 3 * SECOND / 2, 5 * SECOND / 2]);
        let hist = counts_vs_time(&events, 0.0, 1.0).unwrap();

        assert_eq!(hist.counts, vec![2, 1, 1]);
        assert_eq!(hist.time_axis.len(), 3);
        assert_relative_eq!(hist.time_axis[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(hist.time_axis[2], 2.5, epsilon = 1e-12);
        assert_eq!(hist.total(), 4);
    }

    #[test]
    fn test_last_bin_closed() {
        // max lands exactly on an edge: it is counted in the last bin
        let events = batch(&[0, SECOND, 2 * SECOND]);
        let hist = counts_vs_time(&events, 0.0, 1.0).unwrap();
        assert_eq!(hist.counts, vec![1, 2]);
    }

    #[test]
    fn test_events_before_start_ignored() {
        let events = batch(&[10, SECOND + 20, SECOND + 30]);
        let hist = counts_vs_time(&events, 1.0, 1.0).unwrap();
        assert_eq!(hist.counts, vec![2]);
        assert_relative_eq!(hist.time_axis[0], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_start_past_end() {
        let events = batch(&[10, 20]);
        let hist = counts_vs_time(&events, 5.0, 1.0).unwrap();
        assert!(hist.is_empty());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            counts_vs_time(&EventBatch::default(), 0.0, 1.0),
            Err(Error::Range { .. })
        ));
        let events = batch(&[1]);
        assert!(matches!(
            counts_vs_time(&events, 0.0, 0.0),
            Err(Error::InvalidEdges(_))
        ));
        assert!(matches!(
            counts_vs_time(&events, 0.0, f64::INFINITY),
            Err(Error::InvalidEdges(_))
        ));
    }
}
