//! Time rebinning of a decoded event set.

use crate::bins::{BinSpec, TimeEdges, MAX_BINS};
use crate::config::RebinConfig;
use crate::panels::panel_view;
use crate::result::RebinResult;
use crate::volume::{check_bounds, CountVolume};
use crate::{Error, Result};
use hstpix_core::{EventBatch, PANELS};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Rebins event sets into per-panel count volumes.
#[derive(Debug, Clone, Default)]
pub struct Rebinner {
    config: RebinConfig,
}

impl Rebinner {
    /// Creates a rebinner with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rebinner with a custom configuration.
    #[must_use]
    pub fn with_config(config: RebinConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RebinConfig {
        &self.config
    }

    /// Rebins `events` into the requested time bins.
    ///
    /// The event set is only read; the same events can be rebinned again
    /// with different bins and identical bins give identical results.
    ///
    /// # Errors
    /// Returns [`Error::Range`](crate::Error::Range) when a bin count has no
    /// span to divide, [`Error::InvalidEdges`](crate::Error::InvalidEdges)
    /// for unusable explicit edges, and
    /// [`Error::InvalidEvent`](crate::Error::InvalidEvent) for an event off
    /// the carriage.
    pub fn rebin<E: AsRef<EventBatch>>(&self, events: &E, spec: &BinSpec) -> Result<RebinResult> {
        let events = events.as_ref();
        let edges = TimeEdges::resolve(spec, events.tick_range())?;
        self.rebin_with_edges(events, &edges)
    }

    /// Rebins against already resolved edges.
    ///
    /// # Errors
    /// Returns an error if an event lies off the carriage.
    pub fn rebin_with_edges(&self, events: &EventBatch, edges: &TimeEdges) -> Result<RebinResult> {
        let volume = self.accumulate(events, edges)?;

        let interior = volume.interior();
        let panels: BTreeMap<_, _> = PANELS
            .iter()
            .map(|layout| {
                (
                    layout.panel,
                    panel_view(interior.view(), layout).to_owned(),
                )
            })
            .collect();

        log::debug!(
            "rebinned {} events into {} bins: {} in range, {} below, {} above",
            events.len(),
            edges.n_bins(),
            volume.in_range(),
            volume.below_range(),
            volume.above_range()
        );

        Ok(RebinResult::new(
            panels,
            edges.to_seconds(),
            volume.below_range(),
            volume.above_range(),
        ))
    }

    /// Fills a full count volume, including the overflow slots.
    ///
    /// # Errors
    /// Returns an error if the edges hold more than [`MAX_BINS`] bins or an
    /// event lies off the carriage.
    pub fn accumulate(&self, events: &EventBatch, edges: &TimeEdges) -> Result<CountVolume> {
        if edges.n_bins() > MAX_BINS {
            return Err(Error::Range {
                n_bins: edges.n_bins(),
                reason: "too many bins",
            });
        }
        check_bounds(events)?;
        if self.config.use_parallel(events.len()) {
            Ok(self.accumulate_parallel(events, edges))
        } else {
            let mut volume = CountVolume::new(edges.n_bins());
            volume.accumulate_columns(&events.tube, &events.pixel, &events.ticks, edges);
            Ok(volume)
        }
    }

    /// One private volume per chunk, summed pairwise.
    fn accumulate_parallel(&self, events: &EventBatch, edges: &TimeEdges) -> CountVolume {
        let chunk = self.config.chunk_size.max(1);
        let n_bins = edges.n_bins();
        events
            .tube
            .par_chunks(chunk)
            .zip(events.pixel.par_chunks(chunk))
            .zip(events.ticks.par_chunks(chunk))
            .map(|((tube, pixel), ticks)| {
                let mut volume = CountVolume::new(n_bins);
                volume.accumulate_columns(tube, pixel, ticks, edges);
                volume
            })
            .reduce(
                || CountVolume::new(n_bins),
                |mut a, b| {
                    a.add_assign(&b);
                    a
                },
            )
    }

    /// Rebins each `(start, stop)` region on its own, in order of start.
    ///
    /// Regions may overlap or repeat; each becomes a single-bin result.
    ///
    /// # Errors
    /// Returns the first error from any region.
    pub fn rebin_regions<E: AsRef<EventBatch>>(
        &self,
        events: &E,
        regions: &[(f64, f64)],
    ) -> Result<Vec<RebinResult>> {
        let mut sorted = regions.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        sorted
            .into_iter()
            .map(|(start, stop)| self.rebin(events, &BinSpec::Edges(vec![start, stop])))
            .collect()
    }
}

/// Rebins with the default configuration.
///
/// # Errors
/// See [`Rebinner::rebin`].
pub fn rebin<E: AsRef<EventBatch>>(events: &E, spec: &BinSpec) -> Result<RebinResult> {
    Rebinner::new().rebin(events, spec)
}
