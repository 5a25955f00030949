//! Per-slice metadata for the integrated-exposure container.
//!
//! The container itself is written elsewhere; a manifest records, for each
//! slice, which container file it becomes and the values that replace the
//! container's counter and detector fields.

use crate::naming::{container_slice_path, detector_key};
use crate::Result;
use hstpix_hst::CarriageGroup;
use hstpix_rebin::{scaled_monitor, TimeSlice};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Whole-run monitor reading used to scale each slice's monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorScaling {
    /// Monitor counts for the whole run.
    pub monitor: u64,
    /// Live time of the whole run in seconds.
    pub count_time: f64,
}

/// Container replacement values for one slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceManifest {
    /// Container file this slice is written to.
    pub container: PathBuf,
    /// Slice start in seconds.
    pub start_s: f64,
    /// Slice stop in seconds.
    pub stop_s: f64,
    /// Live time (and collection time) in seconds.
    pub live_time_s: f64,
    /// Scaled monitor count, when a whole-run monitor was given.
    pub monitor: Option<u64>,
    /// Integrated counts keyed by container detector group (`detector_FR`, ...).
    pub integrated_counts: BTreeMap<String, u64>,
}

/// Builds one manifest per slice, numbered in slice order.
///
/// # Errors
/// Returns an error if monitor scaling is requested with a non-positive
/// count time.
pub fn slice_manifests(
    slices: &[TimeSlice],
    carriage: CarriageGroup,
    container: &Path,
    label: Option<&str>,
    monitor: Option<MonitorScaling>,
) -> Result<Vec<SliceManifest>> {
    let count = slices.len();
    slices
        .iter()
        .enumerate()
        .map(|(i, slice)| {
            let monitor = monitor
                .map(|m| scaled_monitor(m.monitor, slice.live_time(), m.count_time))
                .transpose()?;
            Ok(SliceManifest {
                container: container_slice_path(container, label, i, count),
                start_s: slice.start(),
                stop_s: slice.stop(),
                live_time_s: slice.live_time(),
                monitor,
                integrated_counts: slice
                    .images()
                    .map(|(panel, image)| (detector_key(carriage, panel), image.sum()))
                    .collect(),
            })
        })
        .collect()
}
