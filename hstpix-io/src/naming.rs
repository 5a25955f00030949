//! Output file and container key naming.

use hstpix_core::Panel;
use hstpix_hst::CarriageGroup;
use std::path::{Path, PathBuf};

/// Suffix of the integrated-exposure container files.
pub const CONTAINER_SUFFIX: &str = ".nxs.ngv";

/// Strips [`CONTAINER_SUFFIX`] from a container path, if present.
#[must_use]
pub fn container_base(path: &str) -> &str {
    path.strip_suffix(CONTAINER_SUFFIX).unwrap_or(path)
}

/// Name for slice `index` (zero-based) of `count`.
///
/// Produces `{base}_{index+1}_of_{count}{suffix}`, or
/// `{base}_{label}_{index+1}_of_{count}{suffix}` when a label is given.
#[must_use]
pub fn slice_name(base: &str, label: Option<&str>, index: usize, count: usize, suffix: &str) -> String {
    let base = container_base(base);
    match label {
        Some(label) => format!("{base}_{label}_{}_of_{count}{suffix}", index + 1),
        None => format!("{base}_{}_of_{count}{suffix}", index + 1),
    }
}

/// Container output path for slice `index` of `count`.
#[must_use]
pub fn container_slice_path(container: &Path, label: Option<&str>, index: usize, count: usize) -> PathBuf {
    let name = container.to_string_lossy();
    PathBuf::from(slice_name(&name, label, index, count, CONTAINER_SUFFIX))
}

/// Container group key for one panel of a carriage, e.g. `detector_FR`.
#[must_use]
pub fn detector_key(carriage: CarriageGroup, panel: Panel) -> String {
    format!("detector_{}{}", carriage.key(), panel.key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_names() {
        assert_eq!(
            slice_name("sans123.nxs.ngv", None, 0, 10, CONTAINER_SUFFIX),
            "sans123_1_of_10.nxs.ngv"
        );
        assert_eq!(
            slice_name("sans123.nxs.ngv", Some("hot"), 2, 3, CONTAINER_SUFFIX),
            "sans123_hot_3_of_3.nxs.ngv"
        );
        // other suffixes are left alone
        assert_eq!(slice_name("run.hst", None, 0, 1, ".csv"), "run.hst_1_of_1.csv");
    }

    #[test]
    fn test_container_slice_path() {
        let path = container_slice_path(Path::new("/data/sans9.nxs.ngv"), None, 4, 5);
        assert_eq!(path, PathBuf::from("/data/sans9_5_of_5.nxs.ngv"));
    }

    #[test]
    fn test_detector_keys() {
        assert_eq!(detector_key(CarriageGroup::Front, Panel::Right), "detector_FR");
        assert_eq!(detector_key(CarriageGroup::Middle, Panel::Bottom), "detector_MB");
    }
}
