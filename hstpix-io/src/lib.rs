//! hstpix-io: Event file reading and slice output for hstpix.
//!
//! This crate opens `.hst` files through memory mappings (memmap2),
//! writes per-slice panel images, coarse histograms and container
//! manifests, and names output the way the integrated-exposure container
//! expects.
//!

mod error;
mod manifest;
pub mod naming;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use manifest::{slice_manifests, MonitorScaling, SliceManifest};
pub use naming::{container_base, container_slice_path, detector_key, slice_name, CONTAINER_SUFFIX};
pub use reader::{open_event_file, HstFileReader, MappedFileReader};
pub use writer::{write_slices, ImageFormat, SliceFileWriter};
