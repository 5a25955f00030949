//! hstpix-rebin: Time rebinning of VSANS detector events.
//!
//! This crate turns a decoded event set into images:
//! - **Rebinning** - dense tube × pixel × time-bin volumes, split into
//!   the four oriented carriage panels
//! - **Coarse histogram** - whole-detector counts versus time
//! - **Slice export** - per-bin images, live time and monitor scaling for
//!   the integrated-exposure container
//!
#![warn(missing_docs)]

mod bins;
mod config;
mod engine;
mod error;
mod export;
mod histogram;
pub mod panels;
mod result;
mod volume;

pub use bins::{BinSpec, TimeEdges, MAX_BINS};
pub use config::RebinConfig;
pub use engine::{rebin, Rebinner};
pub use error::{Error, Result};
pub use export::{scaled_monitor, SliceSummary, TimeSlice};
pub use histogram::{counts_vs_time, TimeHistogram};
pub use result::RebinResult;
pub use volume::{check_bounds, CountVolume};

// Re-export the geometry callers index results with
pub use hstpix_core::{Panel, PANELS};
