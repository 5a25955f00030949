//! hstpix-core: Core types for event-mode VSANS detector data.
//!
//! This crate provides the instrument geometry (tubes, pixels, panels),
//! the packed little-endian integer helpers used by the `.hst` decoder,
//! tick/second conversion, and the columnar event storage shared by the
//! decoder and the rebinning engine.
//!

pub mod error;
pub mod events;
pub mod geometry;
pub mod packed;
pub mod time;

pub use error::{Error, Result};
pub use events::{EventBatch, EventRecord};
pub use geometry::{Panel, PanelLayout, PanelOrientation, N_PIXELS, N_TUBES, PANELS, TUBES_PER_PANEL};
pub use packed::{truncate_le, zero_extend_le, ZeroExtend};
pub use time::{seconds_to_ticks, ticks_to_seconds, TICKS_PER_SECOND, TICK_SECONDS};
