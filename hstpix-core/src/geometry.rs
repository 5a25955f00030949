//! Detector carriage geometry.
//!
//! One carriage holds 192 tubes of 128 pixels. The tube axis is the
//! concatenation of four mechanically mounted panels, each of which needs
//! its own transform to land in the common export orientation:
//!
//! | tubes      | panel    | transform                          |
//! |------------|----------|------------------------------------|
//! | `0..48`    | right    | mirror left-right                  |
//! | `48..96`   | top      | transpose                          |
//! | `96..144`  | bottom   | transpose, mirror both axes        |
//! | `144..192` | left     | mirror top-bottom                  |
//!
//! The table is [`PANELS`]; everything that places a tube/pixel into a
//! panel reads it instead of branching on tube ranges.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of tubes on one detector carriage.
pub const N_TUBES: usize = 192;

/// Number of pixels along one tube.
pub const N_PIXELS: usize = 128;

/// Number of tubes in each panel.
pub const TUBES_PER_PANEL: usize = 48;

/// A physical panel of a detector carriage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Panel {
    /// Right panel (tubes 0..48).
    Right,
    /// Left panel (tubes 144..192).
    Left,
    /// Top panel (tubes 48..96).
    Top,
    /// Bottom panel (tubes 96..144).
    Bottom,
}

impl Panel {
    /// Lowercase panel name used as the result key.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Panel::Right => "right",
            Panel::Left => "left",
            Panel::Top => "top",
            Panel::Bottom => "bottom",
        }
    }

    /// Single-letter key used by the data container (`detector_FR`, ...).
    #[must_use]
    pub fn key(self) -> char {
        match self {
            Panel::Right => 'R',
            Panel::Left => 'L',
            Panel::Top => 'T',
            Panel::Bottom => 'B',
        }
    }

    /// Layout entry for this panel.
    #[must_use]
    pub fn layout(self) -> &'static PanelLayout {
        // PANELS is ordered like the enum.
        &PANELS[self as usize]
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Panel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "right" | "r" => Ok(Panel::Right),
            "left" | "l" => Ok(Panel::Left),
            "top" | "t" => Ok(Panel::Top),
            "bottom" | "b" => Ok(Panel::Bottom),
            _ => Err(Error::UnknownPanel(s.to_string())),
        }
    }
}

/// Geometric transform from (tube offset, pixel) to (row, col).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PanelOrientation {
    /// Tubes are rows, pixel axis reversed.
    MirrorColumns,
    /// Tube axis reversed, pixels are columns.
    MirrorRows,
    /// Pixels are rows, tubes are columns.
    Transpose,
    /// Transposed with both resulting axes reversed.
    TransposeMirrorBoth,
}

impl PanelOrientation {
    /// Whether rows run along the pixel axis.
    #[must_use]
    pub fn is_transposed(self) -> bool {
        matches!(
            self,
            PanelOrientation::Transpose | PanelOrientation::TransposeMirrorBoth
        )
    }

    /// Whether the row axis is reversed after any transpose.
    #[must_use]
    pub fn mirrors_rows(self) -> bool {
        matches!(
            self,
            PanelOrientation::MirrorRows | PanelOrientation::TransposeMirrorBoth
        )
    }

    /// Whether the column axis is reversed after any transpose.
    #[must_use]
    pub fn mirrors_columns(self) -> bool {
        matches!(
            self,
            PanelOrientation::MirrorColumns | PanelOrientation::TransposeMirrorBoth
        )
    }
}

/// Placement of one panel on the carriage tube axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    /// Which panel this is.
    pub panel: Panel,
    /// First tube id belonging to the panel.
    pub first_tube: usize,
    /// Transform into export orientation.
    pub orientation: PanelOrientation,
}

/// The four panels of a carriage, in [`Panel`] order.
pub const PANELS: [PanelLayout; 4] = [
    PanelLayout {
        panel: Panel::Right,
        first_tube: 0,
        orientation: PanelOrientation::MirrorColumns,
    },
    PanelLayout {
        panel: Panel::Left,
        first_tube: 144,
        orientation: PanelOrientation::MirrorRows,
    },
    PanelLayout {
        panel: Panel::Top,
        first_tube: 48,
        orientation: PanelOrientation::Transpose,
    },
    PanelLayout {
        panel: Panel::Bottom,
        first_tube: 96,
        orientation: PanelOrientation::TransposeMirrorBoth,
    },
];

impl PanelLayout {
    /// Tube ids covered by this panel.
    #[must_use]
    pub fn tubes(&self) -> std::ops::Range<usize> {
        self.first_tube..self.first_tube + TUBES_PER_PANEL
    }

    /// Whether `tube` belongs to this panel.
    #[inline]
    #[must_use]
    pub fn contains(&self, tube: usize) -> bool {
        self.tubes().contains(&tube)
    }

    /// Output image shape `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        if self.orientation.is_transposed() {
            (N_PIXELS, TUBES_PER_PANEL)
        } else {
            (TUBES_PER_PANEL, N_PIXELS)
        }
    }

    /// Maps a tube/pixel to `(row, col)` in this panel's image.
    ///
    /// Returns `None` if the tube is not part of this panel or the pixel is
    /// off the end of the tube.
    #[must_use]
    pub fn map(&self, tube: usize, pixel: usize) -> Option<(usize, usize)> {
        if !self.contains(tube) || pixel >= N_PIXELS {
            return None;
        }
        let offset = tube - self.first_tube;
        let (mut row, mut col) = if self.orientation.is_transposed() {
            (pixel, offset)
        } else {
            (offset, pixel)
        };
        let (rows, cols) = self.shape();
        if self.orientation.mirrors_rows() {
            row = rows - 1 - row;
        }
        if self.orientation.mirrors_columns() {
            col = cols - 1 - col;
        }
        Some((row, col))
    }
}

/// Finds the panel that holds `tube`.
///
/// # Errors
/// Returns [`Error::InvalidTube`] for tube ids past the carriage.
pub fn panel_for_tube(tube: u8) -> Result<&'static PanelLayout> {
    PANELS
        .iter()
        .find(|layout| layout.contains(usize::from(tube)))
        .ok_or(Error::InvalidTube(tube))
}

/// Places a tube/pixel on the carriage as `(panel, row, col)`.
///
/// # Errors
/// Returns an error if the tube or pixel is outside the carriage.
pub fn locate(tube: u8, pixel: u8) -> Result<(Panel, usize, usize)> {
    let layout = panel_for_tube(tube)?;
    let (row, col) = layout
        .map(usize::from(tube), usize::from(pixel))
        .ok_or(Error::InvalidPixel(pixel))?;
    Ok((layout.panel, row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panels_tile_carriage() {
        let mut covered = [0u8; N_TUBES];
        for layout in &PANELS {
            for tube in layout.tubes() {
                covered[tube] += 1;
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_layout_matches_enum_order() {
        for panel in [Panel::Right, Panel::Left, Panel::Top, Panel::Bottom] {
            assert_eq!(panel.layout().panel, panel);
        }
    }

    #[test]
    fn test_boundary_tubes() {
        // (tube, pixel) -> (panel, row, col)
        let cases = [
            ((0, 0), (Panel::Right, 0, 127)),
            ((47, 5), (Panel::Right, 47, 122)),
            ((48, 0), (Panel::Top, 0, 0)),
            ((95, 127), (Panel::Top, 127, 47)),
            ((96, 0), (Panel::Bottom, 127, 47)),
            ((143, 127), (Panel::Bottom, 0, 0)),
            ((144, 0), (Panel::Left, 47, 0)),
            ((191, 127), (Panel::Left, 0, 127)),
        ];
        for ((tube, pixel), expected) in cases {
            assert_eq!(locate(tube, pixel).unwrap(), expected, "tube {tube}");
        }
    }

    #[test]
    fn test_shapes() {
        assert_eq!(Panel::Right.layout().shape(), (48, 128));
        assert_eq!(Panel::Left.layout().shape(), (48, 128));
        assert_eq!(Panel::Top.layout().shape(), (128, 48));
        assert_eq!(Panel::Bottom.layout().shape(), (128, 48));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(locate(192, 0), Err(Error::InvalidTube(192)));
        assert_eq!(locate(0, 128), Err(Error::InvalidPixel(128)));
        assert!(Panel::Right.layout().map(48, 0).is_none());
    }

    #[test]
    fn test_panel_from_str() {
        assert_eq!("Right".parse::<Panel>().unwrap(), Panel::Right);
        assert_eq!("b".parse::<Panel>().unwrap(), Panel::Bottom);
        assert!(matches!(
            "front".parse::<Panel>(),
            Err(Error::UnknownPanel(_))
        ));
    }
}
