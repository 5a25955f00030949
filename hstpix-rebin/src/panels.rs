//! Panel decomposition of the tube axis.

use hstpix_core::PanelLayout;
use ndarray::{s, ArrayView3, Axis};

/// Cuts one panel out of a `(tube, pixel, bin)` volume and orients it.
///
/// The returned view is indexed `(row, col, bin)` and follows
/// [`PanelLayout::map`] exactly; no data is copied.
#[must_use]
pub fn panel_view<'a>(volume: ArrayView3<'a, u64>, layout: &PanelLayout) -> ArrayView3<'a, u64> {
    let mut view = volume.slice_move(s![layout.tubes(), .., ..]);
    if layout.orientation.is_transposed() {
        view = view.permuted_axes([1, 0, 2]);
    }
    if layout.orientation.mirrors_rows() {
        view.invert_axis(Axis(0));
    }
    if layout.orientation.mirrors_columns() {
        view.invert_axis(Axis(1));
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use hstpix_core::{N_PIXELS, N_TUBES, PANELS};
    use ndarray::Array3;

    #[test]
    fn test_view_agrees_with_point_map() {
        // Tag every (tube, pixel) cell with a unique value.
        let volume = Array3::from_shape_fn((N_TUBES, N_PIXELS, 1), |(t, p, _)| {
            (t * N_PIXELS + p) as u64
        });

        for layout in &PANELS {
            let view = panel_view(volume.view(), layout);
            let (rows, cols) = layout.shape();
            assert_eq!(view.dim(), (rows, cols, 1), "{}", layout.panel);

            for tube in layout.tubes() {
                for pixel in 0..N_PIXELS {
                    let (row, col) = layout.map(tube, pixel).unwrap();
                    assert_eq!(
                        view[[row, col, 0]],
                        (tube * N_PIXELS + pixel) as u64,
                        "{} tube {tube} pixel {pixel}",
                        layout.panel
                    );
                }
            }
        }
    }
}
