//! Grid tile sizing and wrap-around math.
//!
//! The background grid is one finite tile. It is sized to exceed the visible
//! area at the current zoom and teleported by whole pattern periods so it
//! never runs out under the viewport.

/// Minor grid cells per major ("ruler") cell.
pub const CELLS_PER_PERIOD: f32 = 8.0;

/// Spare major cells added on top of the visible extent.
pub const MARGIN_PERIODS: f32 = 2.0;

/// Distance over which the tile's line pattern repeats identically.
pub fn period(span: f32) -> f32 {
    span * CELLS_PER_PERIOD
}

/// Canvas-space length visible across `canvas_dimension` screen pixels.
///
/// Equals `canvas_dimension / zoom`.
pub fn effective_dimension(canvas_dimension: f32, zoom: f32) -> f32 {
    (1.0 + (1.0 - zoom) / zoom) * canvas_dimension
}

/// Tile width or height for one canvas dimension.
///
/// Rounded up to whole periods plus [`MARGIN_PERIODS`].
pub fn tile_extent(canvas_dimension: f32, zoom: f32, span: f32) -> f32 {
    let effective = effective_dimension(canvas_dimension, zoom);
    ((effective / span / CELLS_PER_PERIOD).ceil() + MARGIN_PERIODS) * period(span)
}

/// Keep a tile edge offset inside `(-2 * period, 0)`.
///
/// Offsets already inside the band are returned untouched. Anything that
/// reaches either bound is shifted by whole periods into `[-period, 0)`,
/// which leaves the drawn pattern exactly where it was.
pub fn wrap_offset(offset: f32, period: f32) -> f32 {
    if offset < 0.0 && offset > -2.0 * period {
        return offset;
    }
    -period + (offset + period).rem_euclid(period)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPAN: f32 = 16.0;

    #[test]
    fn extent_at_unit_zoom() {
        // 800 / 128 = 6.25 -> 7 periods + 2 margin
        assert_eq!(tile_extent(800.0, 1.0, SPAN), 9.0 * 128.0);
        // 600 / 128 = 4.69 -> 5 + 2
        assert_eq!(tile_extent(600.0, 1.0, SPAN), 7.0 * 128.0);
    }

    #[test]
    fn extent_shrinks_when_zoomed_in() {
        assert!(tile_extent(800.0, 2.0, SPAN) < tile_extent(800.0, 1.0, SPAN));
        assert!(tile_extent(800.0, 0.5, SPAN) > tile_extent(800.0, 1.0, SPAN));
        // 400 / 128 = 3.125 -> 4 + 2
        assert_eq!(tile_extent(800.0, 2.0, SPAN), 6.0 * 128.0);
    }

    #[test]
    fn effective_dimension_is_inverse_zoom() {
        for zoom in [0.5_f32, 0.8, 1.0, 1.25, 2.0] {
            let eff = effective_dimension(1000.0, zoom);
            assert!((eff - 1000.0 / zoom).abs() < 1e-2, "zoom {zoom}: {eff}");
        }
    }

    #[test]
    fn extent_always_covers_with_margin() {
        let mut zoom = 0.5_f32;
        while zoom <= 2.0 {
            for dim in [1.0_f32, 127.0, 128.0, 640.0, 1333.0, 2560.0] {
                let extent = tile_extent(dim, zoom, SPAN);
                assert!(extent >= effective_dimension(dim, zoom) + 2.0 * period(SPAN) - 1e-3);
                assert_eq!((extent / period(SPAN)).fract(), 0.0);
            }
            zoom += 0.01;
        }
    }

    #[test]
    fn offsets_inside_band_are_untouched() {
        assert_eq!(wrap_offset(-1.0, 128.0), -1.0);
        assert_eq!(wrap_offset(-255.0, 128.0), -255.0);
    }

    #[test]
    fn offsets_at_bounds_jump_by_whole_periods() {
        assert_eq!(wrap_offset(0.0, 128.0), -128.0);
        assert_eq!(wrap_offset(5.0, 128.0), -123.0);
        assert_eq!(wrap_offset(-256.0, 128.0), -128.0);
        assert_eq!(wrap_offset(-300.0, 128.0), -44.0);
        // a fling across several periods still lands on the same phase
        let wrapped = wrap_offset(1000.0, 128.0);
        assert_eq!((1000.0 - wrapped) % 128.0, 0.0);
        assert!(wrapped < 0.0 && wrapped >= -128.0);
    }
}
