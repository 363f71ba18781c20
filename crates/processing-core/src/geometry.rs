//! Crop geometry.
//!
//! Integer-only so that window sizes and placements are bit-for-bit
//! reproducible across runs and platforms.

use clipfocus_frame_model::aspect::AspectRatio;
use clipfocus_frame_model::window::{CropWindow, PixelPoint};

/// Largest window of `ratio` that fits inside a `source_w` x `source_h` frame
/// without upscaling.
///
/// When the ratio is no wider than the source, the window keeps the full
/// height and `width = round(height * ratio)`; otherwise it keeps the full
/// width and `height = round(width / ratio)`. Both sides are at least one
/// pixel and never exceed the source.
pub fn crop_dimensions(source_w: u32, source_h: u32, ratio: AspectRatio) -> (u32, u32) {
    let source_w = source_w.max(1);
    let source_h = source_h.max(1);
    let num = ratio.numerator() as u64;
    let den = ratio.denominator() as u64;

    // ratio <= source_w / source_h, compared without floats.
    if num * source_h as u64 <= den * source_w as u64 {
        let width = round_div(source_h as u64 * num, den) as u32;
        (width.clamp(1, source_w), source_h)
    } else {
        let height = round_div(source_w as u64 * den, num) as u32;
        (source_w, height.clamp(1, source_h))
    }
}

/// Top-left offset of a `w` x `h` window centered on `(cx, cy)`, shifted
/// (never shrunk) so it lies inside the frame.
///
/// Points outside the frame are allowed and pin the window to the nearest
/// edge. The window must not be larger than the frame.
pub fn clamp_window(cx: u32, cy: u32, w: u32, h: u32, frame_w: u32, frame_h: u32) -> (u32, u32) {
    (clamp_axis(cx, w, frame_w), clamp_axis(cy, h, frame_h))
}

/// Window of `size` centered on `point` and clamped to the frame.
pub fn window_at(point: PixelPoint, size: (u32, u32), frame: (u32, u32)) -> CropWindow {
    let (w, h) = size;
    let (x, y) = clamp_window(point.x, point.y, w, h, frame.0, frame.1);
    CropWindow::new(x, y, w, h)
}

fn clamp_axis(center: u32, extent: u32, frame_extent: u32) -> u32 {
    let max_offset = frame_extent.saturating_sub(extent) as i64;
    let start = center as i64 - (extent / 2) as i64;
    start.clamp(0, max_offset) as u32
}

/// `numerator / denominator` rounded half away from zero.
fn round_div(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_hd_vertical() {
        assert_eq!(crop_dimensions(1920, 1080, AspectRatio::Vertical), (608, 1080));
    }

    #[test]
    fn test_full_hd_all_ratios() {
        assert_eq!(crop_dimensions(1920, 1080, AspectRatio::Square), (1080, 1080));
        assert_eq!(crop_dimensions(1920, 1080, AspectRatio::Classic), (1440, 1080));
        assert_eq!(crop_dimensions(1920, 1080, AspectRatio::Widescreen), (1920, 1080));
        assert_eq!(crop_dimensions(1920, 1080, AspectRatio::Portrait), (810, 1080));
    }

    #[test]
    fn test_wider_ratio_than_source_keeps_width() {
        // Portrait source, landscape request.
        assert_eq!(crop_dimensions(1080, 1920, AspectRatio::Widescreen), (1080, 608));
        assert_eq!(crop_dimensions(1080, 1920, AspectRatio::Vertical), (1080, 1920));
    }

    #[test]
    fn test_degenerate_sources_stay_positive() {
        assert_eq!(crop_dimensions(1, 1000, AspectRatio::Widescreen), (1, 1));
        assert_eq!(crop_dimensions(1000, 1, AspectRatio::Vertical), (1, 1));
    }

    #[test]
    fn test_clamp_window_center() {
        assert_eq!(clamp_window(960, 540, 608, 1080, 1920, 1080), (656, 0));
    }

    #[test]
    fn test_clamp_window_corners() {
        assert_eq!(clamp_window(0, 0, 608, 1080, 1920, 1080), (0, 0));
        assert_eq!(clamp_window(1919, 1079, 608, 1080, 1920, 1080), (1312, 0));
        assert_eq!(clamp_window(0, 0, 100, 100, 400, 300), (0, 0));
        assert_eq!(clamp_window(399, 299, 100, 100, 400, 300), (300, 200));
    }

    #[test]
    fn test_clamp_window_point_outside_frame() {
        assert_eq!(clamp_window(5000, 5000, 100, 100, 400, 300), (300, 200));
    }

    #[test]
    fn test_window_at() {
        let window = window_at(PixelPoint::new(1900, 10), (608, 1080), (1920, 1080));
        assert_eq!(window, CropWindow::new(1312, 0, 608, 1080));
    }

    fn any_ratio() -> impl Strategy<Value = AspectRatio> {
        prop::sample::select(AspectRatio::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_crop_dimensions_fit_and_match_ratio(
            source_w in 1u32..4096,
            source_h in 1u32..4096,
            ratio in any_ratio(),
        ) {
            let (w, h) = crop_dimensions(source_w, source_h, ratio);
            prop_assert!(w >= 1 && h >= 1);
            prop_assert!(w <= source_w && h <= source_h);

            // One side is the full source side; the other is within one pixel
            // of the exact ratio.
            let r = ratio.value();
            if h == source_h {
                prop_assert!((w as f64 - h as f64 * r).abs() <= 1.0);
            } else {
                prop_assert_eq!(w, source_w);
                prop_assert!((h as f64 - w as f64 / r).abs() <= 1.0);
            }
        }

        #[test]
        fn prop_clamped_window_stays_in_bounds(
            frame_w in 1u32..4096,
            frame_h in 1u32..4096,
            ratio in any_ratio(),
            fx in 0.0f64..=1.0,
            fy in 0.0f64..=1.0,
        ) {
            let (w, h) = crop_dimensions(frame_w, frame_h, ratio);
            let cx = ((frame_w - 1) as f64 * fx).round() as u32;
            let cy = ((frame_h - 1) as f64 * fy).round() as u32;

            let window = window_at(PixelPoint::new(cx, cy), (w, h), (frame_w, frame_h));
            prop_assert!(window.fits_within(frame_w, frame_h));
            prop_assert_eq!(window.size(), (w, h));
            prop_assert!(window.contains(PixelPoint::new(cx, cy)));
        }

        #[test]
        fn prop_exact_corners_stay_in_bounds(
            frame_w in 1u32..4096,
            frame_h in 1u32..4096,
            ratio in any_ratio(),
            corner in 0usize..4,
        ) {
            let (w, h) = crop_dimensions(frame_w, frame_h, ratio);
            let (cx, cy) = match corner {
                0 => (0, 0),
                1 => (frame_w - 1, 0),
                2 => (0, frame_h - 1),
                _ => (frame_w - 1, frame_h - 1),
            };
            let (x, y) = clamp_window(cx, cy, w, h, frame_w, frame_h);
            prop_assert!(x + w <= frame_w);
            prop_assert!(y + h <= frame_h);
        }
    }
}
