//! Highlight compositor: marks the point of interest on an output frame.

use clipfocus_frame_model::frame::Frame;
use clipfocus_frame_model::style::{HighlightStyle, MarkerShape};
use clipfocus_frame_model::window::PixelPoint;
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;

/// Blend the highlight marker onto a copy of `frame`.
///
/// `point` is in the frame's own coordinates. With no point the copy is
/// returned untouched. Marker pixels that fall outside the frame are skipped.
pub fn apply_highlight(frame: &Frame, point: Option<PixelPoint>, style: &HighlightStyle) -> Frame {
    let mut out = frame.clone();
    let Some(point) = point else {
        return out;
    };

    let opacity = if style.opacity.is_nan() {
        0.0
    } else {
        style.opacity.clamp(0.0, 1.0)
    };
    if opacity == 0.0 || style.radius == 0 {
        return out;
    }

    let mask = marker_mask(style);
    let radius = style.radius as i64;
    let (width, height) = out.dimensions();
    let color = style.color.channels();

    for (mx, my, covered) in mask.enumerate_pixels() {
        if covered[0] == 0 {
            continue;
        }
        let x = point.x as i64 + mx as i64 - radius;
        let y = point.y as i64 + my as i64 - radius;
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            continue;
        }
        let pixel = out.image.get_pixel_mut(x as u32, y as u32);
        for (channel, marker) in pixel.0.iter_mut().zip(color) {
            *channel = blend(marker, *channel, opacity);
        }
    }

    out
}

/// Coverage mask of side `2 * radius + 1`, centered at `(radius, radius)`.
fn marker_mask(style: &HighlightStyle) -> GrayImage {
    let side = style.radius * 2 + 1;
    let center = (style.radius as i32, style.radius as i32);
    let mut mask = GrayImage::new(side, side);
    draw_filled_circle_mut(&mut mask, center, style.radius as i32, Luma([255u8]));

    if let MarkerShape::Ring { thickness } = style.shape {
        let inner = style.radius.saturating_sub(thickness);
        if inner > 0 {
            draw_filled_circle_mut(&mut mask, center, inner as i32, Luma([0u8]));
        }
    }
    mask
}

fn blend(marker: u8, base: u8, opacity: f32) -> u8 {
    let value = opacity * marker as f32 + (1.0 - opacity) * base as f32;
    value.round().clamp(0.0, 255.0) as u8
}
