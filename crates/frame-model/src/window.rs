//! Crop window and point types for reframing.
//!
//! Unlike normalized viewports, crop windows are integer pixel rectangles
//! so that every output frame of a run has exactly the same size.

use serde::{Deserialize, Serialize};

/// A rectangular crop region within a source frame, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropWindow {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl CropWindow {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Top-left offset.
    pub fn offset(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// Width and height.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Center point (rounded down).
    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Check if a pixel lies inside this window.
    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether the window lies fully inside a `frame_w` x `frame_h` frame.
    pub fn fits_within(&self, frame_w: u32, frame_h: u32) -> bool {
        self.width > 0 && self.height > 0 && self.right() <= frame_w && self.bottom() <= frame_h
    }

    /// Convert a frame-space point to window-local coordinates.
    /// Returns `None` if the point is outside the window.
    pub fn to_local(&self, point: PixelPoint) -> Option<PixelPoint> {
        if !self.contains(point) {
            return None;
        }
        Some(PixelPoint::new(point.x - self.x, point.y - self.y))
    }
}

/// A pixel coordinate in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

impl PixelPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// The tracked location in a frame, or `None` when detection found nothing.
pub type PointOfInterest = Option<PixelPoint>;
