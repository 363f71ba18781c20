//! Point-of-interest detection.
//!
//! The default detector assumes the thing worth following (usually a mouse
//! cursor in a screen recording) is the largest patch of near-white pixels.
//! Scenes that are bright overall will produce large spurious regions; that
//! is a known limitation of the heuristic, not something this module tries
//! to correct for.

use clipfocus_frame_model::frame::Frame;
use clipfocus_frame_model::settings::DetectorConfig;
use clipfocus_frame_model::window::{PixelPoint, PointOfInterest};
use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

/// Locates a single point of interest in a frame.
pub trait PointDetector: Send + Sync {
    /// Returns `None` when nothing qualifies. A miss is not an error.
    fn detect(&self, frame: &Frame) -> PointOfInterest;
}

/// A connected region of bright pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightRegion {
    /// Pixel count.
    pub area: u32,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    /// Raster index (`y * width + x`) of the region's first pixel.
    pub first_pixel: u64,
}

impl BrightRegion {
    fn start(x: u32, y: u32, first_pixel: u64) -> Self {
        Self {
            area: 1,
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            first_pixel,
        }
    }

    fn extend(&mut self, x: u32, y: u32) {
        self.area += 1;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Bounding-box width.
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Bounding-box height.
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Center of the bounding box, rounded toward the top-left.
    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(
            self.min_x + self.width() / 2,
            self.min_y + self.height() / 2,
        )
    }
}

/// Thresholds luma and follows the largest bright region.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrightRegionDetector {
    config: DetectorConfig,
}

impl BrightRegionDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// All 8-connected bright regions, ordered by first pixel in raster order.
    pub fn regions(&self, frame: &Frame) -> Vec<BrightRegion> {
        let (width, height) = frame.dimensions();
        let luma = image::imageops::grayscale(&frame.image);
        let threshold = self.config.brightness_threshold;

        let mut any_bright = false;
        let mask = GrayImage::from_fn(width, height, |x, y| {
            if luma.get_pixel(x, y)[0] > threshold {
                any_bright = true;
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        if !any_bright {
            return Vec::new();
        }

        let labels = connected_components(&mask, Connectivity::Eight, Luma([0u8]));

        let mut by_label: Vec<Option<BrightRegion>> = Vec::new();
        for (x, y, label) in labels.enumerate_pixels() {
            let label = label[0] as usize;
            if label == 0 {
                continue;
            }
            if label >= by_label.len() {
                by_label.resize(label + 1, None);
            }
            if let Some(region) = &mut by_label[label] {
                region.extend(x, y);
            } else {
                let first_pixel = y as u64 * width as u64 + x as u64;
                by_label[label] = Some(BrightRegion::start(x, y, first_pixel));
            }
        }

        let mut regions: Vec<BrightRegion> = by_label.into_iter().flatten().collect();
        regions.sort_by_key(|region| region.first_pixel);
        regions
    }

    /// The region that drives detection: largest area, earliest in scan
    /// order on ties, and at least `min_area` pixels.
    pub fn dominant_region(&self, frame: &Frame) -> Option<BrightRegion> {
        self.regions(frame)
            .into_iter()
            .filter(|region| region.area >= self.config.min_area)
            .fold(None, |best: Option<BrightRegion>, region| match best {
                Some(current) if current.area >= region.area => Some(current),
                _ => Some(region),
            })
    }
}

impl PointDetector for BrightRegionDetector {
    fn detect(&self, frame: &Frame) -> PointOfInterest {
        let region = self.dominant_region(frame)?;
        tracing::trace!(
            frame = frame.index,
            area = region.area,
            x = region.center().x,
            y = region.center().y,
            "Bright region detected"
        );
        Some(region.center())
    }
}
