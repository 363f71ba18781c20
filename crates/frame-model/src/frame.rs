//! Decoded video frames and source metadata.

use std::path::PathBuf;

use clipfocus_common::clock::FrameClock;
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::window::CropWindow;

/// A single decoded RGB frame.
///
/// Stages never mutate a frame they received by reference; transformations
/// return a new `Frame` that keeps the original index and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Zero-based position in the source sequence.
    pub index: u64,

    /// Presentation timestamp in nanoseconds.
    pub timestamp_ns: u64,

    /// Pixel data.
    pub image: RgbImage,
}

impl Frame {
    pub fn new(index: u64, timestamp_ns: u64, image: RgbImage) -> Self {
        Self {
            index,
            timestamp_ns,
            image,
        }
    }

    /// Build a frame from tightly packed RGB24 bytes.
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn from_rgb24(
        index: u64,
        timestamp_ns: u64,
        width: u32,
        height: u32,
        bytes: Vec<u8>,
    ) -> Option<Self> {
        RgbImage::from_raw(width, height, bytes).map(|image| Self::new(index, timestamp_ns, image))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Packed RGB24 bytes, row-major.
    pub fn as_rgb24(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Copy out the region covered by `window`.
    ///
    /// The window must lie inside the frame; callers get it from the planner,
    /// which guarantees that.
    pub fn cropped(&self, window: &CropWindow) -> Frame {
        let image = image::imageops::crop_imm(
            &self.image,
            window.x,
            window.y,
            window.width,
            window.height,
        )
        .to_image();
        Frame::new(self.index, self.timestamp_ns, image)
    }

    /// Bytes needed for one RGB24 frame of the given size.
    pub fn rgb24_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }
}

/// Opaque reference to the audio track of the source video.
///
/// The pipeline never inspects audio; the sink re-reads it from the source
/// container and copies it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTrackRef {
    /// Container that holds the audio stream.
    pub container: PathBuf,
}

/// Metadata read once from the source at Initializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,

    /// Number of frames reported by the container (may be estimated).
    pub frame_count: u64,

    /// Source frame rate.
    pub frame_rate: FrameClock,

    /// Duration in seconds.
    pub duration_secs: f64,

    /// Audio track to carry over, if the source has one.
    pub audio: Option<AudioTrackRef>,
}

impl VideoInfo {
    pub fn has_audio_track(&self) -> bool {
        self.audio.is_some()
    }
}
