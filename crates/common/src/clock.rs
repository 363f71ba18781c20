//! Frame timing utilities.
//!
//! Frame rates are kept as rationals (`30000/1001`) so timestamps computed
//! from frame indices do not accumulate rounding drift over long videos.

use serde::{Deserialize, Serialize};

const NS_PER_SEC: u128 = 1_000_000_000;

/// A rational frame rate that maps frame indices to presentation timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameClock {
    /// Frames per `den` seconds.
    pub num: u32,
    /// Seconds per `num` frames.
    pub den: u32,
}

impl FrameClock {
    /// Create a clock, rejecting zero components.
    pub fn new(num: u32, den: u32) -> Option<Self> {
        if num == 0 || den == 0 {
            return None;
        }
        Some(Self { num, den })
    }

    /// Parse an ffprobe-style rate such as `"30000/1001"` or `"25"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.split_once('/') {
            Some((num, den)) => Self::new(num.trim().parse().ok()?, den.trim().parse().ok()?),
            None => Self::new(raw.parse().ok()?, 1),
        }
    }

    /// Frames per second as a float.
    pub fn fps(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Presentation timestamp of a frame in nanoseconds.
    pub fn timestamp_ns(&self, frame_index: u64) -> u64 {
        (frame_index as u128 * self.den as u128 * NS_PER_SEC / self.num as u128) as u64
    }

    /// Number of whole frames covering a duration, rounded to nearest.
    pub fn frames_in(&self, duration_secs: f64) -> u64 {
        if duration_secs <= 0.0 {
            return 0;
        }
        (duration_secs * self.fps()).round() as u64
    }

    /// Rate formatted for ffmpeg arguments (`num/den`).
    pub fn as_ffmpeg_arg(&self) -> String {
        format!("{}/{}", self.num, self.den)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

impl std::fmt::Display for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{:.3}", self.fps())
        }
    }
}
