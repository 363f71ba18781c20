//! Crop window planning.
//!
//! Turns per-frame detections into a fixed-size crop window. The window size
//! is decided once from the first frame; afterwards only its offset moves.
//! When detection misses, the window freezes at the last tracked point (or
//! the frame center if nothing has been tracked yet) instead of jumping.

use clipfocus_frame_model::aspect::AspectRatio;
use clipfocus_frame_model::frame::Frame;
use clipfocus_frame_model::window::{CropWindow, PixelPoint, PointOfInterest};

use crate::detector::PointDetector;
use crate::geometry::{crop_dimensions, window_at};

/// How a window placement was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanOutcome {
    /// Centered on this frame's detection.
    Tracked,
    /// Detection missed; reused the last tracked point.
    Held,
    /// Detection missed and nothing tracked yet; frame center.
    Centered,
}

/// The planner's decision for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedWindow {
    /// Where to crop.
    pub window: CropWindow,

    /// This frame's detection in source coordinates, if any.
    pub point: PointOfInterest,

    /// Which rule produced the window.
    pub outcome: PlanOutcome,
}

/// Stateful crop planner for one run.
#[derive(Debug, Clone)]
pub struct CropPlanner {
    frame_width: u32,
    frame_height: u32,
    window_width: u32,
    window_height: u32,
    last_known_point: Option<PixelPoint>,
}

impl CropPlanner {
    /// Fix the window size for a run from the first frame's dimensions.
    pub fn new(frame_width: u32, frame_height: u32, ratio: AspectRatio) -> Self {
        let (window_width, window_height) = crop_dimensions(frame_width, frame_height, ratio);
        tracing::debug!(
            frame_width,
            frame_height,
            window_width,
            window_height,
            ratio = %ratio,
            "Crop window size fixed"
        );
        Self {
            frame_width,
            frame_height,
            window_width,
            window_height,
            last_known_point: None,
        }
    }

    /// Fixed window size for the run.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// The most recent successful detection.
    pub fn last_known_point(&self) -> Option<PixelPoint> {
        self.last_known_point
    }

    /// Detect on the full frame, then place the window.
    pub fn plan(&mut self, frame: &Frame, detector: &dyn PointDetector) -> PlannedWindow {
        let point = detector.detect(frame);
        self.plan_point(point)
    }

    /// Place the window for a detection result.
    pub fn plan_point(&mut self, point: PointOfInterest) -> PlannedWindow {
        let (anchor, outcome) = match (point, self.last_known_point) {
            (Some(found), _) => {
                self.last_known_point = Some(found);
                (found, PlanOutcome::Tracked)
            }
            (None, Some(last)) => (last, PlanOutcome::Held),
            (None, None) => (
                PixelPoint::new(self.frame_width / 2, self.frame_height / 2),
                PlanOutcome::Centered,
            ),
        };

        let window = window_at(
            anchor,
            self.window_size(),
            (self.frame_width, self.frame_height),
        );

        PlannedWindow {
            window,
            point,
            outcome,
        }
    }
}
