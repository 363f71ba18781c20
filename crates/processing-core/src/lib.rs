//! ClipFocus Processing Core
//!
//! Per-frame decisions for reframing a landscape recording:
//! - **Detection:** find the point of interest (largest bright region)
//! - **Geometry:** size a crop window for a target aspect ratio and clamp it
//!   to the frame
//! - **Planning:** place one fixed-size window per frame, holding the last
//!   placement when detection misses
//!
//! This crate is pure computation. Frames come in, windows come out.

pub mod detector;
pub mod geometry;
pub mod planner;

pub use detector::{BrightRegion, BrightRegionDetector, PointDetector};
pub use geometry::{clamp_window, crop_dimensions, window_at};
pub use planner::{CropPlanner, PlanOutcome, PlannedWindow};
