//! ClipFocus Frame Model
//!
//! Defines the core data contracts shared by the reframing pipeline:
//! - **Frames:** RGB pixel buffers with index and timestamp, plus video metadata
//! - **Aspect ratios:** the closed set of supported output shapes
//! - **Windows:** pixel-space crop windows and points of interest
//! - **Style & settings:** highlight marker styling and per-run configuration
//!
//! All coordinates are integer pixels in the source frame unless a type says
//! otherwise.

pub mod aspect;
pub mod frame;
pub mod settings;
pub mod style;
pub mod window;

pub use aspect::*;
pub use frame::*;
pub use settings::*;
pub use style::*;
pub use window::*;
