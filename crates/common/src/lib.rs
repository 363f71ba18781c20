//! ClipFocus Common Utilities
//!
//! Shared infrastructure for all ClipFocus crates:
//! - Error taxonomy and result aliases
//! - Frame clock for converting frame indices to timestamps
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
