//! ClipFocus Render Engine
//!
//! Streams a landscape recording through per-frame reframing and encodes
//! the result, keeping the original audio.
//!
//! # Pipeline Architecture
//!
//! ```text
//! source.mp4 ── decode (rgb24) ──┐
//!                                ├── Detect point of interest
//!                                │          │
//!                                │          ├── Plan crop window
//!                                │          │          │
//!                                └──────────┴── Crop ──┘
//!                                                 │
//!                                                 ├── Highlight marker
//!                                                 ▼
//! source audio ──────────────────────────── Encode + mux
//!                                                 │
//!                                                 ▼
//!                                            output.mp4
//! ```

pub mod compositor;
pub mod ffmpeg;
pub mod media;
pub mod pipeline;

pub use compositor::apply_highlight;
pub use ffmpeg::FfmpegBackend;
pub use media::*;
pub use pipeline::*;
