//! Decode and encode boundaries.
//!
//! The pipeline only talks to these traits. [`crate::ffmpeg::FfmpegBackend`]
//! is the production implementation; tests plug in in-memory ones.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use clipfocus_common::clock::FrameClock;
use clipfocus_common::error::ClipfocusResult;
use clipfocus_frame_model::frame::{AudioTrackRef, Frame, VideoInfo};

/// Sequential reader of decoded frames.
#[async_trait]
pub trait FrameSource: Send {
    /// Metadata probed when the source was opened.
    fn info(&self) -> &VideoInfo;

    /// Next frame in presentation order. `Ok(None)` is end of stream.
    async fn next_frame(&mut self) -> ClipfocusResult<Option<Frame>>;

    /// Release decoder resources. Safe to call more than once.
    async fn close(&mut self) -> ClipfocusResult<()>;
}

/// Sequential writer of output frames.
#[async_trait]
pub trait FrameSink: Send {
    /// Encode one frame. Frames must arrive in order and share one size.
    async fn write_frame(&mut self, frame: Frame) -> ClipfocusResult<()>;

    /// Flush, mux the source audio and move the result into place.
    async fn finalize(&mut self) -> ClipfocusResult<PathBuf>;

    /// Stop encoding and remove any partial output.
    async fn abort(&mut self) -> ClipfocusResult<()>;
}

/// Parameters for opening a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkSpec {
    /// Final output location.
    pub path: PathBuf,

    /// Output frame rate (same as the source).
    pub frame_rate: FrameClock,

    /// Output frame width.
    pub width: u32,

    /// Output frame height.
    pub height: u32,

    /// Audio to copy from the source, if any.
    pub audio: Option<AudioTrackRef>,
}

/// Factory for sources and sinks.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Open and probe an input video.
    async fn open_source(&self, path: &Path) -> ClipfocusResult<Box<dyn FrameSource>>;

    /// Start an encoder for the output video.
    async fn open_sink(&self, spec: SinkSpec) -> ClipfocusResult<Box<dyn FrameSink>>;

    /// Check if this backend can run on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}
