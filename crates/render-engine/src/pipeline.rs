//! Reframing pipeline: decode, detect, crop, highlight, encode.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clipfocus_common::error::{ClipfocusError, ClipfocusResult};
use clipfocus_frame_model::frame::{Frame, VideoInfo};
use clipfocus_frame_model::settings::{ReframeConfig, ReframeSettings};
use clipfocus_processing_core::detector::{BrightRegionDetector, PointDetector};
use clipfocus_processing_core::planner::{CropPlanner, PlanOutcome};
use serde::Serialize;

use crate::compositor::apply_highlight;
use crate::media::{FrameSink, FrameSource, MediaBackend, SinkSpec};

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Initializing,
    Streaming,
    Finalizing,
    Failed,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::Initializing => "Initializing",
            Self::Streaming => "Streaming",
            Self::Finalizing => "Finalizing",
            Self::Failed => "Failed",
            Self::Done => "Done",
        };
        f.write_str(name)
    }
}

/// Progress report for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineProgress {
    /// Fraction complete in [0.0, 1.0]. Exactly 1.0 only once the run is done.
    pub progress: f64,

    /// Frames written to the sink so far.
    pub frames_emitted: u64,

    /// Frame count reported by the source (may be an estimate).
    pub total_frames: u64,

    /// State at the time of the report.
    pub state: PipelineState,
}

/// Progress callback for a run.
///
/// Called once per emitted frame except the last, whose report is the single
/// `1.0` sent after the output is finalized. A run that fails while
/// finalizing has therefore reported `frames_emitted - 1` frames.
pub type ProgressCallback = Box<dyn Fn(PipelineProgress) + Send + Sync>;

/// Shared cancellation switch, checked between frames.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Final output file.
    pub output_path: PathBuf,

    /// Frames written (equals frames read).
    pub frames_emitted: u64,

    pub window_width: u32,
    pub window_height: u32,

    /// Top-left offset of the crop window for every frame, in order.
    pub placements: Vec<(u32, u32)>,

    /// Frames placed on a fresh detection.
    pub tracked: u64,
    /// Frames that reused the last tracked point.
    pub held: u64,
    /// Frames centered because nothing had been tracked yet.
    pub centered: u64,

    /// Wall time of the run.
    pub elapsed_secs: f64,
}

/// A failed run: the state it failed in and why.
#[derive(Debug, thiserror::Error)]
#[error("{state} failed: {cause}")]
pub struct PipelineFailure {
    pub state: PipelineState,
    #[source]
    pub cause: ClipfocusError,
}

/// Drives one source video through detection, cropping and highlighting.
pub struct ReframePipeline {
    settings: ReframeSettings,
    backend: Arc<dyn MediaBackend>,
    detector: Option<Arc<dyn PointDetector>>,
    state: PipelineState,
}

impl ReframePipeline {
    pub fn new(settings: ReframeSettings, backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            settings,
            backend,
            detector: None,
            state: PipelineState::Idle,
        }
    }

    /// Replace the bright-region detector built from the settings.
    pub fn with_detector(mut self, detector: Arc<dyn PointDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Reframe `input` into `output`.
    ///
    /// On failure nothing is left at `output`; the returned error names the
    /// state that failed.
    pub async fn run(
        &mut self,
        input: &Path,
        output: &Path,
        progress: Option<ProgressCallback>,
        cancel: &CancelFlag,
    ) -> Result<RunSummary, PipelineFailure> {
        let started = Instant::now();
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            backend = self.backend.name(),
            "Starting reframe"
        );

        self.transition(PipelineState::Initializing);
        let config = ReframeConfig::from_settings(&self.settings).map_err(|e| self.fail(e))?;
        let detector: Arc<dyn PointDetector> = match &self.detector {
            Some(detector) => Arc::clone(detector),
            None => Arc::new(BrightRegionDetector::new(config.detector)),
        };

        let mut source = bounded(config.io_timeout, self.backend.open_source(input), || {
            ClipfocusError::source_unreadable("Timed out opening source")
        })
        .await
        .map_err(|e| self.fail(e))?;

        let opened = self.open_output(source.as_mut(), &config, output).await;
        let (first, mut planner, mut sink) = match opened {
            Ok(parts) => parts,
            Err(cause) => {
                close_source(source.as_mut()).await;
                return Err(self.fail(cause));
            }
        };

        self.transition(PipelineState::Streaming);
        let mut run = StreamRun {
            info: source.info().clone(),
            config,
            detector,
            summary: RunSummary {
                output_path: output.to_path_buf(),
                frames_emitted: 0,
                window_width: planner.window_size().0,
                window_height: planner.window_size().1,
                placements: Vec::new(),
                tracked: 0,
                held: 0,
                centered: 0,
                elapsed_secs: 0.0,
            },
        };

        let streamed = run
            .stream(first, source.as_mut(), sink.as_mut(), &mut planner, &progress, cancel)
            .await;
        close_source(source.as_mut()).await;
        if let Err(cause) = streamed {
            abort_sink(sink.as_mut()).await;
            return Err(self.fail(cause));
        }

        self.transition(PipelineState::Finalizing);
        let finalized = bounded(config.io_timeout, sink.finalize(), || {
            ClipfocusError::sink_finalize("Timed out finalizing output")
        })
        .await;
        let output_path = match finalized {
            Ok(path) => path,
            Err(cause) => {
                abort_sink(sink.as_mut()).await;
                return Err(self.fail(cause));
            }
        };

        self.transition(PipelineState::Done);
        let mut summary = run.summary;
        summary.output_path = output_path;
        summary.elapsed_secs = started.elapsed().as_secs_f64();

        if let Some(cb) = &progress {
            cb(PipelineProgress {
                progress: 1.0,
                frames_emitted: summary.frames_emitted,
                total_frames: run.info.frame_count,
                state: PipelineState::Done,
            });
        }

        tracing::info!(
            frames = summary.frames_emitted,
            tracked = summary.tracked,
            held = summary.held,
            centered = summary.centered,
            elapsed_secs = summary.elapsed_secs,
            output = %summary.output_path.display(),
            "Reframe finished"
        );
        Ok(summary)
    }

    /// Render a single output frame without encoding anything.
    ///
    /// Frames before `frame_index` are still planned so that a held window
    /// matches what a full run would produce. Does not change [`Self::state`].
    pub async fn preview(&self, input: &Path, frame_index: u64) -> ClipfocusResult<Frame> {
        let config = ReframeConfig::from_settings(&self.settings)?;
        let detector: Arc<dyn PointDetector> = match &self.detector {
            Some(detector) => Arc::clone(detector),
            None => Arc::new(BrightRegionDetector::new(config.detector)),
        };

        let mut source = bounded(config.io_timeout, self.backend.open_source(input), || {
            ClipfocusError::source_unreadable("Timed out opening source")
        })
        .await?;
        let rendered = render_nth(source.as_mut(), config, detector, frame_index).await;
        close_source(source.as_mut()).await;
        rendered
    }

    /// Read the first frame, fix the window size, and open the sink.
    async fn open_output(
        &self,
        source: &mut dyn FrameSource,
        config: &ReframeConfig,
        output: &Path,
    ) -> ClipfocusResult<(Frame, CropPlanner, Box<dyn FrameSink>)> {
        let first = read_frame(source, config.io_timeout)
            .await?
            .ok_or_else(|| ClipfocusError::source_unreadable("Source contains no frames"))?;

        let (frame_w, frame_h) = first.dimensions();
        let planner = CropPlanner::new(frame_w, frame_h, config.aspect_ratio);
        let (width, height) = planner.window_size();

        let info = source.info();
        let spec = SinkSpec {
            path: output.to_path_buf(),
            frame_rate: info.frame_rate,
            width,
            height,
            audio: info.audio.clone(),
        };
        let sink = bounded(config.io_timeout, self.backend.open_sink(spec), || {
            ClipfocusError::sink_open("Timed out opening output")
        })
        .await?;

        Ok((first, planner, sink))
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!(from = %self.state, to = %next, "Pipeline state change");
        self.state = next;
    }

    fn fail(&mut self, cause: ClipfocusError) -> PipelineFailure {
        let state = self.state;
        tracing::error!(state = %state, kind = cause.kind(), error = %cause, "Reframe failed");
        self.state = PipelineState::Failed;
        PipelineFailure { state, cause }
    }
}

/// Per-run streaming state.
struct StreamRun {
    info: VideoInfo,
    config: ReframeConfig,
    detector: Arc<dyn PointDetector>,
    summary: RunSummary,
}

impl StreamRun {
    async fn stream(
        &mut self,
        first: Frame,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
        planner: &mut CropPlanner,
        progress: &Option<ProgressCallback>,
        cancel: &CancelFlag,
    ) -> ClipfocusResult<()> {
        let expected_size = first.dimensions();
        let total = self.info.frame_count;
        let mut current = first;

        loop {
            if cancel.is_cancelled() {
                tracing::info!(frames = self.summary.frames_emitted, "Cancellation requested");
                return Err(ClipfocusError::CancellationRequested);
            }

            // One frame of lookahead tells us whether `current` is the last.
            let next = read_frame(source, self.config.io_timeout).await?;
            if let Some(frame) = &next {
                if frame.dimensions() != expected_size {
                    return Err(ClipfocusError::source_unreadable(format!(
                        "Frame {} is {}x{}, expected {}x{}",
                        frame.index,
                        frame.width(),
                        frame.height(),
                        expected_size.0,
                        expected_size.1
                    )));
                }
            }

            let output = self.process(&current, planner);
            bounded(self.config.io_timeout, sink.write_frame(output), || {
                ClipfocusError::sink_write(format!("Timed out writing frame {}", current.index))
            })
            .await?;
            self.summary.frames_emitted += 1;

            match next {
                Some(frame) => {
                    if let Some(cb) = progress {
                        let emitted = self.summary.frames_emitted;
                        cb(PipelineProgress {
                            progress: emitted as f64 / total.max(emitted + 1) as f64,
                            frames_emitted: emitted,
                            total_frames: total,
                            state: PipelineState::Streaming,
                        });
                    }
                    current = frame;
                }
                None => return Ok(()),
            }
        }
    }

    fn process(&mut self, frame: &Frame, planner: &mut CropPlanner) -> Frame {
        let planned = planner.plan(frame, self.detector.as_ref());
        match planned.outcome {
            PlanOutcome::Tracked => self.summary.tracked += 1,
            PlanOutcome::Held => self.summary.held += 1,
            PlanOutcome::Centered => self.summary.centered += 1,
        }
        self.summary.placements.push(planned.window.offset());

        tracing::trace!(
            frame = frame.index,
            x = planned.window.x,
            y = planned.window.y,
            outcome = ?planned.outcome,
            "Window planned"
        );

        let cropped = frame.cropped(&planned.window);
        let local = planned.point.and_then(|p| planned.window.to_local(p));
        apply_highlight(&cropped, local, &self.config.style)
    }
}

async fn render_nth(
    source: &mut dyn FrameSource,
    config: ReframeConfig,
    detector: Arc<dyn PointDetector>,
    frame_index: u64,
) -> ClipfocusResult<Frame> {
    let info = source.info().clone();
    let mut run = StreamRun {
        summary: RunSummary {
            output_path: PathBuf::new(),
            frames_emitted: 0,
            window_width: 0,
            window_height: 0,
            placements: Vec::new(),
            tracked: 0,
            held: 0,
            centered: 0,
            elapsed_secs: 0.0,
        },
        info,
        config,
        detector,
    };

    let mut planner: Option<CropPlanner> = None;
    let mut position = 0u64;
    loop {
        let frame = read_frame(source, config.io_timeout).await?.ok_or_else(|| {
            ClipfocusError::source_unreadable(format!("Source ends before frame {frame_index}"))
        })?;
        let planner = planner.get_or_insert_with(|| {
            CropPlanner::new(frame.width(), frame.height(), config.aspect_ratio)
        });
        if position == frame_index {
            return Ok(run.process(&frame, planner));
        }
        // Earlier frames only feed the planner's history.
        planner.plan(&frame, run.detector.as_ref());
        position += 1;
    }
}

async fn read_frame(source: &mut dyn FrameSource, limit: Duration) -> ClipfocusResult<Option<Frame>> {
    bounded(limit, source.next_frame(), || {
        ClipfocusError::source_unreadable("Timed out reading frame")
    })
    .await
}

async fn bounded<T, F>(
    limit: Duration,
    fut: F,
    on_timeout: impl FnOnce() -> ClipfocusError,
) -> ClipfocusResult<T>
where
    F: Future<Output = ClipfocusResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout()),
    }
}

async fn close_source(source: &mut dyn FrameSource) {
    if let Err(err) = source.close().await {
        tracing::warn!(error = %err, "Failed to close source");
    }
}

async fn abort_sink(sink: &mut dyn FrameSink) {
    if let Err(err) = sink.abort().await {
        tracing::warn!(error = %err, "Failed to discard partial output");
    }
}
