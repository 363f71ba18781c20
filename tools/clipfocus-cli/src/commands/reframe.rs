//! Reframe a video.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use clipfocus_common::config::AppConfig;
use clipfocus_frame_model::settings::ReframeSettings;
use clipfocus_render_engine::ffmpeg::FfmpegBackend;
use clipfocus_render_engine::media::MediaBackend;
use clipfocus_render_engine::pipeline::{
    CancelFlag, PipelineFailure, PipelineProgress, ProgressCallback, ReframePipeline, RunSummary,
};
use serde::Serialize;

use super::{sibling_path, ReframeArgs};

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    generated_at: String,
    input: &'a Path,
    settings: &'a ReframeSettings,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<FailureReport>,
}

#[derive(Debug, Serialize)]
struct FailureReport {
    state: String,
    kind: &'static str,
    message: String,
}

impl From<&PipelineFailure> for FailureReport {
    fn from(failure: &PipelineFailure) -> Self {
        Self {
            state: failure.state.to_string(),
            kind: failure.cause.kind(),
            message: failure.cause.to_string(),
        }
    }
}

pub async fn run(
    config: &AppConfig,
    input: PathBuf,
    output: Option<PathBuf>,
    args: ReframeArgs,
    report: Option<PathBuf>,
) -> anyhow::Result<()> {
    let settings = args.resolve(config);
    let output = output.unwrap_or_else(|| default_output(&input, &settings.aspect_ratio));

    println!("Reframing: {}", input.display());
    println!("  Output: {}", output.display());
    println!("  Aspect ratio: {}", settings.aspect_ratio);
    println!(
        "  Highlight: {} @ {:.0}% opacity, radius {}px",
        settings.highlight_color,
        settings.highlight_opacity * 100.0,
        settings.highlight_radius
    );

    let backend = FfmpegBackend::new();
    if !backend.is_available() {
        anyhow::bail!("ffmpeg and ffprobe must be installed and on PATH (run `clipfocus check`)");
    }

    let cancel = CancelFlag::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current frame");
            on_ctrl_c.cancel();
        }
    });

    let progress_cb: ProgressCallback = Box::new(|p: PipelineProgress| {
        print!(
            "\r  Progress: {:.1}% ({}/{} frames)  ",
            p.progress * 100.0,
            p.frames_emitted,
            p.total_frames,
        );
        let _ = std::io::stdout().flush();
    });

    let mut pipeline = ReframePipeline::new(settings.clone(), Arc::new(backend));
    let result = pipeline
        .run(&input, &output, Some(progress_cb), &cancel)
        .await;

    if let Some(report_path) = &report {
        let report = RunReport {
            generated_at: Utc::now().to_rfc3339(),
            input: &input,
            settings: &settings,
            status: if result.is_ok() { "done" } else { "failed" },
            summary: result.as_ref().ok(),
            error: result.as_ref().err().map(FailureReport::from),
        };
        std::fs::write(report_path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!(path = %report_path.display(), "Wrote run report");
    }

    match result {
        Ok(summary) => {
            println!("\nReframe complete: {}", summary.output_path.display());
            println!(
                "  {} frames at {}x{} ({} tracked, {} held, {} centered) in {:.1}s",
                summary.frames_emitted,
                summary.window_width,
                summary.window_height,
                summary.tracked,
                summary.held,
                summary.centered,
                summary.elapsed_secs
            );
            Ok(())
        }
        Err(failure) => {
            println!();
            Err(anyhow::Error::new(failure).context("Reframe failed"))
        }
    }
}

/// `demo.mp4` at 9:16 becomes `demo_9x16.mp4`.
fn default_output(input: &Path, ratio: &str) -> PathBuf {
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_string());
    let suffix = format!("_{}", ratio.replace([':', '/'], "x"));
    sibling_path(input, &suffix, &extension)
}
