//! Render one processed frame to a PNG.

use std::path::PathBuf;
use std::sync::Arc;

use clipfocus_common::config::AppConfig;
use clipfocus_render_engine::ffmpeg::FfmpegBackend;
use clipfocus_render_engine::pipeline::ReframePipeline;

use super::{sibling_path, ReframeArgs};

pub async fn run(
    config: &AppConfig,
    input: PathBuf,
    frame: u64,
    output: Option<PathBuf>,
    args: ReframeArgs,
) -> anyhow::Result<()> {
    let settings = args.resolve(config);
    let output = output.unwrap_or_else(|| sibling_path(&input, "_preview", "png"));

    let pipeline = ReframePipeline::new(settings, Arc::new(FfmpegBackend::new()));
    let rendered = pipeline
        .preview(&input, frame)
        .await
        .map_err(|e| anyhow::anyhow!("Preview failed: {e}"))?;

    rendered.image.save(&output)?;
    println!(
        "Preview of frame {frame} ({}x{}) written to {}",
        rendered.width(),
        rendered.height(),
        output.display()
    );
    Ok(())
}
