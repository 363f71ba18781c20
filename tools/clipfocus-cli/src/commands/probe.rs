//! Show source video information.

use std::path::PathBuf;

use clipfocus_render_engine::ffmpeg::FfmpegBackend;

pub async fn run(input: PathBuf) -> anyhow::Result<()> {
    let info = FfmpegBackend::new()
        .probe(&input)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to probe {}: {e}", input.display()))?;

    println!("Source: {}", input.display());
    println!("  Resolution: {}x{}", info.width, info.height);
    println!(
        "  Frame rate: {} fps ({})",
        info.frame_rate,
        info.frame_rate.as_ffmpeg_arg()
    );
    println!("  Frames: {}", info.frame_count);
    println!("  Duration: {:.2}s", info.duration_secs);
    println!(
        "  Audio: {}",
        if info.has_audio_track() { "yes (copied unchanged)" } else { "none" }
    );

    Ok(())
}
