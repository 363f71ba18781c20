//! Check system capabilities.

use clipfocus_render_engine::ffmpeg::FfmpegBackend;
use clipfocus_render_engine::media::MediaBackend;

pub fn run() -> anyhow::Result<()> {
    println!("ClipFocus System Check");
    println!("{}", "=".repeat(50));

    let backend = FfmpegBackend::new();
    if backend.is_available() {
        println!("[OK] Media backend: {} (ffmpeg + ffprobe on PATH)", backend.name());
        println!("\nClipFocus is ready.");
    } else {
        println!("[MISSING] Media backend: {}", backend.name());
        println!("     Install ffmpeg (which provides ffprobe) and make sure both are on PATH.");
        println!("\nClipFocus cannot decode or encode video until this is fixed.");
    }

    Ok(())
}
