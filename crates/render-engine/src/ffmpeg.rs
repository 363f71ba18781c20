//! FFmpeg-backed frame source and sink.
//!
//! Decoding and encoding run in child `ffmpeg` processes. Frames cross the
//! process boundary as raw RGB24 over pipes, so the pipeline sees plain pixel
//! buffers and never links against a codec library.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use clipfocus_common::clock::FrameClock;
use clipfocus_common::error::{ClipfocusError, ClipfocusResult};
use clipfocus_frame_model::frame::{AudioTrackRef, Frame, VideoInfo};
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;

use crate::media::{FrameSink, FrameSource, MediaBackend, SinkSpec};

/// Media backend that shells out to `ffprobe` and `ffmpeg`.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegBackend {
    pub fn new() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }

    /// Read stream metadata for `path`.
    pub async fn probe(&self, path: &Path) -> ClipfocusResult<VideoInfo> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ClipfocusError::source_unreadable(format!("Failed to start {}: {e}", self.ffprobe))
            })?;

        if !output.status.success() {
            return Err(ClipfocusError::source_unreadable(format!(
                "ffprobe rejected {} (status {}): {}",
                path.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_probe_output(&String::from_utf8_lossy(&output.stdout), path)
    }
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaBackend for FfmpegBackend {
    async fn open_source(&self, path: &Path) -> ClipfocusResult<Box<dyn FrameSource>> {
        if !path.is_file() {
            return Err(ClipfocusError::source_unreadable(format!(
                "{} does not exist or is not a file",
                path.display()
            )));
        }

        let info = self.probe(path).await?;
        tracing::info!(
            path = %path.display(),
            width = info.width,
            height = info.height,
            frames = info.frame_count,
            fps = %info.frame_rate,
            audio = info.has_audio_track(),
            "Probed source video"
        );

        let mut child = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ClipfocusError::source_unreadable(format!("Failed to start {}: {e}", self.ffmpeg))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClipfocusError::source_unreadable("Failed to capture decoder stdout"))?;
        let stderr_task = child.stderr.take().map(drain_to_string);

        tracing::debug!(pid = child.id(), "Decoder started");

        Ok(Box::new(FfmpegSource {
            frame_len: Frame::rgb24_len(info.width, info.height),
            info,
            child: Some(child),
            stdout: Some(stdout),
            stderr_task,
            next_index: 0,
        }))
    }

    async fn open_sink(&self, spec: SinkSpec) -> ClipfocusResult<Box<dyn FrameSink>> {
        if let Some(parent) = spec.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClipfocusError::sink_open(format!("Cannot create {}: {e}", parent.display()))
            })?;
        }

        let partial_path = partial_path_for(&spec.path);
        let args = encoder_args(&spec, &partial_path);
        tracing::debug!(args = ?args, "Starting encoder");

        let mut child = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ClipfocusError::sink_open(format!("Failed to start {}: {e}", self.ffmpeg)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ClipfocusError::sink_open("Failed to capture encoder stdin"))?;
        let stderr_task = child.stderr.take().map(drain_to_string);

        tracing::info!(
            pid = child.id(),
            output = %spec.path.display(),
            width = spec.width,
            height = spec.height,
            audio = spec.audio.is_some(),
            "Encoder started"
        );

        Ok(Box::new(FfmpegSink {
            spec,
            partial_path,
            child: Some(child),
            stdin: Some(stdin),
            stderr_task,
        }))
    }

    fn is_available(&self) -> bool {
        command_exists(&self.ffmpeg) && command_exists(&self.ffprobe)
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Decoder process streaming RGB24 frames.
pub struct FfmpegSource {
    info: VideoInfo,
    frame_len: usize,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_task: Option<JoinHandle<String>>,
    next_index: u64,
}

impl FfmpegSource {
    async fn finish(&mut self) -> ClipfocusResult<()> {
        self.stdout = None;
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .await
            .map_err(|e| ClipfocusError::source_unreadable(format!("Failed to wait on decoder: {e}")))?;
        let stderr = collect_stderr(self.stderr_task.take()).await;
        check_status(status, &stderr).map_err(ClipfocusError::source_unreadable)
    }
}

#[async_trait]
impl FrameSource for FfmpegSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    async fn next_frame(&mut self) -> ClipfocusResult<Option<Frame>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut buf = vec![0u8; self.frame_len];
        let filled = read_full(stdout, &mut buf)
            .await
            .map_err(|e| ClipfocusError::source_unreadable(format!("Decoder read failed: {e}")))?;

        if filled == 0 {
            self.finish().await?;
            tracing::debug!(frames = self.next_index, "Decoder reached end of stream");
            return Ok(None);
        }
        if filled < self.frame_len {
            return Err(ClipfocusError::source_unreadable(format!(
                "Truncated frame {}: got {filled} of {} bytes",
                self.next_index, self.frame_len
            )));
        }

        let index = self.next_index;
        self.next_index += 1;
        let timestamp_ns = self.info.frame_rate.timestamp_ns(index);
        Frame::from_rgb24(index, timestamp_ns, self.info.width, self.info.height, buf)
            .map(Some)
            .ok_or_else(|| ClipfocusError::source_unreadable(format!("Malformed frame {index}")))
    }

    async fn close(&mut self) -> ClipfocusResult<()> {
        self.stdout = None;
        if let Some(mut child) = self.child.take() {
            let _ = child.start_kill();
            let _ = child.wait().await;
        }
        if let Some(task) = self.stderr_task.take() {
            task.abort();
        }
        Ok(())
    }
}

/// Encoder process fed with RGB24 frames.
pub struct FfmpegSink {
    spec: SinkSpec,
    partial_path: PathBuf,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_task: Option<JoinHandle<String>>,
}

impl FfmpegSink {
    fn move_into_place(&self) -> ClipfocusResult<PathBuf> {
        std::fs::rename(&self.partial_path, &self.spec.path).map_err(|e| {
            ClipfocusError::sink_finalize(format!(
                "Moving {} into place: {e}",
                self.partial_path.display()
            ))
        })?;
        Ok(self.spec.path.clone())
    }
}

#[async_trait]
impl FrameSink for FfmpegSink {
    async fn write_frame(&mut self, frame: Frame) -> ClipfocusResult<()> {
        if frame.dimensions() != (self.spec.width, self.spec.height) {
            return Err(ClipfocusError::sink_write(format!(
                "Frame {} is {}x{}, encoder expects {}x{}",
                frame.index,
                frame.width(),
                frame.height(),
                self.spec.width,
                self.spec.height
            )));
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| ClipfocusError::sink_write("Encoder input already closed"))?;
        stdin
            .write_all(frame.as_rgb24())
            .await
            .map_err(|e| ClipfocusError::sink_write(format!("Frame {}: {e}", frame.index)))
    }

    async fn finalize(&mut self) -> ClipfocusResult<PathBuf> {
        if let Some(mut stdin) = self.stdin.take() {
            stdin
                .shutdown()
                .await
                .map_err(|e| ClipfocusError::sink_finalize(format!("Closing encoder input: {e}")))?;
        }

        let mut child = self
            .child
            .take()
            .ok_or_else(|| ClipfocusError::sink_finalize("Encoder already finished"))?;
        let status = child
            .wait()
            .await
            .map_err(|e| ClipfocusError::sink_finalize(format!("Failed to wait on encoder: {e}")))?;
        let stderr = collect_stderr(self.stderr_task.take()).await;
        check_status(status, &stderr).map_err(ClipfocusError::sink_finalize)?;

        let output = self.move_into_place()?;
        tracing::info!(output = %output.display(), "Encoder finished");
        Ok(output)
    }

    async fn abort(&mut self) -> ClipfocusResult<()> {
        self.stdin = None;
        if let Some(mut child) = self.child.take() {
            let _ = child.start_kill();
            let _ = child.wait().await;
        }
        if let Some(task) = self.stderr_task.take() {
            task.abort();
        }

        match std::fs::remove_file(&self.partial_path) {
            Ok(()) => {
                tracing::debug!(path = %self.partial_path.display(), "Removed partial output");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    #[serde(default)]
    tags: ProbeTags,
}

impl ProbeStream {
    /// Display rotation in degrees within [0, 360). Newer ffprobe reports it
    /// as display-matrix side data, older builds as a `rotate` tag.
    fn rotation(&self) -> i64 {
        let degrees = self
            .side_data_list
            .iter()
            .find_map(|side| side.rotation)
            .or_else(|| self.tags.rotate.as_deref().and_then(|raw| raw.trim().parse().ok()))
            .unwrap_or(0.0);
        (degrees.round() as i64).rem_euclid(360)
    }
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeTags {
    rotate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Turn `ffprobe -print_format json` output into [`VideoInfo`].
fn parse_probe_output(json: &str, path: &Path) -> ClipfocusResult<VideoInfo> {
    let probe: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| ClipfocusError::source_unreadable(format!("Unreadable probe output: {e}")))?;

    let video = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            ClipfocusError::source_unreadable(format!("{} has no video stream", path.display()))
        })?;

    let (coded_width, coded_height) = match (video.width, video.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(ClipfocusError::source_unreadable(format!(
                "{} has no usable frame size",
                path.display()
            )))
        }
    };

    // The decoder applies display rotation, so quarter turns arrive transposed.
    let (width, height) = match video.rotation() {
        90 | 270 => (coded_height, coded_width),
        0 | 180 => (coded_width, coded_height),
        other => {
            return Err(ClipfocusError::source_unreadable(format!(
                "{} is rotated by {other} degrees; only quarter turns are supported",
                path.display()
            )))
        }
    };

    let frame_rate = [&video.r_frame_rate, &video.avg_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|raw| FrameClock::parse(raw))
        .unwrap_or_default();

    let duration_secs = video
        .duration
        .as_deref()
        .or(probe.format.as_ref().and_then(|f| f.duration.as_deref()))
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .unwrap_or(0.0);

    let frame_count = video
        .nb_frames
        .as_deref()
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or_else(|| frame_rate.frames_in(duration_secs));

    let has_audio = probe
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoInfo {
        width,
        height,
        frame_count,
        frame_rate,
        duration_secs,
        audio: has_audio.then(|| AudioTrackRef {
            container: path.to_path_buf(),
        }),
    })
}

/// Hidden sibling of the destination that the encoder writes to.
fn partial_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match path.extension() {
        Some(ext) => format!(".{stem}.partial.{}", ext.to_string_lossy()),
        None => format!(".{stem}.partial"),
    };
    path.with_file_name(name)
}

fn encoder_args(spec: &SinkSpec, partial_path: &Path) -> Vec<String> {
    let mut args: Vec<String> = [
        "-y",
        "-hide_banner",
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgb24",
        "-s",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    args.push(format!("{}x{}", spec.width, spec.height));
    args.push("-framerate".to_string());
    args.push(spec.frame_rate.as_ffmpeg_arg());
    args.push("-i".to_string());
    args.push("-".to_string());

    let extension = spec
        .path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    if let Some(audio) = &spec.audio {
        args.push("-i".to_string());
        args.push(audio.container.to_string_lossy().into_owned());
        args.extend(["-map", "0:v:0", "-map", "1:a?"].map(String::from));
        args.extend(audio_codec_args(&extension));
    }

    args.extend(video_codec_args(&extension, spec.width, spec.height));
    args.push(partial_path.to_string_lossy().into_owned());
    args
}

fn video_codec_args(extension: &str, width: u32, height: u32) -> Vec<String> {
    // 4:2:0 subsampling needs even dimensions.
    let pix_fmt = if width % 2 == 0 && height % 2 == 0 {
        "yuv420p"
    } else {
        "yuv444p"
    };

    let args: Vec<&str> = match extension {
        "webm" => vec!["-c:v", "libvpx-vp9", "-pix_fmt", pix_fmt, "-b:v", "0", "-crf", "32"],
        "mp4" | "mov" => vec![
            "-c:v",
            "libx264",
            "-preset",
            "medium",
            "-crf",
            "20",
            "-pix_fmt",
            pix_fmt,
            "-movflags",
            "+faststart",
        ],
        _ => vec!["-c:v", "libx264", "-preset", "medium", "-crf", "20", "-pix_fmt", pix_fmt],
    };
    args.into_iter().map(String::from).collect()
}

fn audio_codec_args(extension: &str) -> Vec<String> {
    // WebM only carries Vorbis/Opus, so the track cannot be copied verbatim.
    let args: &[&str] = match extension {
        "webm" => &["-c:a", "libopus"],
        _ => &["-c:a", "copy"],
    };
    args.iter().map(|s| s.to_string()).collect()
}

/// Read until `buf` is full or the stream ends. Returns bytes read.
async fn read_full<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

fn drain_to_string<R: AsyncRead + Unpin + Send + 'static>(mut reader: R) -> JoinHandle<String> {
    tokio::spawn(async move {
        let mut output = String::new();
        match reader.read_to_string(&mut output).await {
            Ok(_) => output,
            Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
        }
    })
}

async fn collect_stderr(task: Option<JoinHandle<String>>) -> String {
    match task {
        Some(task) => task
            .await
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string()),
        None => String::new(),
    }
}

fn check_status(status: ExitStatus, stderr: &str) -> Result<(), String> {
    if status.success() {
        Ok(())
    } else {
        Err(format!("ffmpeg exited with {status}: {}", stderr.trim()))
    }
}

pub(crate) fn command_exists(binary: &str) -> bool {
    std::process::Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBE_JSON: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_type": "video",
                "width": 1920,
                "height": 1080,
                "r_frame_rate": "30000/1001",
                "avg_frame_rate": "30000/1001",
                "nb_frames": "300",
                "duration": "10.010000"
            },
            { "index": 1, "codec_type": "audio", "sample_rate": "48000" }
        ],
        "format": { "duration": "10.020000" }
    }"#;

    #[test]
    fn test_parse_probe_output() {
        let info = parse_probe_output(PROBE_JSON, Path::new("/videos/demo.mp4")).unwrap();
        assert_eq!((info.width, info.height), (1920, 1080));
        assert_eq!(info.frame_rate, FrameClock::new(30000, 1001).unwrap());
        assert_eq!(info.frame_count, 300);
        assert!((info.duration_secs - 10.01).abs() < 1e-9);
        assert_eq!(
            info.audio,
            Some(AudioTrackRef {
                container: PathBuf::from("/videos/demo.mp4")
            })
        );
    }

    #[test]
    fn test_parse_probe_estimates_frame_count() {
        let json = r#"{
            "streams": [
                { "codec_type": "video", "width": 640, "height": 360, "r_frame_rate": "25/1" }
            ],
            "format": { "duration": "4.0" }
        }"#;
        let info = parse_probe_output(json, Path::new("clip.mkv")).unwrap();
        assert_eq!(info.frame_count, 100);
        assert!(!info.has_audio_track());
    }

    #[test]
    fn test_parse_probe_without_video_fails() {
        let json = r#"{ "streams": [ { "codec_type": "audio" } ] }"#;
        let err = parse_probe_output(json, Path::new("song.m4a")).unwrap_err();
        assert!(matches!(err, ClipfocusError::SourceUnreadable { .. }));
    }

    #[test]
    fn test_parse_probe_swaps_size_for_quarter_turns() {
        let json = r#"{
            "streams": [
                {
                    "codec_type": "video",
                    "width": 1920,
                    "height": 1080,
                    "r_frame_rate": "30/1",
                    "nb_frames": "90",
                    "side_data_list": [
                        { "side_data_type": "Display Matrix", "rotation": -90 }
                    ]
                }
            ]
        }"#;
        let info = parse_probe_output(json, Path::new("phone.mov")).unwrap();
        assert_eq!((info.width, info.height), (1080, 1920));
        assert_eq!(
            Frame::rgb24_len(info.width, info.height),
            Frame::rgb24_len(1920, 1080)
        );

        let legacy = r#"{
            "streams": [
                {
                    "codec_type": "video",
                    "width": 1280,
                    "height": 720,
                    "tags": { "rotate": "180" }
                }
            ]
        }"#;
        let info = parse_probe_output(legacy, Path::new("upside_down.mp4")).unwrap();
        assert_eq!((info.width, info.height), (1280, 720));
    }

    #[test]
    fn test_parse_probe_rejects_odd_rotation() {
        let json = r#"{
            "streams": [
                {
                    "codec_type": "video",
                    "width": 640,
                    "height": 480,
                    "side_data_list": [ { "rotation": 45 } ]
                }
            ]
        }"#;
        let err = parse_probe_output(json, Path::new("tilted.mp4")).unwrap_err();
        assert!(matches!(err, ClipfocusError::SourceUnreadable { .. }));
    }

    fn idle_sink(dir: &Path) -> FfmpegSink {
        let path = dir.join("final.mp4");
        FfmpegSink {
            partial_path: partial_path_for(&path),
            spec: SinkSpec {
                path,
                frame_rate: FrameClock::default(),
                width: 64,
                height: 64,
                audio: None,
            },
            child: None,
            stdin: None,
            stderr_task: None,
        }
    }

    #[tokio::test]
    async fn test_abort_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = idle_sink(dir.path());
        std::fs::write(&sink.partial_path, b"half an mp4").unwrap();

        sink.abort().await.unwrap();
        assert!(!sink.partial_path.exists());
        assert!(!sink.spec.path.exists());

        // Nothing left to remove is still a clean abort.
        sink.abort().await.unwrap();
    }

    #[test]
    fn test_move_into_place_renames_partial() {
        let dir = tempfile::tempdir().unwrap();
        let sink = idle_sink(dir.path());
        std::fs::write(&sink.partial_path, b"encoded").unwrap();

        let output = sink.move_into_place().unwrap();
        assert_eq!(output, dir.path().join("final.mp4"));
        assert_eq!(std::fs::read(&output).unwrap(), b"encoded");
        assert!(!sink.partial_path.exists());
    }

    #[tokio::test]
    async fn test_finalize_without_encoder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = idle_sink(dir.path());
        std::fs::write(&sink.partial_path, b"encoded").unwrap();

        let err = sink.finalize().await.unwrap_err();
        assert!(matches!(err, ClipfocusError::SinkFinalizeFailed { .. }));
        assert!(!sink.spec.path.exists());
    }

    #[test]
    fn test_partial_path_is_hidden_sibling() {
        assert_eq!(
            partial_path_for(Path::new("/out/final.mp4")),
            PathBuf::from("/out/.final.partial.mp4")
        );
        assert_eq!(partial_path_for(Path::new("clip")), PathBuf::from(".clip.partial"));
    }

    #[test]
    fn test_encoder_args_copy_audio() {
        let spec = SinkSpec {
            path: PathBuf::from("/out/final.mp4"),
            frame_rate: FrameClock::new(30000, 1001).unwrap(),
            width: 608,
            height: 1080,
            audio: Some(AudioTrackRef {
                container: PathBuf::from("/in/source.mp4"),
            }),
        };
        let args = encoder_args(&spec, Path::new("/out/.final.partial.mp4"));
        let joined = args.join(" ");
        assert!(joined.contains("-s 608x1080 -framerate 30000/1001 -i -"));
        assert!(joined.contains("-i /in/source.mp4 -map 0:v:0 -map 1:a? -c:a copy"));
        assert!(joined.contains("-c:v libx264"));
        assert!(joined.contains("-pix_fmt yuv420p"));
        assert_eq!(args.last().map(String::as_str), Some("/out/.final.partial.mp4"));
    }

    #[test]
    fn test_encoder_args_without_audio_or_even_size() {
        let spec = SinkSpec {
            path: PathBuf::from("clip.webm"),
            frame_rate: FrameClock::default(),
            width: 101,
            height: 180,
            audio: None,
        };
        let args = encoder_args(&spec, Path::new(".clip.partial.webm"));
        assert!(!args.iter().any(|a| a == "-map"));
        assert!(args.iter().any(|a| a == "libvpx-vp9"));
        assert!(args.iter().any(|a| a == "yuv444p"));
    }

    #[tokio::test]
    async fn test_read_full_reports_short_reads() {
        let data = vec![7u8; 10];
        let mut reader: &[u8] = &data;
        let mut buf = vec![0u8; 6];
        assert_eq!(read_full(&mut reader, &mut buf).await.unwrap(), 6);
        assert_eq!(read_full(&mut reader, &mut buf).await.unwrap(), 4);
        assert_eq!(read_full(&mut reader, &mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_input_is_source_unreadable() {
        let backend = FfmpegBackend::new();
        let result = backend
            .open_source(Path::new("/definitely/not/here.mp4"))
            .await;
        assert!(matches!(result, Err(ClipfocusError::SourceUnreadable { .. })));
    }
}
