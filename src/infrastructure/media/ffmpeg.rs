use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

use super::error::{MediaError, MediaResult};

/// Delivery bitrate every upload is re-encoded to.
pub const TARGET_VIDEO_BITRATE: &str = "1000k";
/// Bitrate of the audio-only asset handed to transcription.
pub const AUDIO_BITRATE: &str = "192k";
/// Offset of the representative still frame.
pub const THUMBNAIL_OFFSET: &str = "00:00:01";
/// Resolution of the generated thumbnail.
pub const THUMBNAIL_SIZE: &str = "1280x720";

/// Re-encode an upload to the delivery bitrate, normalizing to mp4.
pub async fn transcode(
    input: &Path,
    output: &Path,
    timeout: Option<Duration>,
) -> MediaResult<()> {
    run_ffmpeg(transcode_args(input, output), timeout).await
}

/// Extract a single still frame as a JPEG.
pub async fn generate_thumbnail(
    input: &Path,
    output: &Path,
    timeout: Option<Duration>,
) -> MediaResult<()> {
    run_ffmpeg(thumbnail_args(input, output), timeout).await
}

/// Derive an mp3 audio track from the transcoded video.
pub async fn extract_audio(
    input: &Path,
    output: &Path,
    timeout: Option<Duration>,
) -> MediaResult<()> {
    run_ffmpeg(audio_args(input, output), timeout).await
}

fn transcode_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-v".into(),
        "error".into(),
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-c:v".into(),
        "libx264".into(),
        "-b:v".into(),
        TARGET_VIDEO_BITRATE.into(),
        "-preset".into(),
        "fast".into(),
        "-c:a".into(),
        "aac".into(),
        output.to_string_lossy().into_owned(),
    ]
}

fn thumbnail_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-v".into(),
        "error".into(),
        "-ss".into(),
        THUMBNAIL_OFFSET.into(),
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-frames:v".into(),
        "1".into(),
        "-s".into(),
        THUMBNAIL_SIZE.into(),
        output.to_string_lossy().into_owned(),
    ]
}

fn audio_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-v".into(),
        "error".into(),
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-vn".into(),
        "-c:a".into(),
        "libmp3lame".into(),
        "-b:a".into(),
        AUDIO_BITRATE.into(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Run ffmpeg as an async child process so encoding never occupies the
/// runtime. Stderr is collected for the error message; with no timeout
/// configured the call waits as long as ffmpeg runs.
async fn run_ffmpeg(args: Vec<String>, timeout: Option<Duration>) -> MediaResult<()> {
    debug!("running ffmpeg {}", args.join(" "));

    let mut child = Command::new("ffmpeg")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MediaError::FfmpegNotFound,
            _ => MediaError::Io(e),
        })?;

    let mut stderr_pipe = child.stderr.take().expect("stderr piped");
    let stderr_task = tokio::spawn(async move {
        let mut buf = String::new();
        let _ = stderr_pipe.read_to_string(&mut buf).await;
        buf
    });

    let status = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(waited) => waited?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(MediaError::Timeout {
                    tool: "ffmpeg",
                    seconds: limit.as_secs(),
                });
            }
        },
        None => child.wait().await?,
    };

    let stderr = stderr_task.await.unwrap_or_default();

    if status.success() {
        Ok(())
    } else {
        Err(MediaError::CommandFailed {
            tool: "ffmpeg",
            status: status.code(),
            stderr: stderr_tail(&stderr),
        })
    }
}

/// Last few lines of ffmpeg stderr; the full log can be megabytes.
fn stderr_tail(stderr: &str) -> String {
    const MAX_LINES: usize = 4;
    let lines: Vec<&str> = stderr.lines().rev().take(MAX_LINES).collect();
    lines.into_iter().rev().collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn transcode_targets_delivery_bitrate() {
        let args = transcode_args(&PathBuf::from("in.mov"), &PathBuf::from("out.mp4"));
        assert!(args.contains(&"-b:v".to_string()));
        assert!(args.contains(&"1000k".to_string()));
        assert!(args.contains(&"libx264".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
    }

    #[test]
    fn thumbnail_is_single_frame_at_fixed_offset() {
        let args = thumbnail_args(&PathBuf::from("in.mp4"), &PathBuf::from("thumb.jpg"));
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss + 1], "00:00:01");
        assert!(args.contains(&"-frames:v".to_string()));
        assert!(args.contains(&"1280x720".to_string()));
    }

    #[test]
    fn audio_extraction_drops_video_stream() {
        let args = audio_args(&PathBuf::from("in.mp4"), &PathBuf::from("audio.mp3"));
        assert!(args.contains(&"-vn".to_string()));
        assert!(args.contains(&"192k".to_string()));
        assert!(args.contains(&"libmp3lame".to_string()));
    }

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let long = (0..20).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n");
        let tail = stderr_tail(&long);
        assert!(tail.starts_with("line16"));
        assert!(tail.ends_with("line19"));
    }
}
