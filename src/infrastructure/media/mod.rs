pub mod error;
pub mod ffmpeg;
pub mod probe;

pub use error::{MediaError, MediaResult};

/// Verify the external media tools are reachable before serving traffic.
pub fn check_tools() -> MediaResult<()> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;
    Ok(())
}
