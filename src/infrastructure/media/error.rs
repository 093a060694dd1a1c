use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("ffmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("ffprobe not found in PATH")]
    FfprobeNotFound,

    #[error("{tool} failed (exit status {status:?}): {stderr}")]
    CommandFailed {
        tool: &'static str,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{tool} timed out after {seconds}s")]
    Timeout { tool: &'static str, seconds: u64 },

    #[error("invalid media: {0}")]
    InvalidMedia(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type MediaResult<T> = Result<T, MediaError>;
