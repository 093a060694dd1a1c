use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;

use super::error::{MediaError, MediaResult};

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Read the container duration of a media file, rounded to milliseconds.
pub async fn probe_duration_ms(path: &Path) -> MediaResult<i64> {
    let output = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_format"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MediaError::FfprobeNotFound,
            _ => MediaError::Io(e),
        })?;

    if !output.status.success() {
        return Err(MediaError::CommandFailed {
            tool: "ffprobe",
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    duration_ms_from_json(&output.stdout)
}

fn duration_ms_from_json(raw: &[u8]) -> MediaResult<i64> {
    let probe: FfprobeOutput = serde_json::from_slice(raw)?;

    let seconds = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| MediaError::InvalidMedia("container reports no duration".to_string()))?;

    if seconds <= 0.0 {
        return Err(MediaError::InvalidMedia(format!(
            "container reports non-positive duration {seconds}"
        )));
    }

    Ok((seconds * 1000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_duration_to_rounded_millis() {
        let json = br#"{"format":{"duration":"10.523","size":"12345"}}"#;
        assert_eq!(duration_ms_from_json(json).unwrap(), 10523);

        let json = br#"{"format":{"duration":"9.9996"}}"#;
        assert_eq!(duration_ms_from_json(json).unwrap(), 10000);
    }

    #[test]
    fn missing_duration_is_invalid_media() {
        let json = br#"{"format":{}}"#;
        assert!(matches!(
            duration_ms_from_json(json),
            Err(MediaError::InvalidMedia(_))
        ));
    }

    #[test]
    fn zero_duration_is_invalid_media() {
        let json = br#"{"format":{"duration":"0.0"}}"#;
        assert!(matches!(
            duration_ms_from_json(json),
            Err(MediaError::InvalidMedia(_))
        ));
    }
}
