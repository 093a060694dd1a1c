use std::cmp::Ordering;
use std::path::Path;

use anyhow::{bail, Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{info, warn};

use crate::modules::subtitles::model::SubtitleSegment;

/// Model identifier sent with every transcription request.
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Client for a Whisper-compatible `/audio/transcriptions` endpoint.
#[derive(Clone)]
pub struct TranscriptionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// The verbose_json response carries more fields (language, text, avg
/// logprobs); only the timestamped segments matter here.
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    segments: Vec<SubtitleSegment>,
}

impl TranscriptionClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Transcribe an audio file into ordered subtitle segments. A single
    /// attempt is made; there is no retry. The audio file is removed once the
    /// attempt finishes, whether it succeeded or not.
    pub async fn transcribe(
        &self,
        audio_path: &Path,
        hint: Option<&str>,
    ) -> Result<Vec<SubtitleSegment>> {
        let result = self.request(audio_path, hint).await;

        if let Err(err) = tokio::fs::remove_file(audio_path).await {
            warn!(
                path = %audio_path.display(),
                error = %err,
                "failed to remove audio file after transcription"
            );
        }

        result
    }

    async fn request(&self, audio_path: &Path, hint: Option<&str>) -> Result<Vec<SubtitleSegment>> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .with_context(|| format!("failed to read audio file {}", audio_path.display()))?;

        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.mp3".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/mpeg")
            .context("failed to build audio form part")?;

        let mut form = Form::new()
            .part("file", part)
            .text("model", TRANSCRIPTION_MODEL)
            .text("response_format", "verbose_json");

        if let Some(hint) = hint {
            form = form.text("prompt", hint.to_string());
        }

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("transcription request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("transcription service returned {status}: {body}");
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .context("failed to parse transcription response")?;

        info!(segments = parsed.segments.len(), "transcription finished");
        Ok(normalize_segments(parsed.segments))
    }
}

/// Enforce the segment contract: non-decreasing start times and start ≤ end.
fn normalize_segments(mut segments: Vec<SubtitleSegment>) -> Vec<SubtitleSegment> {
    segments.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));
    for segment in &mut segments {
        if segment.end < segment.start {
            segment.end = segment.start;
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn seg(start: f64, end: f64, text: &str) -> SubtitleSegment {
        SubtitleSegment {
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn normalize_orders_by_start_and_clamps_end() {
        let out = normalize_segments(vec![
            seg(4.0, 6.0, "b"),
            seg(0.0, 2.0, "a"),
            seg(8.0, 7.0, "c"),
        ]);
        assert_eq!(out[0].text, "a");
        assert_eq!(out[1].text, "b");
        assert_eq!(out[2].start, 8.0);
        assert_eq!(out[2].end, 8.0);
    }

    async fn write_temp_audio() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp3");
        tokio::fs::write(&path, b"not-really-mp3").await.unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn transcribe_parses_segments_and_removes_audio() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "task": "transcribe",
                "language": "en",
                "text": "hello world",
                "segments": [
                    { "id": 1, "start": 2.0, "end": 4.5, "text": " world" },
                    { "id": 0, "start": 0.0, "end": 2.0, "text": "hello" }
                ]
            })))
            .mount(&server)
            .await;

        let client = TranscriptionClient::new(server.uri(), "test-key".to_string());
        let (_dir, audio) = write_temp_audio().await;

        let segments = client.transcribe(&audio, Some("a greeting")).await.unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "hello");
        assert_eq!(segments[1].end, 4.5);
        assert!(!audio.exists(), "audio file should be removed after use");
    }

    #[tokio::test]
    async fn transcribe_surfaces_service_errors_and_still_removes_audio() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = TranscriptionClient::new(server.uri(), "test-key".to_string());
        let (_dir, audio) = write_temp_audio().await;

        let err = client.transcribe(&audio, None).await.unwrap_err();

        assert!(err.to_string().contains("429"));
        assert!(!audio.exists(), "audio file should be removed on failure too");
    }
}
