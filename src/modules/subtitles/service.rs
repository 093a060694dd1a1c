use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;
use tracing::{error, info};

use crate::infrastructure::media::ffmpeg;
use crate::modules::videos::events::JobWorkspace;
use crate::state::AppState;

use super::dto::GenerateSubtitlesRequest;
use super::model::SubtitleSegment;
use super::repository::SubtitleRepository;

pub struct SubtitleService;

impl SubtitleService {
    /// Re-run transcription for a published video: download it, derive
    /// audio, transcribe, and finalize the subtitle row either way.
    pub async fn generate(
        state: &AppState,
        req: &GenerateSubtitlesRequest,
    ) -> Result<Vec<SubtitleSegment>> {
        info!(video_id = %req.video_id, url = %req.video_url, "generating subtitles");

        SubtitleRepository::mark_processing(&state.db, req.video_id, &req.language)
            .await
            .context("failed to mark subtitle row as processing")?;

        match Self::run(state, req).await {
            Ok(segments) => {
                SubtitleRepository::mark_completed(
                    &state.db,
                    req.video_id,
                    &req.language,
                    &segments,
                )
                .await
                .context("failed to store subtitle segments")?;
                info!(video_id = %req.video_id, segments = segments.len(), "subtitles generated");
                Ok(segments)
            }
            Err(err) => {
                if let Err(db_err) = SubtitleRepository::mark_error(
                    &state.db,
                    req.video_id,
                    &req.language,
                    &format!("{err:#}"),
                )
                .await
                {
                    error!(video_id = %req.video_id, error = %db_err, "failed to record subtitle error");
                }
                Err(err)
            }
        }
    }

    async fn run(state: &AppState, req: &GenerateSubtitlesRequest) -> Result<Vec<SubtitleSegment>> {
        let workspace = JobWorkspace::new().context("failed to create workspace")?;
        let timeout = state
            .config
            .ffmpeg_timeout_secs
            .map(Duration::from_secs);

        let video_path = workspace.join("source.mp4");
        download_to_file(&state.http, &req.video_url, &video_path).await?;

        let audio_path = workspace.join("audio.mp3");
        ffmpeg::extract_audio(&video_path, &audio_path, timeout)
            .await
            .context("audio extraction failed")?;

        state
            .transcriber
            .transcribe(&audio_path, req.description.as_deref())
            .await
            .context("transcription failed")
    }
}

/// Stream a remote file to disk without holding it in memory.
async fn download_to_file(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("failed to fetch video from {url}"))?;

    if !response.status().is_success() {
        bail!("failed to fetch video: {}", response.status());
    }

    let stream = response
        .bytes_stream()
        .map(|chunk| chunk.map_err(std::io::Error::other));
    let mut reader = StreamReader::new(Box::pin(stream));

    let mut file = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("failed to create {}", dest.display()))?;

    tokio::io::copy(&mut reader, &mut file)
        .await
        .context("failed to write downloaded video")?;
    file.flush().await.context("failed to flush downloaded video")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn download_writes_remote_body_to_disk() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/clip.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fake video bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("clip.mp4");
        let client = reqwest::Client::new();

        download_to_file(&client, &format!("{}/videos/clip.mp4", server.uri()), &dest)
            .await
            .unwrap();

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"fake video bytes");
    }

    #[tokio::test]
    async fn download_fails_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/missing.mp4"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.mp4");
        let client = reqwest::Client::new();

        let err = download_to_file(
            &client,
            &format!("{}/videos/missing.mp4", server.uri()),
            &dest,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("404"));
    }
}
