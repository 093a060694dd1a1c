use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::common::media_types;
use crate::infrastructure::media::{ffmpeg, probe};
use crate::modules::subtitles::repository::SubtitleRepository;
use crate::state::AppState;

use super::events::IngestJob;
use super::repository::{NewVideo, VideoRepository};
use super::status::UploadStage;

/// Run one accepted upload to a terminal stage. Every outcome lands in the
/// status store; the job's workspace is dropped (and its files removed) when
/// this returns.
pub async fn run(state: &AppState, job: IngestJob) {
    let upload_id = job.upload_id.clone();
    info!(%upload_id, title = %job.meta.title, "starting upload pipeline");

    match process(state, &job).await {
        Ok(video_id) => {
            info!(%upload_id, %video_id, "upload pipeline completed");
            state
                .status
                .record(
                    &upload_id,
                    UploadStage::Completed,
                    Some(json!({ "videoId": video_id })),
                )
                .await;
        }
        Err(err) => {
            error!(%upload_id, error = %format!("{err:#}"), "upload pipeline failed");
            state
                .status
                .record(
                    &upload_id,
                    UploadStage::Error,
                    Some(Value::String(format!("{err:#}"))),
                )
                .await;
        }
    }
}

async fn process(state: &AppState, job: &IngestJob) -> Result<Uuid> {
    let timeout = state
        .config
        .ffmpeg_timeout_secs
        .map(Duration::from_secs);

    advance(state, &job.upload_id, UploadStage::ProcessingVideo).await;
    let transcoded = job.workspace.join("transcoded.mp4");
    ffmpeg::transcode(&job.raw_path, &transcoded, timeout)
        .await
        .context("transcoding failed")?;

    advance(state, &job.upload_id, UploadStage::GeneratingThumbnail).await;
    let thumbnail = job.workspace.join("thumbnail.jpg");
    ffmpeg::generate_thumbnail(&transcoded, &thumbnail, timeout)
        .await
        .context("thumbnail generation failed")?;

    advance(state, &job.upload_id, UploadStage::GettingDuration).await;
    let duration_ms = probe::probe_duration_ms(&transcoded)
        .await
        .context("probing duration failed")?;

    advance(state, &job.upload_id, UploadStage::UploadingToStorage).await;
    let (video_url, thumbnail_url) = publish_assets(state, job, &transcoded, &thumbnail).await?;

    let video_id = create_records(state, job, &video_url, &thumbnail_url, duration_ms).await?;

    // The video is published from here on. Subtitle failures are recorded on
    // the subtitle row and still end the job in the error stage, but the
    // video row and its blobs stay live.
    if let Err(err) = generate_subtitles(state, job, &transcoded, video_id).await {
        warn!(
            upload_id = %job.upload_id,
            %video_id,
            error = %format!("{err:#}"),
            "subtitle generation failed for published video"
        );
        if let Err(db_err) =
            SubtitleRepository::mark_error(&state.db, video_id, &job.meta.language, &format!("{err:#}"))
                .await
        {
            error!(%video_id, error = %db_err, "failed to record subtitle error");
        }
        return Err(err);
    }

    Ok(video_id)
}

/// Upload both derived assets and resolve their public URLs. The thumbnail
/// shares the video's opaque id so the pair is traceable in storage. If the
/// thumbnail put fails the already-uploaded video blob is left in place;
/// nothing references it yet.
async fn publish_assets(
    state: &AppState,
    job: &IngestJob,
    transcoded: &Path,
    thumbnail: &Path,
) -> Result<(String, String)> {
    let asset_id = Uuid::new_v4().simple().to_string();
    let ext = media_types::file_extension(&job.original_filename)
        .unwrap_or_else(|| "mp4".to_string());

    let video_key = format!("{}/{}.{}", job.user_id, asset_id, ext);
    let thumbnail_key = format!("{}/{}.jpg", job.user_id, asset_id);
    let content_type = media_types::video_content_type(&ext);

    let cfg = &state.config;

    state
        .storage
        .put_file(&cfg.videos_bucket, &video_key, transcoded, &content_type)
        .await
        .context("video upload to storage failed")?;

    state
        .storage
        .put_file(&cfg.thumbnails_bucket, &thumbnail_key, thumbnail, "image/jpeg")
        .await
        .context("thumbnail upload to storage failed")?;

    Ok((
        state.storage.public_url(&cfg.videos_bucket, &video_key),
        state.storage.public_url(&cfg.thumbnails_bucket, &thumbnail_key),
    ))
}

/// Insert the video row, then its subtitle job row. A subtitle insert
/// failure leaves the already-published video row in place.
async fn create_records(
    state: &AppState,
    job: &IngestJob,
    video_url: &str,
    thumbnail_url: &str,
    duration_ms: i64,
) -> Result<Uuid> {
    let video_id = VideoRepository::insert(
        &state.db,
        NewVideo {
            user_id: job.user_id,
            title: &job.meta.title,
            description: job.meta.description.as_deref(),
            language: &job.meta.language,
            difficulty: job.meta.difficulty.map(|d| d.as_str()),
            video_url,
            thumbnail_url,
            duration_ms,
        },
    )
    .await
    .context("failed to insert video record")?;

    SubtitleRepository::insert_processing(&state.db, video_id, &job.meta.language)
        .await
        .context("failed to insert subtitle record")?;

    Ok(video_id)
}

async fn generate_subtitles(
    state: &AppState,
    job: &IngestJob,
    transcoded: &Path,
    video_id: Uuid,
) -> Result<()> {
    let timeout = state
        .config
        .ffmpeg_timeout_secs
        .map(Duration::from_secs);

    advance(state, &job.upload_id, UploadStage::ExtractingAudio).await;
    let audio = job.workspace.join("audio.mp3");
    ffmpeg::extract_audio(transcoded, &audio, timeout)
        .await
        .context("audio extraction failed")?;

    advance(state, &job.upload_id, UploadStage::Transcribing).await;
    let segments = state
        .transcriber
        .transcribe(&audio, job.meta.description.as_deref())
        .await
        .context("transcription failed")?;

    advance(state, &job.upload_id, UploadStage::UpdatingSubtitles).await;
    SubtitleRepository::mark_completed(&state.db, video_id, &job.meta.language, &segments)
        .await
        .context("failed to store subtitle segments")?;

    Ok(())
}

async fn advance(state: &AppState, upload_id: &str, stage: UploadStage) {
    info!(upload_id, stage = stage.as_str(), "pipeline stage");
    state.status.record(upload_id, stage, None).await;
}
