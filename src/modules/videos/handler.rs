use axum::{
    extract::{multipart::Field, Multipart, Path as AxumPath, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use futures_util::StreamExt;
use serde_json::json;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::middleware::auth::TokenClaims;
use crate::state::AppState;

use super::dto::{UploadAccepted, UploadMeta, UploadRejected, UploadStatusResponse};
use super::events::{IngestJob, JobWorkspace};
use super::model::Difficulty;
use super::repository::VideoRepository;
use super::status::UploadStage;

fn reject(status: StatusCode, error: &str) -> axum::response::Response {
    (status, Json(UploadRejected::new(error))).into_response()
}

/// Upload a video for ingestion
/// Accepts the raw file plus metadata, registers the job and returns its id
/// immediately; all processing happens in the background and is observable
/// through the status endpoint.
#[utoipa::path(
    post,
    path = "/api/videos/upload",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Upload accepted", body = UploadAccepted),
        (status = 400, description = "Validation error", body = UploadRejected),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal Server Error", body = UploadRejected)
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let workspace = match JobWorkspace::new() {
        Ok(workspace) => workspace,
        Err(err) => {
            error!(error = %err, "failed to create upload workspace");
            return reject(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut language: Option<String> = None;
    let mut difficulty_raw: Option<String> = None;
    let mut raw_file: Option<(std::path::PathBuf, String)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return reject(
                    StatusCode::BAD_REQUEST,
                    &format!("Malformed multipart body: {err}"),
                );
            }
        };

        match field.name().unwrap_or("") {
            "video" => {
                let file_name = field.file_name().unwrap_or("video.mp4").to_string();
                let path = workspace.join("raw-upload");
                if let Err(err) = write_field_to_file(field, &path).await {
                    error!(error = %format!("{err:#}"), "failed to spool upload to disk");
                    return reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to receive video");
                }
                raw_file = Some((path, file_name));
            }
            "title" => title = read_text_field(field).await,
            "description" => description = read_text_field(field).await,
            "language" => language = read_text_field(field).await,
            "difficulty" => difficulty_raw = read_text_field(field).await,
            _ => {}
        }
    }

    let Some((raw_path, original_filename)) = raw_file else {
        return reject(StatusCode::BAD_REQUEST, "Missing video file");
    };
    let Some(title) = title.filter(|t| !t.is_empty()) else {
        return reject(StatusCode::BAD_REQUEST, "Missing required field: title");
    };
    let Some(language) = language.filter(|l| !l.is_empty()) else {
        return reject(StatusCode::BAD_REQUEST, "Missing required field: language");
    };

    let difficulty = match difficulty_raw.filter(|d| !d.is_empty()) {
        Some(raw) => match Difficulty::parse(&raw) {
            Some(level) => Some(level),
            None => return reject(StatusCode::BAD_REQUEST, "Invalid difficulty level"),
        },
        None => None,
    };

    let meta = UploadMeta {
        title,
        description,
        language,
        difficulty,
    };
    if let Err(err) = meta.validate() {
        return reject(StatusCode::BAD_REQUEST, &err.to_string());
    }

    let upload_id = format!("upload-{}", Uuid::new_v4().simple());
    state
        .status
        .record(&upload_id, UploadStage::Starting, None)
        .await;

    info!(%upload_id, user_id = %claims.sub, file = %original_filename, "accepted video upload");

    let job = IngestJob {
        upload_id: upload_id.clone(),
        user_id: claims.sub,
        meta,
        original_filename,
        raw_path,
        workspace,
    };

    if state.ingest.sender().send(job).await.is_err() {
        error!(%upload_id, "ingest queue is closed, dropping upload");
        state
            .status
            .record(
                &upload_id,
                UploadStage::Error,
                Some(json!("ingest queue unavailable")),
            )
            .await;
        return reject(StatusCode::INTERNAL_SERVER_ERROR, "Ingest queue unavailable");
    }

    (StatusCode::OK, Json(UploadAccepted::new(upload_id))).into_response()
}

/// Poll the status of an upload job
#[utoipa::path(
    get,
    path = "/api/videos/upload-status/{upload_id}",
    params(
        ("upload_id" = String, Path, description = "Upload job ID")
    ),
    responses(
        (status = 200, description = "Current pipeline stage", body = UploadStatusResponse),
        (status = 404, description = "Unknown or expired upload ID")
    ),
    tag = "Videos"
)]
pub async fn upload_status(
    State(state): State<AppState>,
    AxumPath(upload_id): AxumPath<String>,
) -> impl IntoResponse {
    match state.status.query(&upload_id).await {
        Some(entry) => (
            StatusCode::OK,
            Json(UploadStatusResponse {
                status: entry.stage.as_str().to_string(),
                details: entry.details,
            }),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Upload not found" })),
        )
            .into_response(),
    }
}

/// Get a published video
#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = ApiResponse<super::model::Video>),
        (status = 404, description = "Video not found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Videos"
)]
pub async fn get_video(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> impl IntoResponse {
    match VideoRepository::get_by_id(&state.db, id).await {
        Ok(Some(video)) => {
            ApiSuccess(
                ApiResponse::success(video, "Video retrieved successfully"),
                StatusCode::OK,
            )
            .into_response()
        }
        Ok(None) => ApiError("Video not found".to_string(), StatusCode::NOT_FOUND).into_response(),
        Err(e) => ApiError(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}

/// Stream one multipart field to disk without buffering it in memory.
async fn write_field_to_file(mut field: Field<'_>, path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("failed to create {}", path.display()))?;

    while let Some(chunk) = field.next().await {
        let chunk = chunk.context("upload stream interrupted")?;
        file.write_all(&chunk)
            .await
            .context("failed to write upload chunk")?;
    }

    file.flush().await.context("failed to flush upload file")?;
    Ok(())
}

async fn read_text_field(field: Field<'_>) -> Option<String> {
    field.text().await.ok()
}
