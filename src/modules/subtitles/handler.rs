use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::error;
use validator::Validate;

use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;

use super::dto::GenerateSubtitlesRequest;
use super::service::SubtitleService;

/// Regenerate subtitles for a published video
#[utoipa::path(
    post,
    path = "/api/subtitles/generate",
    request_body = GenerateSubtitlesRequest,
    responses(
        (status = 200, description = "Subtitles generated", body = ApiResponse<Vec<super::model::SubtitleSegment>>),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Subtitle generation failed")
    ),
    tag = "Subtitles"
)]
pub async fn generate_subtitles(
    State(state): State<AppState>,
    Json(req): Json<GenerateSubtitlesRequest>,
) -> impl IntoResponse {
    if let Err(err) = req.validate() {
        return ApiError(err.to_string(), StatusCode::BAD_REQUEST).into_response();
    }

    match SubtitleService::generate(&state, &req).await {
        Ok(segments) => ApiSuccess(
            ApiResponse::success(segments, "Subtitles generated successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(err) => {
            error!(video_id = %req.video_id, error = %format!("{err:#}"), "subtitle generation failed");
            ApiError(
                format!("Error generating subtitles: {err:#}"),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response()
        }
    }
}
