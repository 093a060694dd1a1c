use anyhow::Result;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{SubtitleSegment, SubtitleStatus};

/// Subtitle rows are keyed by (video_id, language). The terminal updates
/// write absolute values, so replaying one leaves the row unchanged.
pub struct SubtitleRepository;

impl SubtitleRepository {
    pub async fn insert_processing(pool: &PgPool, video_id: Uuid, language: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO subtitles (video_id, language, status)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(video_id)
        .bind(language)
        .bind(SubtitleStatus::Processing.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Reset an existing row to processing, clearing any previous outcome.
    pub async fn mark_processing(pool: &PgPool, video_id: Uuid, language: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE subtitles
            SET status = $3, segments = NULL, error_message = NULL, updated_at = NOW()
            WHERE video_id = $1 AND language = $2
            "#,
        )
        .bind(video_id)
        .bind(language)
        .bind(SubtitleStatus::Processing.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn mark_completed(
        pool: &PgPool,
        video_id: Uuid,
        language: &str,
        segments: &[SubtitleSegment],
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE subtitles
            SET status = $3, segments = $4, error_message = NULL, updated_at = NOW()
            WHERE video_id = $1 AND language = $2
            "#,
        )
        .bind(video_id)
        .bind(language)
        .bind(SubtitleStatus::Completed.as_str())
        .bind(Json(segments))
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn mark_error(
        pool: &PgPool,
        video_id: Uuid,
        language: &str,
        message: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE subtitles
            SET status = $3, segments = NULL, error_message = $4, updated_at = NOW()
            WHERE video_id = $1 AND language = $2
            "#,
        )
        .bind(video_id)
        .bind(language)
        .bind(SubtitleStatus::Error.as_str())
        .bind(message)
        .execute(pool)
        .await?;
        Ok(())
    }
}
