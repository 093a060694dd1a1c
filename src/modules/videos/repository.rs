use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{Video, STATUS_PUBLISHED};

pub struct NewVideo<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub language: &'a str,
    pub difficulty: Option<&'a str>,
    pub video_url: &'a str,
    pub thumbnail_url: &'a str,
    pub duration_ms: i64,
}

pub struct VideoRepository;

impl VideoRepository {
    /// Insert the published video row. Only called after both blobs are
    /// durably stored, so the row never references a missing asset.
    pub async fn insert(pool: &PgPool, video: NewVideo<'_>) -> Result<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO videos
                (user_id, title, description, language, difficulty,
                 video_url, thumbnail_url, duration_ms, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(video.user_id)
        .bind(video.title)
        .bind(video.description)
        .bind(video.language)
        .bind(video.difficulty)
        .bind(video.video_url)
        .bind(video.thumbnail_url)
        .bind(video.duration_ms)
        .bind(STATUS_PUBLISHED)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(video)
    }
}
