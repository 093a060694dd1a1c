use serde::Deserialize;
use crate::config::env::{self, EnvKey};

/// Backing store for upload status entries. Memory works for a single
/// instance; redis lets several instances serve the same polling clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum StatusBackend {
    Memory,
    Redis,
}

impl StatusBackend {
    fn from_env() -> Self {
        match env::get_or(EnvKey::StatusBackend, "memory").to_lowercase().as_str() {
            "redis" => StatusBackend::Redis,
            _ => StatusBackend::Memory,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub minio_url: String,
    pub videos_bucket: String,
    pub thumbnails_bucket: String,
    pub minio_access_key: String,
    pub minio_secret_key: String,
    pub jwt_secret: String,
    pub transcription_url: String,
    pub transcription_api_key: String,
    pub status_backend: StatusBackend,
    pub status_retention_secs: u64,
    pub ingest_workers: usize,
    pub ffmpeg_timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 4000),
            database_url: env::get(EnvKey::DatabaseUrl)?,
            redis_url: env::get(EnvKey::RedisUrl)?,
            minio_url: env::get(EnvKey::MinioUrl)?,
            videos_bucket: env::get_or(EnvKey::MinioBucketVideos, "videos"),
            thumbnails_bucket: env::get_or(EnvKey::MinioBucketThumbnails, "thumbnails"),
            minio_access_key: env::get(EnvKey::MinioAccessKey)?,
            minio_secret_key: env::get(EnvKey::MinioSecretKey)?,
            jwt_secret: env::get(EnvKey::JwtSecret)?,
            transcription_url: env::get_or(EnvKey::TranscriptionUrl, "https://api.openai.com/v1"),
            transcription_api_key: env::get(EnvKey::TranscriptionApiKey)?,
            status_backend: StatusBackend::from_env(),
            status_retention_secs: env::get_parsed(EnvKey::StatusRetentionSecs, 300),
            ingest_workers: env::get_parsed(EnvKey::IngestWorkers, 2),
            ffmpeg_timeout_secs: env::get_parsed_opt(EnvKey::FfmpegTimeoutSecs),
        })
    }
}
