use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::db::pool::DbPool;
use crate::infrastructure::queue::ingest::JobQueue;
use crate::infrastructure::redis::client::RedisService;
use crate::infrastructure::storage::s3::StorageService;
use crate::infrastructure::transcription::whisper::TranscriptionClient;
use crate::modules::videos::events::IngestJob;
use crate::modules::videos::status::StatusStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    pub redis: RedisService,
    pub storage: StorageService,
    pub transcriber: TranscriptionClient,
    pub status: Arc<dyn StatusStore>,
    pub ingest: JobQueue<IngestJob>,
    pub http: reqwest::Client,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: AppConfig,
        db: DbPool,
        redis: RedisService,
        storage: StorageService,
        transcriber: TranscriptionClient,
        status: Arc<dyn StatusStore>,
        ingest: JobQueue<IngestJob>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            config,
            db,
            redis,
            storage,
            transcriber,
            status,
            ingest,
            http,
        }
    }
}
