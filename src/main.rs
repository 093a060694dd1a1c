use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod middleware;
mod modules;
mod routes;
mod state;
mod workers;

use config::settings::{AppConfig, StatusBackend};
use infrastructure::db::pool::connect_to_db;
use infrastructure::queue::ingest::JobQueue;
use infrastructure::redis::client::RedisService;
use infrastructure::storage::s3::StorageService;
use infrastructure::transcription::whisper::TranscriptionClient;
use modules::videos::status::{MemoryStatusStore, RedisStatusStore, StatusStore};
use state::AppState;

/// Pending uploads the queue holds before the upload endpoint backpressures.
const INGEST_QUEUE_CAPACITY: usize = 64;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    let config = AppConfig::new().expect("failed to load configuration");

    if let Err(err) = infrastructure::media::check_tools() {
        warn!("{err}; uploads will fail until it is installed");
    }

    let db = connect_to_db(&config.database_url)
        .await
        .expect("failed to connect to PostgreSQL");

    let redis = RedisService::new(&config.redis_url)
        .await
        .expect("failed to connect to Redis");

    let storage = StorageService::new(
        &config.minio_url,
        &config.minio_access_key,
        &config.minio_secret_key,
    )
    .await
    .expect("failed to initialize object storage");

    let transcriber = TranscriptionClient::new(
        config.transcription_url.clone(),
        config.transcription_api_key.clone(),
    );

    let retention = Duration::from_secs(config.status_retention_secs);
    let status: Arc<dyn StatusStore> = match config.status_backend {
        StatusBackend::Memory => Arc::new(MemoryStatusStore::new(retention)),
        StatusBackend::Redis => Arc::new(RedisStatusStore::new(redis.clone(), retention)),
    };

    let ingest = JobQueue::new(INGEST_QUEUE_CAPACITY);
    let http = reqwest::Client::new();

    let server_port = config.server_port;
    let state = AppState::new(config, db, redis, storage, transcriber, status, ingest, http);

    workers::ingest::spawn_ingest_workers(state.clone());

    let app = app::create_app(state).await;

    let addr = format!("0.0.0.0:{server_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Server running on http://{addr}");

    axum::serve(listener, app).await.unwrap();
}
