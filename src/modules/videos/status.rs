use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;

use crate::infrastructure::redis::client::RedisService;

/// Pipeline checkpoints reported to polling clients. The wire strings are the
/// snake_case variant names; producers and consumers share this one enum so
/// the vocabulary cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStage {
    Starting,
    ProcessingVideo,
    GeneratingThumbnail,
    GettingDuration,
    UploadingToStorage,
    ExtractingAudio,
    Transcribing,
    UpdatingSubtitles,
    Completed,
    Error,
}

impl UploadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStage::Starting => "starting",
            UploadStage::ProcessingVideo => "processing_video",
            UploadStage::GeneratingThumbnail => "generating_thumbnail",
            UploadStage::GettingDuration => "getting_duration",
            UploadStage::UploadingToStorage => "uploading_to_storage",
            UploadStage::ExtractingAudio => "extracting_audio",
            UploadStage::Transcribing => "transcribing",
            UploadStage::UpdatingSubtitles => "updating_subtitles",
            UploadStage::Completed => "completed",
            UploadStage::Error => "error",
        }
    }

    /// Terminal stages receive no further writes and become eligible for
    /// eviction after the retention window.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStage::Completed | UploadStage::Error)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub stage: UploadStage,
    pub details: Option<Value>,
}

/// Key-value surface the pipeline reports progress through. Injected as a
/// trait object so a multi-instance deployment can swap the in-process map
/// for redis without touching the pipeline.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Overwrite the entry for `upload_id` (last-write-wins; each job has a
    /// single writer). Backend failures are logged, never propagated — a
    /// status write must not fail the pipeline.
    async fn record(&self, upload_id: &str, stage: UploadStage, details: Option<Value>);

    /// Current entry, or None for ids that never existed or were evicted.
    async fn query(&self, upload_id: &str) -> Option<StatusEntry>;
}

/// Single-instance store: a shared map with timed eviction of terminal
/// entries. Non-terminal entries are never evicted by time alone.
pub struct MemoryStatusStore {
    entries: Arc<RwLock<HashMap<String, StatusEntry>>>,
    retention: Duration,
}

impl MemoryStatusStore {
    pub fn new(retention: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn record(&self, upload_id: &str, stage: UploadStage, details: Option<Value>) {
        self.entries
            .write()
            .await
            .insert(upload_id.to_string(), StatusEntry { stage, details });

        if stage.is_terminal() {
            let entries = Arc::clone(&self.entries);
            let upload_id = upload_id.to_string();
            let retention = self.retention;
            tokio::spawn(async move {
                tokio::time::sleep(retention).await;
                let mut entries = entries.write().await;
                let still_terminal = entries
                    .get(&upload_id)
                    .is_some_and(|entry| entry.stage.is_terminal());
                if still_terminal {
                    entries.remove(&upload_id);
                }
            });
        }
    }

    async fn query(&self, upload_id: &str) -> Option<StatusEntry> {
        self.entries.read().await.get(upload_id).cloned()
    }
}

/// Redis-backed store for multi-instance deployments. Terminal writes carry a
/// TTL so redis handles the retention window itself.
pub struct RedisStatusStore {
    redis: RedisService,
    retention: Duration,
}

impl RedisStatusStore {
    pub fn new(redis: RedisService, retention: Duration) -> Self {
        Self { redis, retention }
    }

    fn key(upload_id: &str) -> String {
        format!("upload_status:{upload_id}")
    }
}

#[async_trait]
impl StatusStore for RedisStatusStore {
    async fn record(&self, upload_id: &str, stage: UploadStage, details: Option<Value>) {
        let entry = StatusEntry { stage, details };
        let payload = match serde_json::to_string(&entry) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(upload_id, error = %err, "failed to serialize status entry");
                return;
            }
        };

        let mut conn = match self.redis.get_conn().await {
            Ok(conn) => conn,
            Err(err) => {
                warn!(upload_id, error = %err, "redis unavailable for status write");
                return;
            }
        };

        let key = Self::key(upload_id);
        let result: Result<(), redis::RedisError> = if stage.is_terminal() {
            conn.set_ex(&key, payload, self.retention.as_secs()).await
        } else {
            conn.set(&key, payload).await
        };

        if let Err(err) = result {
            warn!(upload_id, error = %err, "failed to write status entry");
        }
    }

    async fn query(&self, upload_id: &str) -> Option<StatusEntry> {
        let mut conn = match self.redis.get_conn().await {
            Ok(conn) => conn,
            Err(err) => {
                warn!(upload_id, error = %err, "redis unavailable for status read");
                return None;
            }
        };

        let payload: Option<String> = match conn.get(Self::key(upload_id)).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(upload_id, error = %err, "failed to read status entry");
                return None;
            }
        };

        payload.and_then(|raw| serde_json::from_str(&raw).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stage_strings_match_client_vocabulary() {
        let expected = [
            (UploadStage::Starting, "starting"),
            (UploadStage::ProcessingVideo, "processing_video"),
            (UploadStage::GeneratingThumbnail, "generating_thumbnail"),
            (UploadStage::GettingDuration, "getting_duration"),
            (UploadStage::UploadingToStorage, "uploading_to_storage"),
            (UploadStage::ExtractingAudio, "extracting_audio"),
            (UploadStage::Transcribing, "transcribing"),
            (UploadStage::UpdatingSubtitles, "updating_subtitles"),
            (UploadStage::Completed, "completed"),
            (UploadStage::Error, "error"),
        ];
        for (stage, name) in expected {
            assert_eq!(stage.as_str(), name);
        }
    }

    #[test]
    fn serde_representation_matches_as_str() {
        for stage in [
            UploadStage::Starting,
            UploadStage::UploadingToStorage,
            UploadStage::Completed,
        ] {
            let encoded = serde_json::to_value(stage).unwrap();
            assert_eq!(encoded, json!(stage.as_str()));
        }
    }

    #[test]
    fn stages_advance_in_pipeline_order() {
        assert!(UploadStage::Starting < UploadStage::ProcessingVideo);
        assert!(UploadStage::ProcessingVideo < UploadStage::GeneratingThumbnail);
        assert!(UploadStage::GeneratingThumbnail < UploadStage::GettingDuration);
        assert!(UploadStage::GettingDuration < UploadStage::UploadingToStorage);
        assert!(UploadStage::UploadingToStorage < UploadStage::ExtractingAudio);
        assert!(UploadStage::ExtractingAudio < UploadStage::Transcribing);
        assert!(UploadStage::Transcribing < UploadStage::UpdatingSubtitles);
        assert!(UploadStage::UpdatingSubtitles < UploadStage::Completed);
    }

    #[test]
    fn only_completed_and_error_are_terminal() {
        assert!(UploadStage::Completed.is_terminal());
        assert!(UploadStage::Error.is_terminal());
        assert!(!UploadStage::Starting.is_terminal());
        assert!(!UploadStage::UpdatingSubtitles.is_terminal());
    }

    #[tokio::test]
    async fn record_overwrites_with_last_write_wins() {
        let store = MemoryStatusStore::new(Duration::from_secs(300));
        store.record("upload-1", UploadStage::Starting, None).await;
        store
            .record("upload-1", UploadStage::ProcessingVideo, None)
            .await;

        let entry = store.query("upload-1").await.unwrap();
        assert_eq!(entry.stage, UploadStage::ProcessingVideo);
    }

    #[tokio::test]
    async fn unknown_id_yields_none() {
        let store = MemoryStatusStore::new(Duration::from_secs(300));
        assert!(store.query("never-registered").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_entries_are_evicted_after_retention() {
        let store = MemoryStatusStore::new(Duration::from_secs(300));
        store
            .record("upload-1", UploadStage::Completed, Some(json!({"videoId": "v"})))
            .await;

        assert!(store.query("upload-1").await.is_some());

        tokio::time::sleep(Duration::from_secs(301)).await;
        assert!(store.query("upload-1").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn non_terminal_entries_survive_retention_window() {
        let store = MemoryStatusStore::new(Duration::from_secs(300));
        store.record("upload-1", UploadStage::Transcribing, None).await;

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(store.query("upload-1").await.is_some());
    }
}
