use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

use super::dto::UploadMeta;

/// Scratch directory owned by exactly one pipeline invocation. Dropping the
/// workspace removes the raw upload, the transcoded video and the thumbnail
/// on every exit path.
#[derive(Debug)]
pub struct JobWorkspace {
    dir: TempDir,
}

impl JobWorkspace {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: TempDir::with_prefix("reel-upload-")?,
        })
    }

    pub fn join(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// One accepted upload, handed from the HTTP handler to the worker pool.
/// Owning the workspace ties temp-file lifetime to the job itself.
#[derive(Debug)]
pub struct IngestJob {
    pub upload_id: String,
    pub user_id: Uuid,
    pub meta: UploadMeta,
    pub original_filename: String,
    pub raw_path: PathBuf,
    pub workspace: JobWorkspace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dropping_the_workspace_removes_its_files() {
        let workspace = JobWorkspace::new().unwrap();
        let raw = workspace.join("raw-upload");
        tokio::fs::write(&raw, b"payload").await.unwrap();
        let dir = workspace.path().to_path_buf();

        assert!(raw.exists());
        drop(workspace);
        assert!(!raw.exists());
        assert!(!dir.exists());
    }
}
