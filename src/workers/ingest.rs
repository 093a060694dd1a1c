use tracing::info;

use crate::modules::videos::pipeline;
use crate::state::AppState;

/// Spawn the ingest worker pool. Each accepted upload is processed by
/// exactly one worker; a worker runs its job's stages strictly in order and
/// picks up the next job only when the current one reaches a terminal stage.
pub fn spawn_ingest_workers(state: AppState) {
    let workers = state.config.ingest_workers.max(1);
    info!("🎥 Starting {} ingest worker(s)...", workers);

    for worker_id in 0..workers {
        let state = state.clone();
        tokio::spawn(async move {
            let rx = state.ingest.receiver();
            while let Ok(job) = rx.recv().await {
                info!(worker_id, upload_id = %job.upload_id, "📦 Received ingest job");
                pipeline::run(&state, job).await;
            }
            info!(worker_id, "ingest queue closed, worker exiting");
        });
    }
}
