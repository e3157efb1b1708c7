//! Per-job driver task.

use spark_core::types::JobId;
use tokio_util::sync::CancellationToken;

use super::JobEngine;

impl JobEngine {
    /// Advance `job_id` until it is terminal or `cancel` fires.
    ///
    /// A step interrupted by cancellation is dropped before its outcome is
    /// applied; whoever cancelled has already settled the job's state.
    pub(super) async fn drive(&self, job_id: JobId, cancel: CancellationToken) {
        tracing::debug!(job_id = %job_id, "Job driver started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(job_id = %job_id, "Job driver cancelled");
                    break;
                }
                advanced = self.advance(job_id) => match advanced {
                    Ok(job) if job.is_terminal() => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(job_id = %job_id, error = %e, "Job driver aborted");
                        break;
                    }
                }
            }
        }

        self.drivers.lock().await.remove(&job_id);
    }
}
