use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use spark_core::error::CoreError;
use spark_core::job::{Job, Step, StepApplied, CANCELLED_REASON};
use spark_core::types::JobId;
use spark_db::repositories::JobRepo;
use spark_db::DbPool;
use spark_pipeline::{StepContext, StepExecutor};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Coordinates job state transitions and the tasks that drive them.
///
/// Step execution always happens outside the job's lock. Its outcome is
/// applied only if the job is still at the step index it was snapshotted
/// at, so concurrent advances and cancellations can never move a job
/// backwards or revive a terminal one.
pub struct JobEngine {
    pool: DbPool,
    executor: Arc<dyn StepExecutor>,
    /// Spawn a driver for every new job.
    autostart: bool,
    /// Parent of every driver token; cancelled on shutdown.
    root: CancellationToken,
    tracker: TaskTracker,
    pub(super) drivers: Mutex<HashMap<JobId, CancellationToken>>,
}

impl JobEngine {
    /// Engine that drives every submitted job to completion in the background.
    pub fn new(pool: DbPool, executor: Arc<dyn StepExecutor>) -> Arc<Self> {
        Arc::new(Self::build(pool, executor, true))
    }

    /// Engine that never advances jobs on its own; callers use
    /// [`advance`](Self::advance) to move them forward.
    pub fn manual(pool: DbPool, executor: Arc<dyn StepExecutor>) -> Arc<Self> {
        Arc::new(Self::build(pool, executor, false))
    }

    fn build(pool: DbPool, executor: Arc<dyn StepExecutor>, autostart: bool) -> Self {
        Self {
            pool,
            executor,
            autostart,
            root: CancellationToken::new(),
            tracker: TaskTracker::new(),
            drivers: Mutex::new(HashMap::new()),
        }
    }

    /// Validate and store a new `pending` job for `owner_id`.
    ///
    /// An invalid locator is rejected before anything is stored.
    pub async fn submit(
        self: &Arc<Self>,
        owner_id: &str,
        resource_locator: &str,
    ) -> Result<Job, CoreError> {
        let job = Job::submit(owner_id, resource_locator)?;
        let job = self.enqueue(job).await;

        tracing::info!(
            job_id = %job.id,
            owner_id = %job.owner_id,
            resource_locator = %job.resource_locator,
            "AI job submitted",
        );
        Ok(job)
    }

    /// Submit a fresh job re-running a failed one.
    pub async fn retry(self: &Arc<Self>, original: &Job) -> Result<Job, CoreError> {
        let job = Job::retry_of(original)?;
        let job = self.enqueue(job).await;

        tracing::info!(
            original_job_id = %original.id,
            new_job_id = %job.id,
            owner_id = %job.owner_id,
            "AI job retried",
        );
        Ok(job)
    }

    async fn enqueue(self: &Arc<Self>, job: Job) -> Job {
        let job = JobRepo::put(&self.pool, job).await;
        if self.autostart {
            self.spawn_driver(job.id).await;
        }
        job
    }

    async fn spawn_driver(self: &Arc<Self>, job_id: JobId) {
        let token = self.root.child_token();
        self.drivers.lock().await.insert(job_id, token.clone());

        let engine = Arc::clone(self);
        self.tracker.spawn(async move { engine.drive(job_id, token).await });
    }

    /// Execute the job's current step and record its outcome.
    ///
    /// Starts a `pending` job first. A terminal job is returned unchanged.
    /// An executor error fails the job with the error's message. Returns
    /// the job as it stands afterwards.
    pub async fn advance(&self, job_id: JobId) -> Result<Job, CoreError> {
        let snapshot = JobRepo::update(&self.pool, job_id, |job| {
            if job.start(Utc::now()) {
                tracing::info!(job_id = %job.id, "AI job started");
            }
            job.clone()
        })
        .await
        .ok_or_else(|| job_not_found(job_id))?;

        let Some(step) = snapshot.current_step() else {
            return Ok(snapshot);
        };
        let index = snapshot.current_step_index;
        let ctx = StepContext::from_job(&snapshot);

        let outcome = self.executor.perform_step(step, &ctx).await;

        JobRepo::update(&self.pool, job_id, |job| {
            let applied = match outcome {
                Ok(outcome) => job
                    .apply_step(index, outcome, Utc::now())
                    .unwrap_or_else(|e| fail_at(job, index, e.to_string())),
                Err(e) => fail_at(job, index, e.to_string()),
            };
            log_step(job, step, applied);
            job.clone()
        })
        .await
        .ok_or_else(|| job_not_found(job_id))
    }

    /// Fail a non-terminal job with the reason `"Cancelled"` and stop its driver.
    pub async fn cancel(&self, job_id: JobId) -> Result<Job, CoreError> {
        let (cancelled, job) = JobRepo::update(&self.pool, job_id, |job| {
            (job.fail(CANCELLED_REASON, Utc::now()), job.clone())
        })
        .await
        .ok_or_else(|| job_not_found(job_id))?;

        if !cancelled {
            return Err(CoreError::Conflict(
                "Job is already in a terminal state and cannot be cancelled".into(),
            ));
        }

        if let Some(token) = self.drivers.lock().await.remove(&job_id) {
            token.cancel();
        }

        tracing::info!(job_id = %job_id, step_index = job.current_step_index, "AI job cancelled");
        Ok(job)
    }

    /// Number of jobs with a live driver task.
    pub async fn active_drivers(&self) -> usize {
        self.drivers.lock().await.len()
    }

    /// Stop every driver and wait up to `timeout` for them to exit.
    ///
    /// Returns `false` if drivers were still running when the timeout hit.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.root.cancel();
        self.tracker.close();
        tokio::time::timeout(timeout, self.tracker.wait()).await.is_ok()
    }
}

/// Fail the job for a step that could not be recorded, unless it has
/// already moved past `index`.
fn fail_at(job: &mut Job, index: usize, reason: String) -> StepApplied {
    if job.current_step_index == index && job.fail(reason, Utc::now()) {
        StepApplied::Failed
    } else {
        StepApplied::Stale
    }
}

fn log_step(job: &Job, step: Step, applied: StepApplied) {
    match applied {
        StepApplied::Advanced => tracing::debug!(
            job_id = %job.id,
            step = step.name(),
            progress = job.progress_percent,
            "AI job step completed",
        ),
        StepApplied::Completed => tracing::info!(
            job_id = %job.id,
            confidence = job.result.as_ref().map(|r| r.confidence),
            "AI job completed",
        ),
        StepApplied::Failed => tracing::warn!(
            job_id = %job.id,
            step = step.name(),
            error = job.error.as_deref().unwrap_or_default(),
            "AI job failed",
        ),
        StepApplied::Stale => tracing::debug!(
            job_id = %job.id,
            step = step.name(),
            "Discarded outcome for a job that moved on",
        ),
    }
}

fn job_not_found(job_id: JobId) -> CoreError {
    CoreError::NotFound {
        entity: "Job",
        id: job_id.to_string(),
    }
}
