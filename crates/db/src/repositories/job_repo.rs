//! Repository for the job table.

use std::sync::Arc;

use spark_core::error::CoreError;
use spark_core::job::Job;
use spark_core::types::JobId;
use tokio::sync::Mutex;

use crate::models::job::JobListQuery;
use crate::DbPool;

/// Provides access to stored [`Job`] records.
pub struct JobRepo;

impl JobRepo {
    /// Insert a job, replacing any record with the same id.
    pub async fn put(pool: &DbPool, job: Job) -> Job {
        let snapshot = job.clone();
        let mut jobs = pool.jobs.write().await;
        jobs.insert(job.id, Arc::new(Mutex::new(job)));
        snapshot
    }

    /// Fetch a job owned by `owner_id`.
    ///
    /// A job owned by someone else is reported exactly like a missing one.
    pub async fn get(pool: &DbPool, id: JobId, owner_id: &str) -> Result<Job, CoreError> {
        match Self::find_by_id(pool, id).await {
            Some(job) if job.owner_id == owner_id => Ok(job),
            _ => Err(CoreError::NotFound {
                entity: "Job",
                id: id.to_string(),
            }),
        }
    }

    /// Fetch a job regardless of owner (admin scope).
    pub async fn find_by_id(pool: &DbPool, id: JobId) -> Option<Job> {
        let entry = Self::entry(pool, id).await?;
        let job = entry.lock().await;
        Some(job.clone())
    }

    /// Apply `f` to the job under its own lock and return what `f` returns.
    ///
    /// Returns `None` when the job does not exist.
    pub async fn update<R>(pool: &DbPool, id: JobId, f: impl FnOnce(&mut Job) -> R) -> Option<R> {
        let entry = Self::entry(pool, id).await?;
        let mut job = entry.lock().await;
        Some(f(&mut *job))
    }

    /// List jobs owned by `owner_id`, newest first.
    pub async fn list_by_owner(pool: &DbPool, owner_id: &str, params: &JobListQuery) -> Vec<Job> {
        Self::list_filtered(pool, params, |job| job.owner_id == owner_id).await
    }

    /// List every job, newest first.
    pub async fn list_all(pool: &DbPool, params: &JobListQuery) -> Vec<Job> {
        Self::list_filtered(pool, params, |_| true).await
    }

    /// Number of stored jobs.
    pub async fn count(pool: &DbPool) -> usize {
        pool.jobs.read().await.len()
    }

    async fn entry(pool: &DbPool, id: JobId) -> Option<Arc<Mutex<Job>>> {
        pool.jobs.read().await.get(&id).cloned()
    }

    async fn list_filtered(
        pool: &DbPool,
        params: &JobListQuery,
        keep: impl Fn(&Job) -> bool,
    ) -> Vec<Job> {
        // Snapshot the entries first so no job lock is taken under the table lock.
        let entries: Vec<Arc<Mutex<Job>>> = pool.jobs.read().await.values().cloned().collect();

        let mut jobs = Vec::with_capacity(entries.len());
        for entry in entries {
            let job = entry.lock().await;
            if keep(&*job) && params.status.map_or(true, |s| job.status == s) {
                jobs.push(job.clone());
            }
        }

        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs.into_iter()
            .skip(params.effective_offset())
            .take(params.effective_limit())
            .collect()
    }
}
