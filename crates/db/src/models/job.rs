//! Query DTOs for the job table. The record itself is
//! [`spark_core::job::Job`].

use serde::Deserialize;
use spark_core::job::JobStatus;

/// Default page size for job listings.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Upper bound on the page size for job listings.
pub const MAX_LIST_LIMIT: usize = 100;

/// Query parameters for `GET /api/v1/ai/jobs`.
#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    /// Filter by status.
    pub status: Option<JobStatus>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<usize>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<usize>,
}

impl JobListQuery {
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT)
    }

    pub fn effective_offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}
