//! Handlers for the `/ai/jobs` resource.
//!
//! All endpoints require authentication via [`AuthUser`]. Sellers only ever
//! see their own jobs; a job owned by someone else is reported as not
//! found. Admins can see and act on every job.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use spark_core::error::CoreError;
use spark_core::job::{Job, JobView};
use spark_core::types::JobId;
use spark_db::models::job::JobListQuery;
use spark_db::repositories::JobRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /ai/jobs`. A missing locator is treated as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitJobRequest {
    #[serde(alias = "imageUrl")]
    pub resource_locator: String,
}

/// Response for submit and retry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCreated {
    pub job_id: JobId,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a job the caller may see.
///
/// Malformed ids, unknown ids and other owners' jobs all produce the same
/// `NotFound`.
async fn find_visible(state: &AppState, raw_id: &str, auth: &AuthUser) -> AppResult<Job> {
    let not_found = || CoreError::NotFound {
        entity: "Job",
        id: raw_id.to_string(),
    };
    let job_id: JobId = raw_id.parse().map_err(|_| not_found())?;

    let job = if auth.is_admin() {
        JobRepo::find_by_id(&state.pool, job_id)
            .await
            .ok_or_else(not_found)?
    } else {
        JobRepo::get(&state.pool, job_id, &auth.user_id).await?
    };
    Ok(job)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/ai/jobs
///
/// Submit a listing enhancement job. Returns as soon as the job is stored
/// as `pending`; steps run in the background.
pub async fn submit_job(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<SubmitJobRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let job = state
        .engine
        .submit(&auth.user_id, &input.resource_locator)
        .await?;

    Ok(Json(DataResponse {
        data: JobCreated { job_id: job.id },
    }))
}

/// GET /api/v1/ai/jobs
///
/// List jobs newest first. Admins see every job; sellers see their own.
/// Supports optional `status`, `limit` and `offset` query parameters.
pub async fn list_jobs(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> AppResult<impl IntoResponse> {
    let jobs = if auth.is_admin() {
        JobRepo::list_all(&state.pool, &params).await
    } else {
        JobRepo::list_by_owner(&state.pool, &auth.user_id, &params).await
    };

    let views: Vec<JobView> = jobs.iter().map(Job::view).collect();
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/ai/jobs/{id}
pub async fn get_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let job = find_visible(&state, &job_id, &auth).await?;
    Ok(Json(DataResponse { data: job.view() }))
}

/// POST /api/v1/ai/jobs/{id}/cancel
///
/// Returns 204 on success, 409 if the job already finished.
pub async fn cancel_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let job = find_visible(&state, &job_id, &auth).await?;
    state.engine.cancel(job.id).await?;

    tracing::info!(job_id = %job.id, user_id = %auth.user_id, "Job cancel requested");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/ai/jobs/{id}/retry
///
/// Only failed jobs can be retried. The new job links back through
/// `retryOfJobId`; the original is left untouched.
pub async fn retry_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let original = find_visible(&state, &job_id, &auth).await?;
    let job = state.engine.retry(&original).await?;

    Ok(Json(DataResponse {
        data: JobCreated { job_id: job.id },
    }))
}
