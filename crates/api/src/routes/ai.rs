//! Route definitions for the `/ai` resource.
//!
//! All endpoints require authentication.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{ai_jobs, uploads};
use crate::state::AppState;

/// Headroom above the file size for multipart boundaries and headers.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Routes mounted at `/ai`.
///
/// ```text
/// GET    /jobs                -> list_jobs
/// POST   /jobs                -> submit_job
/// GET    /jobs/{id}           -> get_job
/// POST   /jobs/{id}/cancel    -> cancel_job
/// POST   /jobs/{id}/retry     -> retry_job
/// POST   /uploads             -> upload_image
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/jobs", get(ai_jobs::list_jobs).post(ai_jobs::submit_job))
        .route("/jobs/{id}", get(ai_jobs::get_job))
        .route("/jobs/{id}/cancel", post(ai_jobs::cancel_job))
        .route("/jobs/{id}/retry", post(ai_jobs::retry_job))
        .route(
            "/uploads",
            post(uploads::upload_image).layer(DefaultBodyLimit::max(
                max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
            )),
        )
}
