pub mod ai;
pub mod auth;
pub mod health;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register seller (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /ai/jobs                                         list, submit
/// /ai/jobs/{id}                                    get status
/// /ai/jobs/{id}/cancel                             cancel (POST)
/// /ai/jobs/{id}/retry                              retry a failed job (POST)
/// /ai/uploads                                      upload image (multipart)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/ai", ai::router(config.max_upload_bytes))
}
