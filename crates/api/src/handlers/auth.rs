//! Handlers for the `/auth` resource (register, login, refresh, logout).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use spark_core::error::CoreError;
use spark_core::roles::ROLE_SELLER;
use spark_db::models::session::CreateSession;
use spark_db::models::user::{CreateUser, User, UserInfo};
use spark_db::repositories::{SessionRepo, UserRepo};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`. Missing fields count as empty.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "sellerName is required"))]
    pub seller_name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "sellerId is required"))]
    pub seller_id: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`. `email` also accepts a seller id.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserInfo,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a seller account. Does not log the seller in.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            seller_id: input.seller_id,
            seller_name: input.seller_name,
            email: input.email,
            password_hash,
            role: ROLE_SELLER.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, seller_id = %user.seller_id, "Seller registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Seller registered successfully",
            user: UserInfo::from(&user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email (or seller id) and password.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(input) = payload?;
    input.validate()?;

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let user = UserRepo::find_by_login(&state.pool, &input.email)
        .await
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = %user.id, "Failed login attempt");
        return Err(invalid());
    }

    UserRepo::record_successful_login(&state.pool, &user.id).await;
    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(create_auth_response(&state, &user).await?))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a new token pair. The old refresh
/// token stops working.
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(input) = payload?;
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::take(&state.pool, &token_hash)
        .await
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, &session.user_id)
        .await
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(Json(create_auth_response(&state, &user).await?))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the caller. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> StatusCode {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, &auth_user.user_id).await;
    tracing::info!(user_id = %auth_user.user_id, revoked, "User logged out");
    StatusCode::NO_CONTENT
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, store the session, and build the response.
async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(&user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id.clone(),
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserInfo::from(user),
    })
}
