//! Handlers for login, token refresh, and logout.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use atelier_core::audit::{action_types, entity_types};
use atelier_core::error::CoreError;
use atelier_db::models::audit::CreateAuditLog;
use atelier_db::models::session::CreateSession;
use atelier_db::models::user::UserResponse;
use atelier_db::repositories::{AuditLogRepo, SessionRepo, UserRepo};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh` and `POST /auth/logout`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair plus user profile returned on login/refresh.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

/// POST /api/v1/auth/login
///
/// Verify credentials and issue an access/refresh token pair. Inactive
/// accounts are rejected identically to wrong credentials.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active {
        return Err(invalid());
    }

    let verified = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    let (refresh_token, refresh_hash) = generate_refresh_token();
    let expires_at = chrono::Utc::now()
        + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    let mut tx = state.pool.begin().await?;
    AuditLogRepo::append(
        &mut tx,
        &CreateAuditLog {
            user_id: Some(user.id),
            action_type: action_types::LOGIN.to_string(),
            entity_type: Some(entity_types::USER.to_string()),
            entity_id: Some(user.id),
            old_value: None,
            new_value: None,
            ip_address: None,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(DataResponse {
        data: TokenResponse {
            access_token,
            refresh_token,
            user: user.into(),
        },
    }))
}

/// POST /api/v1/auth/refresh
///
/// Rotate a refresh token: the presented token is revoked and a fresh
/// access/refresh pair is issued.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<impl IntoResponse> {
    let hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_valid_by_hash(&state.pool, &hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account is inactive".into())))?;

    // Rotation: the old token is single-use.
    SessionRepo::revoke_by_hash(&state.pool, &hash).await?;

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    let (refresh_token, refresh_hash) = generate_refresh_token();
    let expires_at = chrono::Utc::now()
        + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    Ok(Json(DataResponse {
        data: TokenResponse {
            access_token,
            refresh_token,
            user: user.into(),
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented refresh token. The access token simply expires.
pub async fn logout(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<impl IntoResponse> {
    let hash = hash_refresh_token(&input.refresh_token);
    SessionRepo::revoke_by_hash(&state.pool, &hash).await?;

    let mut tx = state.pool.begin().await?;
    AuditLogRepo::append(
        &mut tx,
        &CreateAuditLog {
            user_id: Some(auth.user_id),
            action_type: action_types::LOGOUT.to_string(),
            entity_type: Some(entity_types::USER.to_string()),
            entity_id: Some(auth.user_id),
            old_value: None,
            new_value: None,
            ip_address: None,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = auth.user_id, "User logged out");

    Ok(Json(DataResponse {
        data: serde_json::json!({ "logged_out": true }),
    }))
}
