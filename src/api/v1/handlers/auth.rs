/*
 * Responsibility
 * - POST /auth/register, POST /auth/login (認証不要)
 * - 成功時は token を発行して AuthResponse を返す
 * - login 失敗は email 不明 / password 不一致を区別しない
 */
use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::auth::{AuthResponse, LoginRequest, RegisterRequest},
        extractors::JsonBody,
    },
    error::AppError,
    services::auth::AuthError,
    state::AppState,
};

const LOGIN_FAILED: &str = "Invalid email or password";

fn issue_token(state: &AppState, user_id: Uuid) -> Result<String, AppError> {
    let issued = state.tokens.issue(user_id).map_err(|err| {
        tracing::error!(error = %err, user_id = %user_id, "token issue failed");
        AppError::Internal
    })?;
    tracing::debug!(user_id = %user_id, expires_at = %issued.expires_at, "token issued");
    Ok(issued.token)
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let user = state
        .credentials
        .register(&req.name, &req.email, &req.password)
        .await?;

    let token = issue_token(&state, user.id)?;
    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, token))))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state
        .credentials
        .login(&req.email, &req.password)
        .await
        .map_err(|err| match err {
            AuthError::InvalidCredential => AppError::unauthorized(LOGIN_FAILED),
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, "user logged in");

    let token = issue_token(&state, user.id)?;
    Ok(Json(AuthResponse::new(user, token)))
}
