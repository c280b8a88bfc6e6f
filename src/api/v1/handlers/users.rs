/*
 * Responsibility
 * - GET/PUT /users/me (本人のプロフィール)
 * - GET /users, GET /admin/users (admin のみ)
 * - PATCH /admin/users/{id}/role (role 変更は policy::set_role を通す)
 * - users は UUID をそのまま扱う (公開 ID 変換なし)
 */
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::users::{UpdateProfileRequest, UpdateRoleRequest, UserResponse},
        extractors::{AuthUser, JsonBody},
    },
    error::AppError,
    repos::error::RepoError,
    services::auth::{AuthError, policy},
    state::AppState,
};

/// The identity was loaded for this very request, so it is already current.
pub async fn get_me(auth: AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(auth.0.0))
}

pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let user_id = auth.0.0.id;
    let user = state
        .users
        .update_profile(user_id, req.into_patch())
        .await
        .map_err(|err| match err {
            RepoError::Conflict => AuthError::DuplicateIdentity.into(),
            other => AppError::from(other),
        })?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(user.into()))
}

pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    policy::require_admin(auth.identity())?;

    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn update_user_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    JsonBody(req): JsonBody<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let target = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    let decided = policy::set_role(auth.identity(), &target, &req.role)?;

    let updated = state
        .users
        .update_role(decided.id, decided.role)
        .await?
        .ok_or(AppError::not_found("user"))?;

    tracing::info!(
        actor = %auth.0.0.id,
        user_id = %updated.id,
        role = %updated.role,
        "user role changed"
    );

    Ok(Json(updated.into()))
}
