use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::{CurrentUser, policy};
use crate::state::AppState;

/// Handler で CurrentUser を受け取るための extractor
/// middleware が CurrentUser を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 (ミドルウェア未設定のルート)
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = policy::require_authenticated(parts.extensions.get::<CurrentUser>())?;
        Ok(AuthUser(current.clone()))
    }
}

impl AuthUser {
    pub fn identity(&self) -> Option<&CurrentUser> {
        Some(&self.0)
    }
}
