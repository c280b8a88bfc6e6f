use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::user_repo::{Role, User};
use crate::services::auth::policy;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Returned by register and login.
///
/// `isAdmin` is derived from `role` through the access policy, never stored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_admin: bool,
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: User, token: String) -> Self {
        Self {
            is_admin: policy::is_admin(&user),
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token,
        }
    }
}
