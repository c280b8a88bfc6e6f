/*
 * Responsibility
 * - Users の request/response DTO
 * - passwordHash は絶対に含めない
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::user_repo::{ProfilePatch, Role, User};
use crate::services::auth::policy;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("name cannot be empty");
        }
        if let Some(email) = &self.email
            && (email.trim().is_empty() || !email.contains('@') || email.len() > 254)
        {
            return Err("email is invalid");
        }
        if let Some(phone) = &self.phone
            && phone.len() > 32
        {
            return Err("phone must be <= 32 chars");
        }
        Ok(())
    }

    pub fn into_patch(self) -> ProfilePatch {
        ProfilePatch {
            name: self.name,
            email: self.email,
            phone: self.phone,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_admin: bool,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            is_admin: policy::is_admin(&user),
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone.unwrap_or_default(),
            created_at: user.created_at,
        }
    }
}
