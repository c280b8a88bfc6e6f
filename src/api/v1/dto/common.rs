use serde::Serialize;
use uuid::Uuid;

use crate::repos::user_repo::{OwnerSummary, Role};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Owner of a resource, as shown in admin listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<OwnerSummary> for OwnerResponse {
    fn from(owner: OwnerSummary) -> Self {
        Self {
            id: owner.user_id,
            name: owner.name,
            email: owner.email,
            role: owner.role,
        }
    }
}
