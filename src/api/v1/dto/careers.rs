/*
 * Responsibility
 * - Careers の request/response DTO
 * - 公開 ID は encode 済みの値を返す (内部 ID を漏らさない)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::career_repo::{CareerPatch, NewCareer};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCareerRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub avg_salary: Option<String>,
    pub education_required: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl CreateCareerRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        match &self.title {
            Some(title) if !title.trim().is_empty() => Ok(()),
            _ => Err("Title is required"),
        }
    }

    pub fn into_new(self) -> NewCareer {
        NewCareer {
            title: self.title.unwrap_or_default().trim().to_string(),
            description: self.description.unwrap_or_default(),
            avg_salary: self.avg_salary.unwrap_or_default(),
            education_required: self.education_required.unwrap_or_default(),
            skills: self.skills,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCareerRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub avg_salary: Option<String>,
    pub education_required: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl UpdateCareerRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        Ok(())
    }

    pub fn into_patch(self) -> CareerPatch {
        CareerPatch {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            avg_salary: self.avg_salary,
            education_required: self.education_required,
            skills: self.skills,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerResponse {
    pub id: String, // encoded
    pub title: String,
    pub description: String,
    pub avg_salary: String,
    pub education_required: String,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
