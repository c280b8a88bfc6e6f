/*
 * Responsibility
 * - Assessments (quiz 結果) の request/response DTO
 * - admin 一覧は owner 付き / 素の一覧の二段表示
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::v1::dto::common::OwnerResponse;

const DEFAULT_TITLE: &str = "Assessment";
const DEFAULT_TOTAL: i32 = 100;

#[derive(Debug, Deserialize)]
pub struct SubmitAssessmentRequest {
    pub title: Option<String>,
    pub score: Option<i32>,
    pub total: Option<i32>,
}

/// Submission with defaults applied.
#[derive(Debug, PartialEq, Eq)]
pub struct AssessmentResult {
    pub title: String,
    pub score: i32,
    pub total: i32,
}

impl SubmitAssessmentRequest {
    pub fn into_result(self) -> Result<AssessmentResult, &'static str> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let score = self.score.unwrap_or(0);
        let total = self.total.unwrap_or(DEFAULT_TOTAL);

        if score < 0 || total < 0 {
            return Err("score and total must be non-negative");
        }
        if score > total {
            return Err("score cannot exceed total");
        }

        Ok(AssessmentResult {
            title,
            score,
            total,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub id: String, // encoded
    pub user_id: Uuid,
    pub title: String,
    pub score: i32,
    pub total: i32,
    pub taken_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct EnrichedAssessmentResponse {
    #[serde(flatten)]
    pub assessment: AssessmentResponse,
    pub owner: OwnerResponse,
}

/// Admin listing of every submission; owner-enriched unless the joined read fails.
#[derive(Debug, Serialize)]
#[serde(tag = "view", content = "items", rename_all = "lowercase")]
pub enum AssessmentListing {
    Enriched(Vec<EnrichedAssessmentResponse>),
    Unenriched(Vec<AssessmentResponse>),
}
