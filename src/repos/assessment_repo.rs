/*
 * Responsibility
 * - assessments (quiz results) の保存と参照
 * - 1 件ごとに owner (userId) を 1 人だけ持つ
 * - admin 一覧用に users との JOIN 版 (owner の name / email 付き) も持つ
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoResult;
use crate::repos::user_repo::{OwnerColumns, OwnerSummary};

#[derive(Debug, Clone, FromRow)]
pub struct AssessmentRow {
    #[sqlx(rename = "assessmentId")]
    pub assessment_id: i64,

    #[sqlx(rename = "userId")]
    pub user_id: Uuid,

    pub title: String,
    pub score: i32,
    pub total: i32,

    #[sqlx(rename = "takenAt")]
    pub taken_at: DateTime<Utc>,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AssessmentWithOwner {
    pub assessment: AssessmentRow,
    pub owner: OwnerSummary,
}

#[derive(Debug, FromRow)]
struct AssessmentOwnerRow {
    #[sqlx(flatten)]
    assessment: AssessmentRow,
    #[sqlx(flatten)]
    owner: OwnerColumns,
}

#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub user_id: Uuid,
    pub title: String,
    pub score: i32,
    pub total: i32,
}

#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn list_by_owner(&self, user_id: Uuid) -> RepoResult<Vec<AssessmentRow>>;
    async fn list_all(&self) -> RepoResult<Vec<AssessmentRow>>;
    async fn list_all_with_owner(&self) -> RepoResult<Vec<AssessmentWithOwner>>;
    async fn get(&self, assessment_id: i64) -> RepoResult<Option<AssessmentRow>>;
    async fn create(&self, new_assessment: NewAssessment) -> RepoResult<AssessmentRow>;
    async fn delete(&self, assessment_id: i64) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgAssessmentStore {
    pool: PgPool,
}

impl PgAssessmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssessmentStore for PgAssessmentStore {
    async fn list_by_owner(&self, user_id: Uuid) -> RepoResult<Vec<AssessmentRow>> {
        let rows = sqlx::query_as::<_, AssessmentRow>(
            r#"
            SELECT "assessmentId", "userId", title, score, total, "takenAt", "createdAt"
            FROM assessments
            WHERE "userId" = $1
            ORDER BY "createdAt" DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_all(&self) -> RepoResult<Vec<AssessmentRow>> {
        let rows = sqlx::query_as::<_, AssessmentRow>(
            r#"
            SELECT "assessmentId", "userId", title, score, total, "takenAt", "createdAt"
            FROM assessments
            ORDER BY "createdAt" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_all_with_owner(&self) -> RepoResult<Vec<AssessmentWithOwner>> {
        let rows = sqlx::query_as::<_, AssessmentOwnerRow>(
            r#"
            SELECT
                a."assessmentId", a."userId", a.title, a.score, a.total, a."takenAt",
                a."createdAt",
                u.name AS "ownerName", u.email AS "ownerEmail", u.role AS "ownerRole"
            FROM assessments a
            JOIN users u ON u."userId" = a."userId"
            ORDER BY a."createdAt" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> RepoResult<AssessmentWithOwner> {
                let owner = row.owner.into_summary(row.assessment.user_id)?;
                Ok(AssessmentWithOwner {
                    assessment: row.assessment,
                    owner,
                })
            })
            .collect()
    }

    async fn get(&self, assessment_id: i64) -> RepoResult<Option<AssessmentRow>> {
        let row = sqlx::query_as::<_, AssessmentRow>(
            r#"
            SELECT "assessmentId", "userId", title, score, total, "takenAt", "createdAt"
            FROM assessments
            WHERE "assessmentId" = $1
            "#,
        )
        .bind(assessment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, new_assessment: NewAssessment) -> RepoResult<AssessmentRow> {
        let row = sqlx::query_as::<_, AssessmentRow>(
            r#"
            INSERT INTO assessments ("userId", title, score, total)
            VALUES ($1, $2, $3, $4)
            RETURNING "assessmentId", "userId", title, score, total, "takenAt", "createdAt"
            "#,
        )
        .bind(new_assessment.user_id)
        .bind(&new_assessment.title)
        .bind(new_assessment.score)
        .bind(new_assessment.total)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, assessment_id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM assessments
            WHERE "assessmentId" = $1
            "#,
        )
        .bind(assessment_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
