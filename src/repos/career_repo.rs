/*
 * Responsibility
 * - careers CRUD (catalog)
 * - 読み取りは public、書き込みは admin console から
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, FromRow)]
pub struct CareerRow {
    #[sqlx(rename = "careerId")]
    pub career_id: i64,

    pub title: String,
    pub description: String,

    #[sqlx(rename = "avgSalary")]
    pub avg_salary: String,

    #[sqlx(rename = "educationRequired")]
    pub education_required: String,

    pub skills: Vec<String>,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCareer {
    pub title: String,
    pub description: String,
    pub avg_salary: String,
    pub education_required: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CareerPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub avg_salary: Option<String>,
    pub education_required: Option<String>,
    pub skills: Option<Vec<String>>,
}

#[async_trait]
pub trait CareerStore: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<CareerRow>>;
    async fn get(&self, career_id: i64) -> RepoResult<Option<CareerRow>>;
    async fn create(&self, new_career: NewCareer) -> RepoResult<CareerRow>;
    async fn update(&self, career_id: i64, patch: CareerPatch) -> RepoResult<Option<CareerRow>>;
    async fn delete(&self, career_id: i64) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgCareerStore {
    pool: PgPool,
}

impl PgCareerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CareerStore for PgCareerStore {
    async fn list(&self) -> RepoResult<Vec<CareerRow>> {
        let rows = sqlx::query_as::<_, CareerRow>(
            r#"
            SELECT
                "careerId", title, description, "avgSalary", "educationRequired", skills,
                "createdAt", "updatedAt"
            FROM careers
            ORDER BY "createdAt" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, career_id: i64) -> RepoResult<Option<CareerRow>> {
        let row = sqlx::query_as::<_, CareerRow>(
            r#"
            SELECT
                "careerId", title, description, "avgSalary", "educationRequired", skills,
                "createdAt", "updatedAt"
            FROM careers
            WHERE "careerId" = $1
            "#,
        )
        .bind(career_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, new_career: NewCareer) -> RepoResult<CareerRow> {
        let row = sqlx::query_as::<_, CareerRow>(
            r#"
            INSERT INTO careers (title, description, "avgSalary", "educationRequired", skills)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                "careerId", title, description, "avgSalary", "educationRequired", skills,
                "createdAt", "updatedAt"
            "#,
        )
        .bind(&new_career.title)
        .bind(&new_career.description)
        .bind(&new_career.avg_salary)
        .bind(&new_career.education_required)
        .bind(&new_career.skills)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, career_id: i64, patch: CareerPatch) -> RepoResult<Option<CareerRow>> {
        let row = sqlx::query_as::<_, CareerRow>(
            r#"
            UPDATE careers
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                "avgSalary" = COALESCE($4, "avgSalary"),
                "educationRequired" = COALESCE($5, "educationRequired"),
                skills = COALESCE($6, skills),
                "updatedAt" = now()
            WHERE "careerId" = $1
            RETURNING
                "careerId", title, description, "avgSalary", "educationRequired", skills,
                "createdAt", "updatedAt"
            "#,
        )
        .bind(career_id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.avg_salary)
        .bind(patch.education_required)
        .bind(patch.skills)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, career_id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM careers
            WHERE "careerId" = $1
            "#,
        )
        .bind(career_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
