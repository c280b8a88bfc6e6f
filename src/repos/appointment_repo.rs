/*
 * Responsibility
 * - appointments CRUD
 * - userId (owner) の FK (CASCADE) 前提
 * - admin 一覧用に users との JOIN 版 (enriched) と素の一覧 (bare) の二段構え
 */
use std::{fmt, str::FromStr};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::user_repo::{OwnerColumns, OwnerSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentMode {
    #[default]
    Online,
    Offline,
    Phone,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {field}: {value}")]
pub struct InvalidEnumValue {
    pub field: &'static str,
    pub value: String,
}

impl AppointmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Phone => "phone",
            Self::Video => "video",
        }
    }
}

impl FromStr for AppointmentMode {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            "phone" => Ok(Self::Phone),
            "video" => Ok(Self::Video),
            other => Err(InvalidEnumValue {
                field: "mode",
                value: other.to_string(),
            }),
        }
    }
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(InvalidEnumValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub appointment_id: i64,
    pub user_id: Uuid,
    // name/email snapshot of the owner at booking time
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub mode: AppointmentMode,
    pub notes: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AppointmentWithOwner {
    pub appointment: Appointment,
    pub owner: OwnerSummary,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub mode: AppointmentMode,
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentPatch {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub mode: Option<AppointmentMode>,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn list_by_owner(&self, user_id: Uuid) -> RepoResult<Vec<Appointment>>;
    async fn list_all(&self) -> RepoResult<Vec<Appointment>>;
    async fn list_all_with_owner(&self) -> RepoResult<Vec<AppointmentWithOwner>>;
    async fn get(&self, appointment_id: i64) -> RepoResult<Option<Appointment>>;
    async fn create(&self, new_appointment: NewAppointment) -> RepoResult<Appointment>;
    async fn update(
        &self,
        appointment_id: i64,
        patch: AppointmentPatch,
    ) -> RepoResult<Option<Appointment>>;
    async fn delete(&self, appointment_id: i64) -> RepoResult<bool>;
}

#[derive(Debug, FromRow)]
struct AppointmentRow {
    #[sqlx(rename = "appointmentId")]
    appointment_id: i64,
    #[sqlx(rename = "userId")]
    user_id: Uuid,
    name: Option<String>,
    email: Option<String>,
    date: NaiveDate,
    time: String,
    mode: String,
    notes: String,
    status: String,
    #[sqlx(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct AppointmentOwnerRow {
    #[sqlx(flatten)]
    appointment: AppointmentRow,
    #[sqlx(flatten)]
    owner: OwnerColumns,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = RepoError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let invalid = |e: InvalidEnumValue| RepoError::InvalidRow(e.to_string());

        Ok(Appointment {
            appointment_id: row.appointment_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            date: row.date,
            time: row.time,
            mode: row.mode.parse().map_err(invalid)?,
            notes: row.notes,
            status: row.status.parse().map_err(invalid)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<AppointmentOwnerRow> for AppointmentWithOwner {
    type Error = RepoError;

    fn try_from(row: AppointmentOwnerRow) -> Result<Self, Self::Error> {
        let appointment = Appointment::try_from(row.appointment)?;

        let owner = row.owner.into_summary(appointment.user_id)?;
        Ok(AppointmentWithOwner { appointment, owner })
    }
}

const APPOINTMENT_COLUMNS: &str = r#"
    "appointmentId", "userId", name, email, date, time, mode, notes, status,
    "createdAt", "updatedAt"
"#;

#[derive(Clone, Debug)]
pub struct PgAppointmentStore {
    pool: PgPool,
}

impl PgAppointmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn list_by_owner(&self, user_id: Uuid) -> RepoResult<Vec<Appointment>> {
        let sql = format!(
            r#"SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE "userId" = $1 ORDER BY "createdAt" DESC"#
        );
        let rows = sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Appointment::try_from).collect()
    }

    async fn list_all(&self) -> RepoResult<Vec<Appointment>> {
        let sql =
            format!(r#"SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY "createdAt" DESC"#);
        let rows = sqlx::query_as::<_, AppointmentRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Appointment::try_from).collect()
    }

    async fn list_all_with_owner(&self) -> RepoResult<Vec<AppointmentWithOwner>> {
        let rows = sqlx::query_as::<_, AppointmentOwnerRow>(
            r#"
            SELECT
                a."appointmentId", a."userId", a.name, a.email, a.date, a.time, a.mode,
                a.notes, a.status, a."createdAt", a."updatedAt",
                u.name AS "ownerName", u.email AS "ownerEmail", u.role AS "ownerRole"
            FROM appointments a
            JOIN users u ON u."userId" = a."userId"
            ORDER BY a."createdAt" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AppointmentWithOwner::try_from).collect()
    }

    async fn get(&self, appointment_id: i64) -> RepoResult<Option<Appointment>> {
        let sql =
            format!(r#"SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE "appointmentId" = $1"#);
        let row = sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(appointment_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Appointment::try_from).transpose()
    }

    async fn create(&self, new_appointment: NewAppointment) -> RepoResult<Appointment> {
        let sql = format!(
            r#"
            INSERT INTO appointments ("userId", name, email, date, time, mode, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(new_appointment.user_id)
            .bind(new_appointment.name)
            .bind(new_appointment.email)
            .bind(new_appointment.date)
            .bind(new_appointment.time)
            .bind(new_appointment.mode.as_str())
            .bind(new_appointment.notes)
            .fetch_one(&self.pool)
            .await?;

        Appointment::try_from(row)
    }

    async fn update(
        &self,
        appointment_id: i64,
        patch: AppointmentPatch,
    ) -> RepoResult<Option<Appointment>> {
        let sql = format!(
            r#"
            UPDATE appointments
            SET
                date = COALESCE($2, date),
                time = COALESCE($3, time),
                mode = COALESCE($4, mode),
                notes = COALESCE($5, notes),
                status = COALESCE($6, status),
                "updatedAt" = now()
            WHERE "appointmentId" = $1
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(appointment_id)
            .bind(patch.date)
            .bind(patch.time)
            .bind(patch.mode.map(|m| m.as_str()))
            .bind(patch.notes)
            .bind(patch.status.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await?;

        row.map(Appointment::try_from).transpose()
    }

    async fn delete(&self, appointment_id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM appointments
            WHERE "appointmentId" = $1
            "#,
        )
        .bind(appointment_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
