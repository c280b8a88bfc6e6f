/*
 * Responsibility
 * - Appointments の request/response DTO
 * - date / mode / status の文字列 → ドメイン型への変換 (不正値は 400)
 * - admin 一覧の「enriched / unenriched」二段表示の形
 */
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::appointment_repo::{
    AppointmentMode, AppointmentPatch, AppointmentStatus,
};
use crate::api::v1::dto::common::OwnerResponse;

const MAX_NOTES_CHARS: usize = 2000;

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (only the date is kept).
fn parse_date(raw: &str) -> Result<NaiveDate, &'static str> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| "date must be YYYY-MM-DD")
}

fn parse_mode(raw: &str) -> Result<AppointmentMode, &'static str> {
    raw.trim()
        .parse()
        .map_err(|_| "mode must be one of online, offline, phone, video")
}

pub fn parse_status(raw: &str) -> Result<AppointmentStatus, &'static str> {
    raw.trim()
        .parse()
        .map_err(|_| "status must be one of pending, confirmed, cancelled, completed")
}

fn check_notes(notes: Option<&str>) -> Result<(), &'static str> {
    match notes {
        Some(n) if n.chars().count() > MAX_NOTES_CHARS => Err("notes must be <= 2000 chars"),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub notes: Option<String>,
}

/// Validated booking fields; owner and contact snapshot are added by the handler.
#[derive(Debug)]
pub struct AppointmentDraft {
    pub date: NaiveDate,
    pub time: String,
    pub mode: AppointmentMode,
    pub notes: String,
}

impl CreateAppointmentRequest {
    pub fn into_draft(self) -> Result<AppointmentDraft, &'static str> {
        let date = match self.date.as_deref() {
            Some(raw) if !raw.trim().is_empty() => parse_date(raw)?,
            _ => return Err("Date is required"),
        };
        let mode = match self.mode.as_deref() {
            Some(raw) if !raw.trim().is_empty() => parse_mode(raw)?,
            _ => AppointmentMode::default(),
        };
        check_notes(self.notes.as_deref())?;

        Ok(AppointmentDraft {
            date,
            time: self.time.unwrap_or_default(),
            mode,
            notes: self.notes.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl UpdateAppointmentRequest {
    pub fn into_patch(self) -> Result<AppointmentPatch, &'static str> {
        check_notes(self.notes.as_deref())?;

        // Empty strings mean "leave as is" for the scalar fields, except notes
        // which may be cleared.
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        Ok(AppointmentPatch {
            date: non_empty(self.date).as_deref().map(parse_date).transpose()?,
            time: non_empty(self.time),
            mode: non_empty(self.mode).as_deref().map(parse_mode).transpose()?,
            notes: self.notes,
            status: non_empty(self.status)
                .as_deref()
                .map(parse_status)
                .transpose()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: String, // encoded
    pub user_id: Uuid,
    // contact snapshot taken at booking time
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

#[derive(Debug, Serialize)]
pub struct EnrichedAppointmentResponse {
    #[serde(flatten)]
    pub appointment: AppointmentResponse,
    pub owner: OwnerResponse,
}

/// Admin listing: owner-enriched when the joined read works, otherwise the
/// plain rows (which still carry the booking-time name/email snapshot).
#[derive(Debug, Serialize)]
#[serde(tag = "view", content = "items", rename_all = "lowercase")]
pub enum AppointmentListing {
    Enriched(Vec<EnrichedAppointmentResponse>),
    Unenriched(Vec<AppointmentResponse>),
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub message: &'static str,
    pub appointment: AppointmentResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_a_parsable_date_and_defaults_the_rest() {
        let req = CreateAppointmentRequest {
            date: None,
            time: None,
            mode: None,
            notes: None,
        };
        assert_eq!(req.into_draft().unwrap_err(), "Date is required");

        let req = CreateAppointmentRequest {
            date: Some("2025-13-40".into()),
            time: None,
            mode: None,
            notes: None,
        };
        assert_eq!(req.into_draft().unwrap_err(), "date must be YYYY-MM-DD");

        let draft = CreateAppointmentRequest {
            date: Some("2025-03-14T09:30:00Z".into()),
            time: None,
            mode: None,
            notes: None,
        }
        .into_draft()
        .expect("draft");
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2025, 3, 14).expect("date"));
        assert_eq!(draft.mode, AppointmentMode::Online);
        assert_eq!(draft.time, "");
        assert_eq!(draft.notes, "");
    }

    #[test]
    fn unknown_mode_or_status_is_rejected() {
        let req = CreateAppointmentRequest {
            date: Some("2025-03-14".into()),
            time: None,
            mode: Some("carrier-pigeon".into()),
            notes: None,
        };
        assert!(req.into_draft().is_err());

        let req = UpdateAppointmentRequest {
            date: None,
            time: None,
            mode: None,
            notes: None,
            status: Some("approved".into()),
        };
        assert!(req.into_patch().is_err());
    }

    #[test]
    fn blank_update_fields_are_left_unchanged() {
        let patch = UpdateAppointmentRequest {
            date: Some("".into()),
            time: Some(" ".into()),
            mode: None,
            notes: Some("".into()),
            status: None,
        }
        .into_patch()
        .expect("patch");

        assert!(patch.date.is_none());
        assert!(patch.time.is_none());
        assert_eq!(patch.notes.as_deref(), Some(""));
    }

    #[test]
    fn listing_is_tagged_by_view() {
        let json = serde_json::to_value(AppointmentListing::Unenriched(Vec::new())).expect("json");
        assert_eq!(json, serde_json::json!({"view": "unenriched", "items": []}));
    }
}
