/*
 * Responsibility
 * - /appointments 系 handler (本人の予約 / owner-or-admin の参照・更新・キャンセル / admin 操作)
 * - 認可判断は services::auth::policy に委ね、ここでは「誰が owner か」を渡すだけ
 * - admin 一覧は owner 情報付き → 失敗時は素の一覧、の二段構え
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::{
            appointments::{
                AppointmentListing, AppointmentResponse, CancelResponse,
                CreateAppointmentRequest, EnrichedAppointmentResponse, UpdateAppointmentRequest,
                UpdateStatusRequest, parse_status,
            },
            common::MessageResponse,
        },
        extractors::{AuthUser, JsonBody, public_id::PublicAppointmentId},
    },
    error::AppError,
    repos::appointment_repo::{
        Appointment, AppointmentPatch, AppointmentStatus, AppointmentWithOwner, NewAppointment,
    },
    services::{
        auth::{AuthError, policy},
        id_codec::IdCodec,
    },
    state::AppState,
};

pub(crate) fn to_response(codec: &IdCodec, appt: Appointment) -> Result<AppointmentResponse, AppError> {
    Ok(AppointmentResponse {
        id: codec.encode(appt.appointment_id)?,
        user_id: appt.user_id,
        name: appt.name,
        email: appt.email,
        date: appt.date,
        time: appt.time,
        mode: appt.mode,
        notes: appt.notes,
        status: appt.status,
        created_at: appt.created_at,
        updated_at: appt.updated_at,
    })
}

fn to_enriched(
    codec: &IdCodec,
    row: AppointmentWithOwner,
) -> Result<EnrichedAppointmentResponse, AppError> {
    Ok(EnrichedAppointmentResponse {
        appointment: to_response(codec, row.appointment)?,
        owner: row.owner.into(),
    })
}

fn to_responses(
    codec: &IdCodec,
    rows: Vec<Appointment>,
) -> Result<Vec<AppointmentResponse>, AppError> {
    rows.into_iter().map(|a| to_response(codec, a)).collect()
}

async fn load(state: &AppState, appointment_id: PublicAppointmentId) -> Result<Appointment, AppError> {
    state
        .appointments
        .get(appointment_id.id)
        .await?
        .ok_or(AppError::not_found("appointment"))
}

/// Owner-enriched listing first; a failing joined read degrades to the plain rows.
pub(crate) async fn list_for_admin(state: &AppState) -> Result<AppointmentListing, AppError> {
    match state.appointments.list_all_with_owner().await {
        Ok(rows) => {
            let items = rows
                .into_iter()
                .map(|row| to_enriched(&state.id_codec, row))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AppointmentListing::Enriched(items))
        }
        Err(err) => {
            tracing::warn!(error = ?err, "owner-enriched appointment listing failed, falling back");
            let rows = state.appointments.list_all().await?;
            Ok(AppointmentListing::Unenriched(to_responses(&state.id_codec, rows)?))
        }
    }
}

pub async fn my_appointments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let rows = state.appointments.list_by_owner(auth.0.0.id).await?;
    Ok(Json(to_responses(&state.id_codec, rows)?))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(req): JsonBody<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let draft = req
        .into_draft()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let owner = &auth.0.0;
    let appt = state
        .appointments
        .create(NewAppointment {
            user_id: owner.id,
            name: Some(owner.name.clone()),
            email: Some(owner.email.clone()),
            date: draft.date,
            time: draft.time,
            mode: draft.mode,
            notes: draft.notes,
        })
        .await?;

    tracing::info!(
        appointment_id = appt.appointment_id,
        user_id = %owner.id,
        "appointment booked"
    );

    Ok((StatusCode::CREATED, Json(to_response(&state.id_codec, appt)?)))
}

pub async fn all_appointments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<AppointmentListing>, AppError> {
    policy::require_admin(auth.identity())?;
    Ok(Json(list_for_admin(&state).await?))
}

/// Same listing for the admin console; the admin gate already ran.
pub async fn admin_list_appointments(
    State(state): State<AppState>,
) -> Result<Json<AppointmentListing>, AppError> {
    Ok(Json(list_for_admin(&state).await?))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    appointment_id: PublicAppointmentId,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appt = load(&state, appointment_id).await?;
    policy::require_owner_or_admin(auth.identity(), appt.user_id)?;

    Ok(Json(to_response(&state.id_codec, appt)?))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    appointment_id: PublicAppointmentId,
    JsonBody(req): JsonBody<UpdateAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let patch = req
        .into_patch()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let appt = load(&state, appointment_id).await?;
    let current = policy::require_owner_or_admin(auth.identity(), appt.user_id)?;

    // Owners may reschedule, but confirming / completing is an admin decision.
    if patch.status.is_some() && !policy::is_admin(&current.0) {
        return Err(AuthError::Forbidden.into());
    }

    let updated = state
        .appointments
        .update(appt.appointment_id, patch)
        .await?
        .ok_or(AppError::not_found("appointment"))?;

    Ok(Json(to_response(&state.id_codec, updated)?))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    appointment_id: PublicAppointmentId,
) -> Result<Json<CancelResponse>, AppError> {
    let appt = load(&state, appointment_id).await?;
    policy::require_owner_or_admin(auth.identity(), appt.user_id)?;

    let patch = AppointmentPatch {
        status: Some(AppointmentStatus::Cancelled),
        ..Default::default()
    };
    let cancelled = state
        .appointments
        .update(appt.appointment_id, patch)
        .await?
        .ok_or(AppError::not_found("appointment"))?;

    tracing::info!(
        appointment_id = cancelled.appointment_id,
        actor = %auth.0.0.id,
        "appointment cancelled"
    );

    Ok(Json(CancelResponse {
        message: "Appointment cancelled",
        appointment: to_response(&state.id_codec, cancelled)?,
    }))
}

pub async fn update_appointment_status(
    State(state): State<AppState>,
    appointment_id: PublicAppointmentId,
    JsonBody(req): JsonBody<UpdateStatusRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let status = match req.status.as_deref() {
        Some(raw) => parse_status(raw)
            .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?,
        None => return Err(AppError::bad_request("VALIDATION_ERROR", "status is required")),
    };

    let patch = AppointmentPatch {
        status: Some(status),
        ..Default::default()
    };
    let updated = state
        .appointments
        .update(appointment_id.id, patch)
        .await?
        .ok_or(AppError::not_found("appointment"))?;

    Ok(Json(to_response(&state.id_codec, updated)?))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    appointment_id: PublicAppointmentId,
) -> Result<Json<MessageResponse>, AppError> {
    policy::require_admin(auth.identity())?;

    if !state.appointments.delete(appointment_id.id).await? {
        return Err(AppError::not_found("appointment"));
    }

    tracing::info!(appointment_id = appointment_id.id, "appointment removed");
    Ok(Json(MessageResponse::new("Appointment removed")))
}
