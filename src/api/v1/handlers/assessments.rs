/*
 * Responsibility
 * - /assessments 系 handler (本人の結果一覧 / 提出 / owner-or-admin の参照)
 * - 全件一覧と削除は admin のみ
 * - 全件一覧は owner 情報付き → 失敗時は素の一覧 (appointments と同じ二段構え)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::{
            assessments::{
                AssessmentListing, AssessmentResponse, EnrichedAssessmentResponse,
                SubmitAssessmentRequest,
            },
            common::MessageResponse,
        },
        extractors::{AuthUser, JsonBody, public_id::PublicAssessmentId},
    },
    error::AppError,
    repos::assessment_repo::{AssessmentRow, AssessmentWithOwner, NewAssessment},
    services::{auth::policy, id_codec::IdCodec},
    state::AppState,
};

fn row_to_response(codec: &IdCodec, row: AssessmentRow) -> Result<AssessmentResponse, AppError> {
    Ok(AssessmentResponse {
        id: codec.encode(row.assessment_id)?,
        user_id: row.user_id,
        title: row.title,
        score: row.score,
        total: row.total,
        taken_at: row.taken_at,
        created_at: row.created_at,
    })
}

fn rows_to_response(
    codec: &IdCodec,
    rows: Vec<AssessmentRow>,
) -> Result<Vec<AssessmentResponse>, AppError> {
    rows.into_iter().map(|r| row_to_response(codec, r)).collect()
}

fn to_enriched(
    codec: &IdCodec,
    row: AssessmentWithOwner,
) -> Result<EnrichedAssessmentResponse, AppError> {
    Ok(EnrichedAssessmentResponse {
        assessment: row_to_response(codec, row.assessment)?,
        owner: row.owner.into(),
    })
}

async fn list_for_admin(state: &AppState) -> Result<AssessmentListing, AppError> {
    match state.assessments.list_all_with_owner().await {
        Ok(rows) => {
            let items = rows
                .into_iter()
                .map(|row| to_enriched(&state.id_codec, row))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AssessmentListing::Enriched(items))
        }
        Err(err) => {
            tracing::warn!(error = ?err, "owner-enriched assessment listing failed, falling back");
            let rows = state.assessments.list_all().await?;
            Ok(AssessmentListing::Unenriched(rows_to_response(&state.id_codec, rows)?))
        }
    }
}

pub async fn my_assessments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<AssessmentResponse>>, AppError> {
    let rows = state.assessments.list_by_owner(auth.0.0.id).await?;
    Ok(Json(rows_to_response(&state.id_codec, rows)?))
}

pub async fn submit_assessment(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(req): JsonBody<SubmitAssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentResponse>), AppError> {
    let result = req
        .into_result()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let row = state
        .assessments
        .create(NewAssessment {
            user_id: auth.0.0.id,
            title: result.title,
            score: result.score,
            total: result.total,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(row_to_response(&state.id_codec, row)?)))
}

pub async fn list_assessments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<AssessmentListing>, AppError> {
    policy::require_admin(auth.identity())?;
    Ok(Json(list_for_admin(&state).await?))
}

pub async fn get_assessment(
    State(state): State<AppState>,
    auth: AuthUser,
    assessment_id: PublicAssessmentId,
) -> Result<Json<AssessmentResponse>, AppError> {
    let row = state
        .assessments
        .get(assessment_id.id)
        .await?
        .ok_or(AppError::not_found("assessment"))?;

    policy::require_owner_or_admin(auth.identity(), row.user_id)?;

    Ok(Json(row_to_response(&state.id_codec, row)?))
}

pub async fn delete_assessment(
    State(state): State<AppState>,
    auth: AuthUser,
    assessment_id: PublicAssessmentId,
) -> Result<Json<MessageResponse>, AppError> {
    policy::require_admin(auth.identity())?;

    if !state.assessments.delete(assessment_id.id).await? {
        return Err(AppError::not_found("assessment"));
    }

    tracing::info!(assessment_id = assessment_id.id, "assessment deleted");
    Ok(Json(MessageResponse::new("Assessment deleted")))
}
