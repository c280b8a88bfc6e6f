/*
 * Responsibility
 * - GET /careers, GET /careers/{id} (カタログ閲覧、認証不要)
 * - /admin/careers 系 CRUD (admin gate の内側でのみ route される)
 * - Path の {id} は公開 ID → extractor で復号化して内部 ID に変換して受け取る
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::{
            careers::{CareerResponse, CreateCareerRequest, UpdateCareerRequest},
            common::MessageResponse,
        },
        extractors::{JsonBody, public_id::PublicCareerId},
    },
    error::AppError,
    repos::career_repo::CareerRow,
    services::id_codec::IdCodec,
    state::AppState,
};

fn row_to_response(codec: &IdCodec, row: CareerRow) -> Result<CareerResponse, AppError> {
    Ok(CareerResponse {
        id: codec.encode(row.career_id)?,
        title: row.title,
        description: row.description,
        avg_salary: row.avg_salary,
        education_required: row.education_required,
        skills: row.skills,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub async fn list_careers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CareerResponse>>, AppError> {
    let rows = state.careers.list().await?;

    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(row_to_response(&state.id_codec, row)?);
    }

    Ok(Json(res))
}

pub async fn get_career(
    State(state): State<AppState>,
    career_id: PublicCareerId,
) -> Result<Json<CareerResponse>, AppError> {
    let row = state
        .careers
        .get(career_id.id)
        .await?
        .ok_or(AppError::not_found("career"))?;

    Ok(Json(row_to_response(&state.id_codec, row)?))
}

pub async fn create_career(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateCareerRequest>,
) -> Result<(StatusCode, Json<CareerResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let row = state.careers.create(req.into_new()).await?;
    tracing::info!(career_id = row.career_id, "career created");

    Ok((StatusCode::CREATED, Json(row_to_response(&state.id_codec, row)?)))
}

pub async fn update_career(
    State(state): State<AppState>,
    career_id: PublicCareerId,
    JsonBody(req): JsonBody<UpdateCareerRequest>,
) -> Result<Json<CareerResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let row = state
        .careers
        .update(career_id.id, req.into_patch())
        .await?
        .ok_or(AppError::not_found("career"))?;

    Ok(Json(row_to_response(&state.id_codec, row)?))
}

pub async fn delete_career(
    State(state): State<AppState>,
    career_id: PublicCareerId,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.careers.delete(career_id.id).await? {
        return Err(AppError::not_found("career"));
    }

    tracing::info!(career_id = career_id.id, "career deleted");
    Ok(Json(MessageResponse::new("Career deleted")))
}
