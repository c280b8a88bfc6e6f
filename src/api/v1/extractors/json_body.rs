/*
 * Responsibility
 * - JSON リクエストボディを受ける extractor (axum::Json の薄いラッパー)
 * - 構文エラー / 型不一致 / Content-Type 不正を AppError (400 VALIDATION_ERROR) に変換
 * - axum 既定の 422 text/plain を API の JSON エラー形式に揃える
 */
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(reject)?;
        Ok(Self(value))
    }
}

fn reject(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection, "request body rejected");

    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge;
    }

    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON body".to_string(),
        other => other.body_text(),
    };
    AppError::bad_request("VALIDATION_ERROR", message)
}
