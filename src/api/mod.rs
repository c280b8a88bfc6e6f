/*
 * Responsibility
 * - API バージョンの束ね (現状 v1 のみ)
 * - どのルートにもマッチしなかった場合の 404 (JSON error body)
 */
pub mod v1;

use crate::error::AppError;

pub async fn fallback() -> AppError {
    AppError::not_found("route")
}
