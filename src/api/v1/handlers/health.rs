/*
 * Responsibility
 * - GET /health (疎通用、認証なし)
 * - GET /admin/health (admin gate まで通ることの確認用)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

pub async fn admin_health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"ok": true})))
}
