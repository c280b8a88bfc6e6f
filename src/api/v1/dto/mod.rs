/*
 * Responsibility
 * - v1 の request/response DTO
 * - JSON のキーは camelCase (フロントエンドとの互換)
 * - 公開 ID (careers/appointments/assessments) は encode 済みの文字列で返す
 */
pub mod appointments;
pub mod assessments;
pub mod auth;
pub mod careers;
pub mod common;
pub mod users;
