/*
 * Responsibility
 * - 永続化層 (sqlx/Postgres) の公開
 * - 各 store は trait で定義し、AppState には Arc<dyn ...> で載せる
 */
pub mod appointment_repo;
pub mod assessment_repo;
pub mod career_repo;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod user_repo;
