/*!
 * Authenticated user extractor
 *
 * Responsibility:
 * - access middleware が extensions に入れた CurrentUser を handler に渡す
 * - HTTP / axum 依存は core に閉じ込める
 *
 * Public API:
 * - AuthUser
 */

mod core;

pub use self::core::AuthUser;
