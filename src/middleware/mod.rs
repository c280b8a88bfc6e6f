/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (access / admin gate), cors, http 共通 layer, security headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
