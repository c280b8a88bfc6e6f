/*
 * Responsibility
 * - ドメインサービス (auth core, public id codec)
 */
pub mod auth;
pub mod id_codec;
