pub mod auth_ctx;
pub mod json_body;
pub mod public_id;

pub use auth_ctx::AuthUser;
pub use json_body::JsonBody;
