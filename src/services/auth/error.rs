use thiserror::Error;

use crate::repos::error::RepoError;

/// Failures of the authentication / authorization core.
///
/// Display strings are safe to show to clients; store and hashing details are
/// only logged.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not authorized, no token")]
    MissingCredential,

    // bad signature, expired, malformed, or subject no longer exists
    #[error("Not authorized, token failed")]
    InvalidCredential,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Not allowed")]
    Forbidden,

    #[error("User already exists")]
    DuplicateIdentity,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("credential store error")]
    Store(#[from] RepoError),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
