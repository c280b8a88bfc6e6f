use std::sync::{Arc, OnceLock};

use tracing::{debug, error, info};

use crate::repos::error::RepoError;
use crate::repos::user_repo::{NewUser, User, UserStore, normalize_email};
use crate::services::auth::error::AuthError;
use crate::services::auth::password;

const MIN_PASSWORD_CHARS: usize = 6;
const MAX_EMAIL_CHARS: usize = 254;

/// Registration and login on top of a `UserStore`.
///
/// - Secrets are hashed on a blocking worker thread (Argon2 is CPU bound).
/// - Login never tells an unknown email apart from a wrong password.
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService").finish_non_exhaustive()
    }
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn register(&self, name: &str, email: &str, secret: &str) -> Result<User, AuthError> {
        let name = name.trim();
        let email = normalize_email(email);
        validate_registration(name, &email, secret)?;

        if self.users.find_by_email(&email).await?.is_some() {
            debug!(email = %email, "registration rejected: email already exists");
            return Err(AuthError::DuplicateIdentity);
        }

        let password_hash = hash_on_worker(secret.to_string()).await?;

        // Two concurrent registrations can both pass the pre-check; the unique
        // index decides.
        let user = self
            .users
            .create(NewUser {
                name: name.to_string(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepoError::Conflict => AuthError::DuplicateIdentity,
                other => AuthError::Store(other),
            })?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn login(&self, email: &str, secret: &str) -> Result<User, AuthError> {
        let found = self.users.find_by_email(email).await?;

        let Some(creds) = found else {
            // Burn a comparable amount of time so the response does not reveal
            // whether the email exists.
            if let Some(dummy) = dummy_hash() {
                verify_on_worker(secret.to_string(), dummy.to_string()).await?;
            }
            return Err(AuthError::InvalidCredential);
        };

        if verify_on_worker(secret.to_string(), creds.password_hash).await? {
            Ok(creds.user)
        } else {
            debug!(user_id = %creds.user.id, "login rejected: secret mismatch");
            Err(AuthError::InvalidCredential)
        }
    }
}

fn validate_registration(name: &str, email: &str, secret: &str) -> Result<(), AuthError> {
    if name.is_empty() {
        return Err(AuthError::invalid_argument("name is required"));
    }
    if email.is_empty() || email.len() > MAX_EMAIL_CHARS || !email.contains('@') {
        return Err(AuthError::invalid_argument("a valid email is required"));
    }
    if secret.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::invalid_argument(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

async fn hash_on_worker(secret: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || password::hash_password(&secret))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| {
            error!(error = %e, "failed to hash password");
            AuthError::Hashing(e.to_string())
        })
}

async fn verify_on_worker(candidate: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || password::verify_password(&candidate, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| password::hash_password("dummy-password-for-timing").ok())
        .as_deref()
}
