//! Identity loader: `Authorization` header -> freshly loaded user.
//!
//! The token only proves *who* the caller is. Everything else (role included)
//! is read from the credential store on every call, so a role change or a
//! deleted account takes effect on the very next request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::repos::user_repo::{User, UserStore};
use crate::services::auth::error::AuthError;
use crate::services::auth::token::TokenService;

/// The authenticated user for one request. Lives in request extensions and is
/// dropped with the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extract the token from an `Authorization` header value.
///
/// Anything that is not a non-empty `Bearer` credential counts as missing.
pub fn bearer_token(raw: Option<&str>) -> Result<&str, AuthError> {
    let raw = raw.ok_or(AuthError::MissingCredential)?;
    let (scheme, token) = raw
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MissingCredential)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MissingCredential);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token)
}

#[derive(Clone)]
pub struct IdentityLoader {
    tokens: Arc<TokenService>,
    users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for IdentityLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityLoader")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl IdentityLoader {
    pub fn new(tokens: Arc<TokenService>, users: Arc<dyn UserStore>) -> Self {
        Self { tokens, users }
    }

    pub async fn authenticate(&self, raw_header: Option<&str>) -> Result<CurrentUser, AuthError> {
        self.authenticate_at(raw_header, Utc::now()).await
    }

    pub async fn authenticate_at(
        &self,
        raw_header: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<CurrentUser, AuthError> {
        let token = bearer_token(raw_header)?;

        let user_id = self.tokens.verify_at(token, now).map_err(|err| {
            warn!(error = %err, "access token verification failed");
            AuthError::InvalidCredential
        })?;

        // Store failures propagate as-is (500), they are not credential problems.
        let Some(user) = self.users.find_by_id(user_id).await? else {
            warn!(user_id = %user_id, "token subject no longer exists");
            return Err(AuthError::InvalidCredential);
        };

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::repos::memory::MemoryStore;
    use crate::repos::user_repo::{NewUser, Role};

    const SECRET: &[u8] = b"identity-test-secret-identity-test!!";

    struct Fixture {
        store: Arc<MemoryStore>,
        tokens: Arc<TokenService>,
        loader: IdentityLoader,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(TokenService::new(SECRET, "test", Duration::hours(1)));
        let loader = IdentityLoader::new(tokens.clone(), store.clone());
        Fixture {
            store,
            tokens,
            loader,
        }
    }

    async fn seed_user(store: &MemoryStore, email: &str) -> User {
        UserStore::create(
            store,
            NewUser {
                name: "Test".to_string(),
                email: email.to_string(),
                password_hash: "unused".to_string(),
            },
        )
        .await
        .expect("seed user")
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")).expect("ok"), "abc");
        assert_eq!(bearer_token(Some("bearer  abc ")).expect("ok"), "abc");

        for raw in [None, Some(""), Some("Bearer"), Some("Bearer   "), Some("Basic abc"), Some("abc")] {
            assert!(
                matches!(bearer_token(raw), Err(AuthError::MissingCredential)),
                "{raw:?}"
            );
        }
    }

    #[tokio::test]
    async fn valid_token_loads_the_current_user() {
        let fx = fixture();
        let alice = seed_user(&fx.store, "alice@example.com").await;
        let issued = fx.tokens.issue(alice.id).expect("issue");

        let header = format!("Bearer {}", issued.token);
        let current = fx.loader.authenticate(Some(header.as_str())).await.expect("auth");
        assert_eq!(current.0, alice);
    }

    #[tokio::test]
    async fn missing_header_is_missing_credential() {
        let fx = fixture();
        assert!(matches!(
            fx.loader.authenticate(None).await,
            Err(AuthError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn garbage_or_expired_token_is_invalid_credential() {
        let fx = fixture();
        let alice = seed_user(&fx.store, "alice@example.com").await;

        assert!(matches!(
            fx.loader.authenticate(Some("Bearer garbage")).await,
            Err(AuthError::InvalidCredential)
        ));

        let issued_at = Utc::now() - Duration::hours(2);
        let stale = fx.tokens.issue_at(alice.id, issued_at).expect("issue");
        let header = format!("Bearer {}", stale.token);
        assert!(matches!(
            fx.loader.authenticate(Some(header.as_str())).await,
            Err(AuthError::InvalidCredential)
        ));

        // same token, checked inside its window
        let inside = issued_at + Duration::minutes(30);
        assert!(fx.loader.authenticate_at(Some(header.as_str()), inside).await.is_ok());
    }

    #[tokio::test]
    async fn deleted_subject_is_invalid_credential() {
        let fx = fixture();
        let bob = seed_user(&fx.store, "bob@example.com").await;
        let issued = fx.tokens.issue(bob.id).expect("issue");
        fx.store.remove_user(bob.id);

        let header = format!("Bearer {}", issued.token);
        assert!(matches!(
            fx.loader.authenticate(Some(header.as_str())).await,
            Err(AuthError::InvalidCredential)
        ));
    }

    #[tokio::test]
    async fn role_is_read_fresh_on_every_call() {
        let fx = fixture();
        let carol = seed_user(&fx.store, "carol@example.com").await;
        let issued = fx.tokens.issue(carol.id).expect("issue");
        let header = format!("Bearer {}", issued.token);

        let before = fx.loader.authenticate(Some(header.as_str())).await.expect("auth");
        assert_eq!(before.0.role, Role::User);

        UserStore::update_role(fx.store.as_ref(), carol.id, Role::Admin)
            .await
            .expect("promote");
        let after = fx.loader.authenticate(Some(header.as_str())).await.expect("auth");
        assert_eq!(after.0.role, Role::Admin);

        UserStore::update_role(fx.store.as_ref(), carol.id, Role::User)
            .await
            .expect("demote");
        let demoted = fx.loader.authenticate(Some(header.as_str())).await.expect("auth");
        assert_eq!(demoted.0.role, Role::User);
    }
}
