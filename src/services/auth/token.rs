//! Bearer token issue / verify (HS256 JWT).
//!
//! A token carries only the subject id plus bookkeeping claims (`iat`, `exp`,
//! `iss`, `jti`). Role and profile data are never embedded; they are reloaded
//! from the credential store on every request.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    iat: i64,
    exp: i64,
    iss: String,
    jti: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("invalid 'sub' (expected UUID)")]
    InvalidSubject,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies bearer tokens with a single process-wide secret.
///
/// - The secret and the validity window are fixed at construction.
/// - A token issued at `T` is valid for check times in `[T, T + ttl)`.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Duration) -> Self {
        let issuer = issuer.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        // exp is compared against an explicit `now` in `verify_at`
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer,
            ttl,
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<IssuedToken, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = now + self.ttl;
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token against the current clock and return its subject.
    #[cfg(test)]
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::InvalidSubject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-test-secret-test-secret!";

    fn service() -> TokenService {
        TokenService::new(SECRET, "career-guidance-api", Duration::days(30))
    }

    fn at(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(ts, 0).expect("valid timestamp")
    }

    #[test]
    fn issued_token_resolves_to_its_subject() {
        let tokens = service();
        let user_id = Uuid::new_v4();

        let issued = tokens.issue(user_id).expect("issue");
        assert_eq!(tokens.verify(&issued.token).expect("verify"), user_id);
    }

    #[test]
    fn token_is_valid_for_exactly_its_window() {
        let tokens = service();
        let user_id = Uuid::new_v4();
        let issued_at = at(1_700_000_000);
        let window = Duration::days(30).num_seconds();

        let issued = tokens.issue_at(user_id, issued_at).expect("issue");
        assert_eq!(issued.expires_at, at(1_700_000_000 + window));

        for offset in [0, 1, window / 2, window - 1] {
            let now = at(1_700_000_000 + offset);
            assert_eq!(tokens.verify_at(&issued.token, now).expect("in window"), user_id);
        }

        for offset in [window, window + 1, window * 2] {
            let now = at(1_700_000_000 + offset);
            assert!(matches!(
                tokens.verify_at(&issued.token, now),
                Err(TokenError::Expired)
            ));
        }
    }

    #[test]
    fn correctly_signed_token_from_the_past_is_rejected() {
        let tokens = service();
        let issued = tokens
            .issue_at(Uuid::new_v4(), Utc::now() - Duration::days(31))
            .expect("issue");

        assert!(matches!(tokens.verify(&issued.token), Err(TokenError::Expired)));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let other = TokenService::new(
            b"another-secret-another-secret-another!",
            "career-guidance-api",
            Duration::days(30),
        );
        let issued = other.issue(Uuid::new_v4()).expect("issue");

        assert!(matches!(service().verify(&issued.token), Err(TokenError::Jwt(_))));
    }

    #[test]
    fn token_from_another_issuer_is_rejected() {
        let other = TokenService::new(SECRET, "someone-else", Duration::days(30));
        let issued = other.issue(Uuid::new_v4()).expect("issue");

        assert!(matches!(service().verify(&issued.token), Err(TokenError::Jwt(_))));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let tokens = service();
        for raw in ["", "not-a-jwt", "a.b.c"] {
            assert!(tokens.verify(raw).is_err(), "{raw:?} should not verify");
        }
    }

    #[test]
    fn two_tokens_for_the_same_subject_differ() {
        let tokens = service();
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let a = tokens.issue_at(user_id, now).expect("issue");
        let b = tokens.issue_at(user_id, now).expect("issue");

        assert_ne!(a.token, b.token);
        assert_eq!(tokens.verify(&a.token).expect("a"), tokens.verify(&b.token).expect("b"));
    }
}
