/// Factory: build the auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::repos::user_repo::UserStore;
use crate::services::auth::{CredentialService, IdentityLoader, TokenService};

pub fn build_token_service(config: &Config) -> Arc<TokenService> {
    Arc::new(TokenService::new(
        config.jwt_secret.as_bytes(),
        config.auth_issuer.clone(),
        config.token_ttl,
    ))
}

pub fn build_identity_loader(
    tokens: Arc<TokenService>,
    users: Arc<dyn UserStore>,
) -> Arc<IdentityLoader> {
    Arc::new(IdentityLoader::new(tokens, users))
}

pub fn build_credential_service(users: Arc<dyn UserStore>) -> Arc<CredentialService> {
    Arc::new(CredentialService::new(users))
}
