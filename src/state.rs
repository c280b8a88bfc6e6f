/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - store (users/careers/appointments/assessments), id_codec, auth core の各 service
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - store は trait object で持つ (本番は Pg*Store、テストは MemoryStore)
 */
use std::sync::Arc;

use crate::repos::{
    appointment_repo::AppointmentStore, assessment_repo::AssessmentStore,
    career_repo::CareerStore, user_repo::UserStore,
};
use crate::services::auth::{CredentialService, IdentityLoader, TokenService, factory};
use crate::services::id_codec::IdCodec;

#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub careers: Arc<dyn CareerStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub assessments: Arc<dyn AssessmentStore>,
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub careers: Arc<dyn CareerStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub assessments: Arc<dyn AssessmentStore>,
    pub id_codec: IdCodec,
    pub tokens: Arc<TokenService>,
    pub identity: Arc<IdentityLoader>,
    pub credentials: Arc<CredentialService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("id_codec", &self.id_codec)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(stores: Stores, id_codec: IdCodec, tokens: Arc<TokenService>) -> Self {
        let identity = factory::build_identity_loader(tokens.clone(), stores.users.clone());
        let credentials = factory::build_credential_service(stores.users.clone());

        Self {
            users: stores.users,
            careers: stores.careers,
            appointments: stores.appointments,
            assessments: stores.assessments,
            id_codec,
            tokens,
            identity,
            credentials,
        }
    }
}
