pub mod credentials;
pub mod error;
pub mod factory;
pub mod identity;
pub mod password;
pub mod policy;
pub mod token;

pub use credentials::CredentialService;
pub use error::AuthError;
pub use identity::{CurrentUser, IdentityLoader};
pub use token::TokenService;
