pub mod accounts;
pub mod authenticator;
pub mod context;
pub mod factory;
pub mod guard;
pub mod password;
pub mod token;

pub use accounts::AccountService;
pub use authenticator::Authenticator;
pub use context::RequestContext;
pub use factory::{AuthServices, build_auth_services};
pub use guard::{Decision, DenyReason, Operation, OwnershipGuard};
pub use password::{Argon2Hasher, CredentialHasher};
pub use token::TokenService;
