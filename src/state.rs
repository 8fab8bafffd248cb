/*
 * Responsibility
 * - shared context bound to the Router (AppState)
 * - Clone is cheap: everything inside is Arc / Clone-cheap
 */
use std::sync::Arc;

use crate::repos::Store;
use crate::services::auth::{AccountService, AuthServices, Authenticator, TokenService};
use crate::services::id_codec::IdCodec;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub id_codec: IdCodec,
    pub tokens: Arc<TokenService>,
    pub authenticator: Arc<Authenticator>,
    pub accounts: Arc<AccountService>,
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
    pub fn new(store: Arc<dyn Store>, id_codec: IdCodec, auth: AuthServices) -> Self {
        Self {
            store,
            id_codec,
            tokens: auth.tokens,
            authenticator: auth.authenticator,
            accounts: auth.accounts,
        }
    }
}
