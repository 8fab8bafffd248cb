/// Factory: build the auth services from application `Config`.
use std::sync::Arc;

use chrono::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::repos::Store;
use crate::services::auth::{AccountService, Argon2Hasher, Authenticator, TokenService};

#[derive(Clone, Debug)]
pub struct AuthServices {
    pub tokens: Arc<TokenService>,
    pub authenticator: Arc<Authenticator>,
    pub accounts: Arc<AccountService>,
}

pub fn build_auth_services(config: &Config, store: Arc<dyn Store>) -> Result<AuthServices, AppError> {
    let ttl = i64::try_from(config.access_token_ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| AppError::Configuration("ACCESS_TOKEN_TTL_SECONDS out of range".into()))?;

    let tokens = Arc::new(TokenService::new(
        &config.token_secret,
        &config.token_issuer,
        &config.token_audience,
        ttl,
    )?);

    let hasher = Arc::new(
        Argon2Hasher::new(config.argon2_memory_kib, config.argon2_iterations)
            .map_err(|e| AppError::Configuration(e.to_string()))?,
    );

    Ok(AuthServices {
        authenticator: Arc::new(Authenticator::new(tokens.clone(), store.clone())),
        accounts: Arc::new(AccountService::new(store, hasher, tokens.clone())),
        tokens,
    })
}
