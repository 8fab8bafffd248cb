use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::Store;
use crate::repos::models::{NewPrincipal, Principal};
use crate::services::auth::password::CredentialHasher;
use crate::services::auth::token::{IssuedToken, TokenService};

/// Registration and login. The only place credential hashes are produced or read.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<TokenService>,
    // verified against when the identifier is unknown, so both failures cost a hash
    decoy_hash: Arc<OnceCell<String>>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub principal: Principal,
    pub token: IssuedToken,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn Store>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Computes the decoy hash ahead of the first login.
    pub async fn warm_up(&self) -> Result<(), AppError> {
        self.decoy_hash().await.map(|_| ())
    }

    /// Inputs are expected to be validated by the caller.
    pub async fn register(
        &self,
        username: &str,
        display_name: &str,
        secret: &str,
    ) -> Result<Principal, AppError> {
        let credential_hash = self.hash_blocking(secret.to_string()).await?;

        let principal = self
            .store
            .insert_principal(NewPrincipal {
                username: username.to_string(),
                display_name: display_name.to_string(),
                credential_hash,
            })
            .await?;

        info!(principal_id = %principal.id, "principal registered");
        Ok(principal)
    }

    /// Unknown identifier and wrong secret both end in `InvalidCredentials`,
    /// and both run one hash verification.
    pub async fn login(&self, username: &str, secret: &str) -> Result<LoginOutcome, AppError> {
        let credential = self.store.find_credential(username).await?;

        let stored = match &credential {
            Some(c) => c.credential_hash.clone(),
            None => self.decoy_hash().await?.clone(),
        };
        let verified = self.verify_blocking(secret.to_string(), stored).await?;

        let Some(credential) = credential else {
            debug!("login for unknown identifier");
            return Err(AppError::InvalidCredentials);
        };
        if !verified {
            debug!(principal_id = %credential.principal.id, "login with wrong secret");
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(credential.principal.id, self.tokens.default_ttl())?;

        info!(principal_id = %credential.principal.id, "login succeeded");
        Ok(LoginOutcome {
            principal: credential.principal,
            token,
        })
    }

    async fn decoy_hash(&self) -> Result<&String, AppError> {
        self.decoy_hash
            .get_or_try_init(|| self.hash_blocking(Uuid::new_v4().to_string()))
            .await
    }

    async fn verify_blocking(&self, secret: String, stored: String) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&secret, &stored))
            .await
            .map_err(AppError::internal)
    }

    async fn hash_blocking(&self, secret: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(AppError::internal)??;
        Ok(hash)
    }
}
