use std::sync::Arc;

use axum::http::{HeaderMap, header};
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::Store;
use crate::repos::models::Principal;
use crate::services::auth::context::RequestContext;
use crate::services::auth::token::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

/// Returns the raw token of an `Authorization: Bearer <token>` header.
///
/// Only the exact, case-sensitive `"Bearer "` prefix is recognized. A missing
/// header, a non-UTF-8 value or any other scheme yields `None`.
pub fn extract(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
}

/// Verifies bearer tokens and resolves them to live principals.
#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<TokenService>,
    store: Arc<dyn Store>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn Store>) -> Self {
        Self { tokens, store }
    }

    /// Verifies `raw_token` and loads its principal from the store.
    ///
    /// The lookup is what makes deleting a principal invalidate its tokens.
    pub async fn authenticate(&self, raw_token: &str) -> Result<Principal, AppError> {
        let principal_id: Uuid = self.tokens.verify(raw_token)?;

        self.store
            .load_principal_by_id(principal_id)
            .await?
            .ok_or(AppError::PrincipalNotFound)
    }

    /// Runs the whole per-request step: no token -> anonymous, otherwise exactly
    /// one verification attempt.
    pub async fn context_for(&self, headers: &HeaderMap) -> Result<RequestContext, AppError> {
        let Some(raw_token) = extract(headers) else {
            return Ok(RequestContext::anonymous());
        };

        let principal = self.authenticate(raw_token).await?;
        Ok(RequestContext::authenticated(raw_token.to_string(), principal))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Duration;
    use proptest::prelude::*;

    use super::*;
    use crate::error::ErrorKind;
    use crate::repos::MemoryStore;
    use crate::repos::models::NewPrincipal;

    const SECRET: &str = "authenticator-tests-secret-0123456789";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    async fn setup() -> (Authenticator, Arc<TokenService>, Arc<MemoryStore>, Principal) {
        let tokens = Arc::new(
            TokenService::new(SECRET, "scribe-api", "scribe-api", Duration::hours(1)).unwrap(),
        );
        let store = Arc::new(MemoryStore::new());
        let principal = store
            .insert_principal(NewPrincipal {
                username: "alice".into(),
                display_name: "Alice".into(),
                credential_hash: "x".into(),
            })
            .await
            .unwrap();

        let auth = Authenticator::new(tokens.clone(), store.clone());
        (auth, tokens, store, principal)
    }

    #[test]
    fn extract_requires_exact_prefix() {
        assert_eq!(extract(&headers_with("Bearer abc")), Some("abc"));
        assert_eq!(extract(&headers_with("Bearer ")), Some(""));
        assert_eq!(extract(&headers_with("bearer abc")), None);
        assert_eq!(extract(&headers_with("Basic abc")), None);
        assert_eq!(extract(&headers_with("Bearerabc")), None);
        assert_eq!(extract(&HeaderMap::new()), None);
    }

    proptest! {
        #[test]
        fn extract_ignores_other_schemes(value in "[ -~]{0,64}") {
            prop_assume!(!value.starts_with("Bearer "));
            let headers = headers_with(&value);

            prop_assert_eq!(extract(&headers), None);
            // no state: asking twice gives the same answer
            prop_assert_eq!(extract(&headers), None);
        }
    }

    #[tokio::test]
    async fn no_header_is_anonymous() {
        let (auth, _, _, _) = setup().await;
        let ctx = auth.context_for(&HeaderMap::new()).await.unwrap();
        assert!(!ctx.is_authenticated());
        assert!(ctx.raw_token().is_none());
    }

    #[tokio::test]
    async fn valid_token_resolves_principal() {
        let (auth, tokens, _, alice) = setup().await;
        let issued = tokens.issue(alice.id, Duration::minutes(5)).unwrap();

        let ctx = auth
            .context_for(&headers_with(&format!("Bearer {}", issued.token)))
            .await
            .unwrap();
        assert_eq!(ctx.principal(), Some(&alice));
        assert_eq!(ctx.raw_token(), Some(issued.token.as_str()));
    }

    #[tokio::test]
    async fn presented_garbage_is_not_downgraded_to_anonymous() {
        let (auth, _, _, _) = setup().await;
        let err = auth
            .context_for(&headers_with("Bearer not-a-token"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidToken);
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let (auth, tokens, _, alice) = setup().await;
        let issued = tokens.issue(alice.id, Duration::seconds(-5)).unwrap();

        let err = auth.authenticate(&issued.token).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpiredToken);
    }

    #[tokio::test]
    async fn deleted_principal_is_not_found() {
        let (auth, tokens, store, alice) = setup().await;
        let issued = tokens.issue(alice.id, Duration::minutes(5)).unwrap();

        store.delete_principal(alice.id).await.unwrap();

        let err = auth.authenticate(&issued.token).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PrincipalNotFound);
    }
}
