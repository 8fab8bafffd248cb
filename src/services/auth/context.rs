/*
 * Responsibility
 * - the per-request authentication result handlers see
 * - built once by the access middleware, stored in request extensions, read by extractors
 */
use std::fmt;

use crate::repos::models::Principal;

/// Context attached to every request under `/api/v1`.
///
/// - `Anonymous`: no `Authorization: Bearer` header was presented
/// - `Authenticated`: the token verified and the principal still exists
#[derive(Clone, Default)]
pub struct RequestContext {
    token: Option<String>,
    principal: Option<Principal>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: String, principal: Principal) -> Self {
        Self {
            token: Some(token),
            principal: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn raw_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("principal", &self.principal.as_ref().map(|p| p.id))
            .finish()
    }
}
