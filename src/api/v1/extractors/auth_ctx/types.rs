/*
 * Responsibility
 * - the types a handler asks for to see "who is calling"
 * - the access middleware verifies and inserts RequestContext; these only read it
 */
use crate::repos::models::Principal;
use crate::services::auth::RequestContext;

/// The request's context, anonymous or not. For endpoints that serve both.
#[derive(Debug, Clone)]
pub struct CurrentContext(pub RequestContext);

/// An authenticated principal. Extraction fails with 401 for anonymous requests.
///
/// Also carries the full context so handlers can pass it on to services.
#[derive(Debug, Clone)]
pub struct AuthedPrincipal {
    pub principal: Principal,
    pub ctx: RequestContext,
}
