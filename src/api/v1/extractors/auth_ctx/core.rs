use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::RequestContext;
use crate::state::AppState;

use super::{AuthedPrincipal, CurrentContext};

// The access middleware inserts RequestContext for every /api/v1 route; if it is
// missing the route was mounted without it.
fn context_of(parts: &Parts) -> Result<RequestContext, AppError> {
    parts
        .extensions
        .get::<RequestContext>()
        .cloned()
        .ok_or_else(|| {
            AppError::internal(anyhow::anyhow!(
                "RequestContext missing: access middleware not applied"
            ))
        })
}

impl FromRequestParts<AppState> for CurrentContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        context_of(parts).map(CurrentContext)
    }
}

impl FromRequestParts<AppState> for AuthedPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = context_of(parts)?;
        let principal = ctx.principal().cloned().ok_or(AppError::Unauthenticated)?;
        Ok(AuthedPrincipal { principal, ctx })
    }
}
