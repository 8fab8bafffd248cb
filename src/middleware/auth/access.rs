//! Bearer token verification -> `RequestContext` in request extensions.
//!
//! - no `Authorization: Bearer` header: anonymous context, request continues
//! - header present: exactly one verification attempt; any failure ends the request
//! - handlers read the context through `CurrentContext` / `AuthedPrincipal`

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// Applies the authentication middleware to every route of `router`.
///
/// ```ignore
/// let v1 = middleware::auth::access::apply(api::v1::routes(), state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8's from_fn cannot take a State extractor, so pass it explicitly
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = match state.authenticator.context_for(req.headers()).await {
        Ok(ctx) => ctx,
        Err(err) => {
            tracing::warn!(
                kind = ?err.kind(),
                method = %req.method(),
                path = %req.uri().path(),
                "bearer authentication failed"
            );
            return Err(err);
        }
    };

    if let Some(principal) = ctx.principal() {
        tracing::debug!(principal_id = %principal.id, "request authenticated");
    }

    // middleware -> extractor hand-off
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
