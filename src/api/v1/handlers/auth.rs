/*
 * Responsibility
 * - POST /auth/register, POST /auth/login, GET /auth/me
 * - login failures never say whether the identifier exists
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::auth::{LoginRequest, LoginResponse, PrincipalSummary, RegisterRequest},
        extractors::{ApiJson, AuthedPrincipal},
    },
    error::AppError,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<PrincipalSummary>), AppError> {
    req.validate()?;

    let principal = state
        .accounts
        .register(&req.identifier, req.display_name.trim(), &req.secret)
        .await?;

    Ok((StatusCode::CREATED, Json(principal.into())))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate()?;

    let outcome = state.accounts.login(&req.identifier, &req.secret).await?;
    Ok(Json(LoginResponse::new(outcome.principal, outcome.token)))
}

pub async fn me(AuthedPrincipal { principal, .. }: AuthedPrincipal) -> Json<PrincipalSummary> {
    Json(principal.into())
}
