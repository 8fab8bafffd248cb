/*
 * Responsibility
 * - /users handlers
 * - principals are addressed by UUID (no public id encoding)
 * - a principal can only change or delete itself, so writes live under /users/me
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::{auth::PrincipalSummary, users::UpdateMeRequest},
        extractors::{ApiJson, AuthedPrincipal},
    },
    error::AppError,
    state::AppState,
};

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PrincipalSummary>, AppError> {
    let user_id = Uuid::parse_str(&user_id).map_err(|_| AppError::MalformedIdentifier)?;

    let principal = state
        .store
        .load_principal_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    Ok(Json(principal.into()))
}

pub async fn update_me(
    State(state): State<AppState>,
    AuthedPrincipal { principal, .. }: AuthedPrincipal,
    ApiJson(req): ApiJson<UpdateMeRequest>,
) -> Result<Json<PrincipalSummary>, AppError> {
    req.validate()?;

    let updated = state
        .store
        .update_principal(principal.id, req.display_name.trim())
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    Ok(Json(updated.into()))
}

/// Owned resources go with the principal. Outstanding tokens stop working on
/// their next use because the principal no longer resolves.
pub async fn delete_me(
    State(state): State<AppState>,
    AuthedPrincipal { principal, .. }: AuthedPrincipal,
) -> Result<StatusCode, AppError> {
    if state.store.delete_principal(principal.id).await? {
        tracing::info!(principal_id = %principal.id, "principal deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("user"))
    }
}
