/*
 * Responsibility
 * - /notes CRUD handlers
 * - the ownership flow itself lives in services::resources
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::notes::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
        extractors::{ApiJson, AuthedPrincipal, CurrentContext, public_id::PublicNoteId},
    },
    error::AppError,
    repos::models::{Payload, ResourceKind},
    services::resources,
    state::AppState,
};

const KIND: ResourceKind = ResourceKind::Note;

pub async fn list_notes(
    State(state): State<AppState>,
    AuthedPrincipal { ctx, .. }: AuthedPrincipal,
) -> Result<Json<Vec<NoteResponse>>, AppError> {
    let rows = resources::list(state.store.as_ref(), &ctx, KIND, None).await?;

    let res = rows
        .into_iter()
        .map(|r| NoteResponse::from_resource(&state.id_codec, r))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(res))
}

pub async fn create_note(
    State(state): State<AppState>,
    AuthedPrincipal { ctx, .. }: AuthedPrincipal,
    ApiJson(req): ApiJson<CreateNoteRequest>,
) -> Result<(StatusCode, Json<NoteResponse>), AppError> {
    req.validate()?;

    let created = resources::create(state.store.as_ref(), &ctx, req.into_payload()).await?;
    let res = NoteResponse::from_resource(&state.id_codec, created)?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn get_note(
    State(state): State<AppState>,
    CurrentContext(ctx): CurrentContext,
    note_id: PublicNoteId,
) -> Result<Json<NoteResponse>, AppError> {
    let found = resources::fetch(state.store.as_ref(), &ctx, KIND, note_id.id).await?;
    Ok(Json(NoteResponse::from_resource(&state.id_codec, found)?))
}

pub async fn update_note(
    State(state): State<AppState>,
    AuthedPrincipal { ctx, .. }: AuthedPrincipal,
    note_id: PublicNoteId,
    ApiJson(req): ApiJson<UpdateNoteRequest>,
) -> Result<Json<NoteResponse>, AppError> {
    req.validate()?;

    let updated = resources::update(state.store.as_ref(), &ctx, KIND, note_id.id, |payload| {
        match payload {
            Payload::Note(note) => {
                req.apply(note);
                Ok(())
            }
            other => Err(AppError::internal(anyhow::anyhow!(
                "expected a note, loaded a {}",
                other.kind()
            ))),
        }
    })
    .await?;

    Ok(Json(NoteResponse::from_resource(&state.id_codec, updated)?))
}

pub async fn delete_note(
    State(state): State<AppState>,
    AuthedPrincipal { ctx, .. }: AuthedPrincipal,
    note_id: PublicNoteId,
) -> Result<StatusCode, AppError> {
    resources::delete(state.store.as_ref(), &ctx, KIND, note_id.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
