use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::contacts::{ContactResponse, CreateContactRequest, UpdateContactRequest},
        extractors::{ApiJson, AuthedPrincipal, CurrentContext, public_id::PublicContactId},
    },
    error::AppError,
    repos::models::{Payload, ResourceKind},
    services::resources,
    state::AppState,
};

const KIND: ResourceKind = ResourceKind::Contact;

pub async fn list_contacts(
    State(state): State<AppState>,
    AuthedPrincipal { ctx, .. }: AuthedPrincipal,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    let rows = resources::list(state.store.as_ref(), &ctx, KIND, None).await?;

    let res = rows
        .into_iter()
        .map(|r| ContactResponse::from_resource(&state.id_codec, r))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(res))
}

pub async fn create_contact(
    State(state): State<AppState>,
    AuthedPrincipal { ctx, .. }: AuthedPrincipal,
    ApiJson(req): ApiJson<CreateContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    req.validate()?;

    let created = resources::create(state.store.as_ref(), &ctx, req.into_payload()).await?;
    let res = ContactResponse::from_resource(&state.id_codec, created)?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn get_contact(
    State(state): State<AppState>,
    CurrentContext(ctx): CurrentContext,
    contact_id: PublicContactId,
) -> Result<Json<ContactResponse>, AppError> {
    let found = resources::fetch(state.store.as_ref(), &ctx, KIND, contact_id.id).await?;
    Ok(Json(ContactResponse::from_resource(&state.id_codec, found)?))
}

pub async fn update_contact(
    State(state): State<AppState>,
    AuthedPrincipal { ctx, .. }: AuthedPrincipal,
    contact_id: PublicContactId,
    ApiJson(req): ApiJson<UpdateContactRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    req.validate()?;

    let updated = resources::update(
        state.store.as_ref(),
        &ctx,
        KIND,
        contact_id.id,
        |payload| match payload {
            Payload::Contact(contact) => {
                req.apply(contact);
                Ok(())
            }
            other => Err(AppError::internal(anyhow::anyhow!(
                "expected a contact, loaded a {}",
                other.kind()
            ))),
        },
    )
    .await?;

    Ok(Json(ContactResponse::from_resource(&state.id_codec, updated)?))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    AuthedPrincipal { ctx, .. }: AuthedPrincipal,
    contact_id: PublicContactId,
) -> Result<StatusCode, AppError> {
    resources::delete(state.store.as_ref(), &ctx, KIND, contact_id.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
