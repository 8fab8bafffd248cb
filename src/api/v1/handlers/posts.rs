/*
 * Responsibility
 * - /posts CRUD handlers
 * - Path ids arrive as public ids and are decoded by the extractor
 * - posts are readable anonymously; writes need the author's token
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::posts::{CreatePostRequest, ListPostsQuery, PostResponse, UpdatePostRequest},
        extractors::{
            ApiJson, ApiQuery, AuthedPrincipal, CurrentContext, public_id::PublicPostId,
        },
    },
    error::AppError,
    repos::models::{Payload, ResourceKind},
    services::resources,
    state::AppState,
};

const KIND: ResourceKind = ResourceKind::Post;

pub async fn list_posts(
    State(state): State<AppState>,
    CurrentContext(ctx): CurrentContext,
    ApiQuery(query): ApiQuery<ListPostsQuery>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let rows = resources::list(state.store.as_ref(), &ctx, KIND, query.author).await?;

    let res = rows
        .into_iter()
        .map(|r| PostResponse::from_resource(&state.id_codec, r))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(res))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthedPrincipal { ctx, .. }: AuthedPrincipal,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    req.validate()?;

    let created = resources::create(state.store.as_ref(), &ctx, req.into_payload()).await?;
    let res = PostResponse::from_resource(&state.id_codec, created)?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn get_post(
    State(state): State<AppState>,
    CurrentContext(ctx): CurrentContext,
    post_id: PublicPostId,
) -> Result<Json<PostResponse>, AppError> {
    let found = resources::fetch(state.store.as_ref(), &ctx, KIND, post_id.id).await?;
    Ok(Json(PostResponse::from_resource(&state.id_codec, found)?))
}

pub async fn update_post(
    State(state): State<AppState>,
    AuthedPrincipal { ctx, .. }: AuthedPrincipal,
    post_id: PublicPostId,
    ApiJson(req): ApiJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    req.validate()?;

    let updated = resources::update(state.store.as_ref(), &ctx, KIND, post_id.id, |payload| {
        match payload {
            Payload::Post(post) => {
                req.apply(post);
                Ok(())
            }
            other => Err(AppError::internal(anyhow::anyhow!(
                "expected a post, loaded a {}",
                other.kind()
            ))),
        }
    })
    .await?;

    Ok(Json(PostResponse::from_resource(&state.id_codec, updated)?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthedPrincipal { ctx, .. }: AuthedPrincipal,
    post_id: PublicPostId,
) -> Result<StatusCode, AppError> {
    resources::delete(state.store.as_ref(), &ctx, KIND, post_id.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
