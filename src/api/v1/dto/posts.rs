/*
 * Responsibility
 * - Posts request/response DTOs
 * - public ids are returned encoded (store ids never leak)
 * - the author is always the caller; it is not part of the request
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Checks, char_len};
use crate::error::AppError;
use crate::repos::models::{Payload, PostPayload, Resource};
use crate::services::id_codec::IdCodec;

const TITLE_MAX: usize = 200;
const CONTENT_MAX: usize = 20_000;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut checks = Checks::new();
        checks.require(!self.title.trim().is_empty(), "title", "title is required");
        checks.require(
            char_len(&self.title) <= TITLE_MAX,
            "title",
            "title must be <= 200 chars",
        );
        checks.require(
            !self.content.trim().is_empty(),
            "content",
            "content is required",
        );
        checks.require(
            char_len(&self.content) <= CONTENT_MAX,
            "content",
            "content must be <= 20000 chars",
        );
        checks.finish()
    }

    pub fn into_payload(self) -> Payload {
        Payload::Post(PostPayload {
            title: self.title,
            content: self.content,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut checks = Checks::new();
        if let Some(title) = &self.title {
            checks.require(!title.trim().is_empty(), "title", "title cannot be empty");
            checks.require(
                char_len(title) <= TITLE_MAX,
                "title",
                "title must be <= 200 chars",
            );
        }
        if let Some(content) = &self.content {
            checks.require(
                !content.trim().is_empty(),
                "content",
                "content cannot be empty",
            );
            checks.require(
                char_len(content) <= CONTENT_MAX,
                "content",
                "content must be <= 20000 chars",
            );
        }
        checks.finish()
    }

    pub fn apply(self, post: &mut PostPayload) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
    }
}

/// `GET /posts?author=<uuid>`
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub author: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: String, // encoded
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostResponse {
    pub fn from_resource(codec: &IdCodec, resource: Resource) -> Result<Self, AppError> {
        let id = codec.encode(resource.id())?;
        let author_id = resource.owner_id();
        let (created_at, updated_at) = (resource.created_at, resource.updated_at);

        let Payload::Post(post) = resource.into_payload() else {
            return Err(AppError::internal(anyhow::anyhow!("resource {id} is not a post")));
        };

        Ok(Self {
            id,
            title: post.title,
            content: post.content,
            author_id,
            created_at,
            updated_at,
        })
    }
}
