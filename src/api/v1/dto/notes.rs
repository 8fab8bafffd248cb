/*
 * Responsibility
 * - Notes request/response DTOs
 * - notes are private: readable by any signed-in principal, listed only for the owner
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Checks, char_len};
use crate::error::AppError;
use crate::repos::models::{NotePayload, Payload, Resource};
use crate::services::id_codec::IdCodec;

const TITLE_MAX: usize = 200;
const BODY_MAX: usize = 10_000;

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl CreateNoteRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut checks = Checks::new();
        checks.require(!self.title.trim().is_empty(), "title", "title is required");
        checks.require(
            char_len(&self.title) <= TITLE_MAX,
            "title",
            "title must be <= 200 chars",
        );
        checks.require(
            char_len(&self.body) <= BODY_MAX,
            "body",
            "body must be <= 10000 chars",
        );
        checks.finish()
    }

    pub fn into_payload(self) -> Payload {
        Payload::Note(NotePayload {
            title: self.title,
            body: self.body,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl UpdateNoteRequest {
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
        if let Some(body) = &self.body {
            checks.require(
                char_len(body) <= BODY_MAX,
                "body",
                "body must be <= 10000 chars",
            );
        }
        checks.finish()
    }

    pub fn apply(self, note: &mut NotePayload) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(body) = self.body {
            note.body = body;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: String, // encoded
    pub owner_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NoteResponse {
    pub fn from_resource(codec: &IdCodec, resource: Resource) -> Result<Self, AppError> {
        let id = codec.encode(resource.id())?;
        let owner_id = resource.owner_id();
        let (created_at, updated_at) = (resource.created_at, resource.updated_at);

        let Payload::Note(note) = resource.into_payload() else {
            return Err(AppError::internal(anyhow::anyhow!("resource {id} is not a note")));
        };

        Ok(Self {
            id,
            owner_id,
            title: note.title,
            body: note.body,
            created_at,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_update_keeps_untouched_fields() {
        let mut note = NotePayload {
            title: "old".into(),
            body: "keep me".into(),
        };
        UpdateNoteRequest {
            title: Some("new".into()),
            body: None,
        }
        .apply(&mut note);

        assert_eq!(note.title, "new");
        assert_eq!(note.body, "keep me");
    }

    #[test]
    fn blank_title_is_rejected_on_create_and_update() {
        let create = CreateNoteRequest {
            title: "   ".into(),
            body: String::new(),
        };
        assert!(create.validate().is_err());

        let update = UpdateNoteRequest {
            title: Some(String::new()),
            body: None,
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn response_encodes_the_id() {
        let codec = IdCodec::new(8, "abcdefghijklmnopqrstuvwxyz0123456789").unwrap();
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let resource = Resource::from_parts(
            7,
            owner,
            Payload::Note(NotePayload {
                title: "t".into(),
                body: "b".into(),
            }),
            now,
            now,
        );

        let res = NoteResponse::from_resource(&codec, resource).unwrap();
        assert_ne!(res.id, "7");
        assert_eq!(codec.decode(&res.id).unwrap(), 7);
        assert_eq!(res.owner_id, owner);
    }
}
