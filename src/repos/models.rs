/*
 * Responsibility
 * - values exchanged with the store (Principal, Resource, payloads)
 * - owner / kind of a Resource are fixed at construction
 */
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An identity that can log in and own resources.
///
/// The credential hash is deliberately not part of this type; see [`StoredCredential`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Principal plus its credential hash. Only the login path ever sees this.
#[derive(Clone)]
pub struct StoredCredential {
    pub principal: Principal,
    pub credential_hash: String,
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("principal", &self.principal)
            .field("credential_hash", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct NewPrincipal {
    pub username: String,
    pub display_name: String,
    pub credential_hash: String,
}

impl fmt::Debug for NewPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPrincipal")
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Note,
    Post,
    Contact,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Note => "note",
            ResourceKind::Post => "post",
            ResourceKind::Contact => "contact",
        }
    }

    /// Whether anonymous callers may read resources of this kind.
    pub fn is_public_read(&self) -> bool {
        matches!(self, ResourceKind::Post)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown resource kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ResourceKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "note" => Ok(ResourceKind::Note),
            "post" => Ok(ResourceKind::Post),
            "contact" => Ok(ResourceKind::Contact),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePayload {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Kind-tagged body of a resource. Stored as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    Note(NotePayload),
    Post(PostPayload),
    Contact(ContactPayload),
}

impl Payload {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Payload::Note(_) => ResourceKind::Note,
            Payload::Post(_) => ResourceKind::Post,
            Payload::Contact(_) => ResourceKind::Contact,
        }
    }
}

/// A stored resource.
///
/// `id` and `owner_id` are only settable through [`Resource::from_parts`], which the
/// stores call when materializing a row. Handlers can change the payload, never the
/// owner, and never the payload's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    id: i64,
    owner_id: Uuid,
    payload: Payload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    pub fn from_parts(
        id: i64,
        owner_id: Uuid,
        payload: Payload,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            payload,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn kind(&self) -> ResourceKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Replaces the payload if it has the same kind. Returns `false` otherwise.
    pub fn replace_payload(&mut self, payload: Payload) -> bool {
        if payload.kind() != self.kind() {
            return false;
        }
        self.payload = payload;
        true
    }
}

#[derive(Debug, Clone)]
pub struct NewResource {
    pub owner_id: Uuid,
    pub payload: Payload,
}
