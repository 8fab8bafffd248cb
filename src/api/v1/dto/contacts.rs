/*
 * Responsibility
 * - Contacts request/response DTOs
 * - email / phone are optional and can be cleared with an explicit null
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Checks, char_len, nullable};
use crate::error::AppError;
use crate::repos::models::{ContactPayload, Payload, Resource};
use crate::services::id_codec::IdCodec;

const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 254;
const PHONE_MAX: usize = 32;

fn check_email(checks: &mut Checks, email: &str) {
    let shaped = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    checks.require(shaped, "email", "email is not a valid address");
    checks.require(
        char_len(email) <= EMAIL_MAX,
        "email",
        "email must be <= 254 chars",
    );
}

fn check_phone(checks: &mut Checks, phone: &str) {
    checks.require(
        phone.chars().any(|c| c.is_ascii_digit())
            && phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')')),
        "phone",
        "phone may only contain digits, spaces and + - ( )",
    );
    checks.require(
        char_len(phone) <= PHONE_MAX,
        "phone",
        "phone must be <= 32 chars",
    );
}

fn check_name(checks: &mut Checks, name: &str, empty_message: &'static str) {
    checks.require(!name.trim().is_empty(), "name", empty_message);
    checks.require(
        char_len(name) <= NAME_MAX,
        "name",
        "name must be <= 100 chars",
    );
}

#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CreateContactRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut checks = Checks::new();
        check_name(&mut checks, &self.name, "name is required");
        if let Some(email) = &self.email {
            check_email(&mut checks, email);
        }
        if let Some(phone) = &self.phone {
            check_phone(&mut checks, phone);
        }
        checks.finish()
    }

    pub fn into_payload(self) -> Payload {
        Payload::Contact(ContactPayload {
            name: self.name,
            email: self.email,
            phone: self.phone,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
}

impl UpdateContactRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut checks = Checks::new();
        if let Some(name) = &self.name {
            check_name(&mut checks, name, "name cannot be empty");
        }
        if let Some(Some(email)) = &self.email {
            check_email(&mut checks, email);
        }
        if let Some(Some(phone)) = &self.phone {
            check_phone(&mut checks, phone);
        }
        checks.finish()
    }

    pub fn apply(self, contact: &mut ContactPayload) {
        if let Some(name) = self.name {
            contact.name = name;
        }
        if let Some(email) = self.email {
            contact.email = email;
        }
        if let Some(phone) = self.phone {
            contact.phone = phone;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: String, // encoded
    pub owner_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactResponse {
    pub fn from_resource(codec: &IdCodec, resource: Resource) -> Result<Self, AppError> {
        let id = codec.encode(resource.id())?;
        let owner_id = resource.owner_id();
        let (created_at, updated_at) = (resource.created_at, resource.updated_at);

        let Payload::Contact(contact) = resource.into_payload() else {
            return Err(AppError::internal(anyhow::anyhow!(
                "resource {id} is not a contact"
            )));
        };

        Ok(Self {
            id,
            owner_id,
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            created_at,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactPayload {
        ContactPayload {
            name: "Bob".into(),
            email: Some("bob@example.com".into()),
            phone: Some("+1 555 0100".into()),
        }
    }

    #[test]
    fn null_clears_missing_keeps() {
        let req: UpdateContactRequest =
            serde_json::from_str(r#"{"email": null}"#).unwrap();
        assert_eq!(req.email, Some(None));
        assert_eq!(req.phone, None);

        let mut c = contact();
        req.apply(&mut c);
        assert_eq!(c.email, None);
        assert_eq!(c.phone.as_deref(), Some("+1 555 0100"));
    }

    #[test]
    fn value_replaces() {
        let req: UpdateContactRequest =
            serde_json::from_str(r#"{"name": "Robert", "phone": "555-0199"}"#).unwrap();
        assert!(req.validate().is_ok());

        let mut c = contact();
        req.apply(&mut c);
        assert_eq!(c.name, "Robert");
        assert_eq!(c.phone.as_deref(), Some("555-0199"));
        assert_eq!(c.email.as_deref(), Some("bob@example.com"));
    }

    #[test]
    fn malformed_email_and_phone_are_rejected() {
        let req = CreateContactRequest {
            name: "Bob".into(),
            email: Some("not-an-address".into()),
            phone: Some("call me".into()),
        };
        match req.validate() {
            Err(AppError::Validation(fields)) => {
                let names: Vec<_> = fields.iter().map(|f| f.field).collect();
                assert_eq!(names, ["email", "phone"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
