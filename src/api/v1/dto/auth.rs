/*
 * Responsibility
 * - register / login request and response DTOs
 * - the secret never appears in Debug output
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Checks, char_len};
use crate::error::AppError;
use crate::repos::models::Principal;
use crate::services::auth::token::IssuedToken;

pub const IDENTIFIER_MIN: usize = 3;
pub const IDENTIFIER_MAX: usize = 32;
pub const DISPLAY_NAME_MAX: usize = 64;
pub const SECRET_MIN: usize = 8;
pub const SECRET_MAX: usize = 128;

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

pub(crate) fn check_display_name(checks: &mut Checks, display_name: &str) {
    checks.require(
        !display_name.trim().is_empty(),
        "display_name",
        "display_name is required",
    );
    checks.require(
        char_len(display_name) <= DISPLAY_NAME_MAX,
        "display_name",
        "display_name must be <= 64 chars",
    );
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub identifier: String,
    pub display_name: String,
    pub secret: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("identifier", &self.identifier)
            .field("display_name", &self.display_name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut checks = Checks::new();

        let len = char_len(&self.identifier);
        checks.require(
            (IDENTIFIER_MIN..=IDENTIFIER_MAX).contains(&len),
            "identifier",
            "identifier must be 3-32 chars",
        );
        checks.require(
            self.identifier.chars().all(is_identifier_char),
            "identifier",
            "identifier may only contain letters, digits, '_', '-' and '.'",
        );
        check_display_name(&mut checks, &self.display_name);

        let len = char_len(&self.secret);
        checks.require(
            (SECRET_MIN..=SECRET_MAX).contains(&len),
            "secret",
            "secret must be 8-128 chars",
        );

        checks.finish()
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub secret: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

impl LoginRequest {
    /// Only presence is checked; format rules would leak which identifiers can exist.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut checks = Checks::new();
        checks.require(
            !self.identifier.is_empty(),
            "identifier",
            "identifier is required",
        );
        checks.require(!self.secret.is_empty(), "secret", "secret is required");
        checks.finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PrincipalSummary {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Principal> for PrincipalSummary {
    fn from(p: Principal) -> Self {
        Self {
            id: p.id,
            username: p.username,
            display_name: p.display_name,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub principal: PrincipalSummary,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
}

impl LoginResponse {
    pub fn new(principal: Principal, issued: IssuedToken) -> Self {
        Self {
            principal: principal.into(),
            expires_in: (issued.expires_at - issued.issued_at).num_seconds(),
            expires_at: issued.expires_at,
            token: issued.token,
            token_type: "Bearer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(identifier: &str, display_name: &str, secret: &str) -> RegisterRequest {
        RegisterRequest {
            identifier: identifier.into(),
            display_name: display_name.into(),
            secret: secret.into(),
        }
    }

    fn failing_fields(err: AppError) -> Vec<&'static str> {
        match err {
            AppError::Validation(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(register("alice_01", "Alice", "correct horse").validate().is_ok());
    }

    #[test]
    fn every_bad_field_is_reported() {
        let err = register("a b", " ", "short").validate().unwrap_err();
        let fields = failing_fields(err);
        assert!(fields.contains(&"identifier"));
        assert!(fields.contains(&"display_name"));
        assert!(fields.contains(&"secret"));
    }

    #[test]
    fn secret_is_not_debug_printed() {
        let printed = format!("{:?}", register("alice", "Alice", "hunter2-hunter2"));
        assert!(!printed.contains("hunter2"));

        let login = LoginRequest {
            identifier: "alice".into(),
            secret: "hunter2-hunter2".into(),
        };
        assert!(!format!("{login:?}").contains("hunter2"));
    }

    #[test]
    fn login_only_checks_presence() {
        let ok = LoginRequest {
            identifier: "x".into(),
            secret: "y".into(),
        };
        assert!(ok.validate().is_ok());

        let empty = LoginRequest {
            identifier: String::new(),
            secret: String::new(),
        };
        assert_eq!(failing_fields(empty.validate().unwrap_err()), ["identifier", "secret"]);
    }
}
