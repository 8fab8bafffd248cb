/*
 * Responsibility
 * - the shared AppError taxonomy
 * - IntoResponse (HTTP status / JSON error body) as the single translation point
 * - From conversions for token / store / id codec / hashing / config errors
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::repos::StoreError;
use crate::services::auth::password::HashError;
use crate::services::auth::token::TokenError;
use crate::services::id_codec::IdCodecError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Internal classification, independent of the wire status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    MalformedIdentifier,
    Unauthenticated,
    InvalidToken,
    ExpiredToken,
    PrincipalNotFound,
    Forbidden,
    NotFound,
    DuplicateKey,
    PayloadTooLarge,
    Timeout,
    Configuration,
    Unclassified,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldError>),
    #[error("malformed identifier")]
    MalformedIdentifier,
    #[error("authentication required")]
    Unauthenticated,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token ({0})")]
    InvalidToken(&'static str),
    #[error("token expired")]
    ExpiredToken,
    #[error("token principal no longer exists")]
    PrincipalNotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("duplicate key: {field}")]
    DuplicateKey { field: &'static str },
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("request timed out")]
    RequestTimeout,
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn validation(field: &'static str, message: &'static str) -> Self {
        Self::Validation(vec![FieldError { field, message }])
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::MalformedIdentifier => ErrorKind::MalformedIdentifier,
            AppError::Unauthenticated | AppError::InvalidCredentials => ErrorKind::Unauthenticated,
            AppError::InvalidToken(_) => ErrorKind::InvalidToken,
            AppError::ExpiredToken => ErrorKind::ExpiredToken,
            AppError::PrincipalNotFound => ErrorKind::PrincipalNotFound,
            AppError::Forbidden => ErrorKind::Forbidden,
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            AppError::PayloadTooLarge => ErrorKind::PayloadTooLarge,
            AppError::RequestTimeout => ErrorKind::Timeout,
            AppError::Configuration(_) => ErrorKind::Configuration,
            AppError::Internal(_) => ErrorKind::Unclassified,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::MalformedIdentifier | ErrorKind::DuplicateKey => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::Unauthenticated
            | ErrorKind::InvalidToken
            | ErrorKind::ExpiredToken
            | ErrorKind::PrincipalNotFound => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::Timeout => StatusCode::REQUEST_TIMEOUT,
            ErrorKind::Configuration | ErrorKind::Unclassified => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (code, message, fields) = match self {
            AppError::Validation(fields) => {
                ("VALIDATION_FAILED", "request validation failed".into(), fields)
            }
            AppError::MalformedIdentifier => ("INVALID_ID", "invalid id".into(), vec![]),
            AppError::Unauthenticated => {
                ("UNAUTHENTICATED", "authentication required".into(), vec![])
            }
            AppError::InvalidCredentials => (
                "INVALID_CREDENTIALS",
                "invalid identifier or secret".into(),
                vec![],
            ),
            // The deleted-principal case is reported like any other dead token.
            AppError::InvalidToken(_) | AppError::PrincipalNotFound => {
                ("INVALID_TOKEN", "invalid token".into(), vec![])
            }
            AppError::ExpiredToken => ("TOKEN_EXPIRED", "token expired".into(), vec![]),
            AppError::Forbidden => (
                "FORBIDDEN",
                "you do not own this resource".into(),
                vec![],
            ),
            AppError::NotFound { resource } => {
                ("NOT_FOUND", format!("{resource} not found."), vec![])
            }
            AppError::DuplicateKey { field } => {
                ("DUPLICATE_KEY", format!("{field} is already taken"), vec![])
            }
            AppError::PayloadTooLarge => (
                "PAYLOAD_TOO_LARGE",
                "request body too large".into(),
                vec![],
            ),
            AppError::RequestTimeout => ("REQUEST_TIMEOUT", "request timed out".into(), vec![]),
            AppError::Configuration(msg) => {
                tracing::error!(error = %msg, "configuration error reached a request");
                ("INTERNAL_SERVER_ERROR", "internal server error".into(), vec![])
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "unhandled error");
                ("INTERNAL_SERVER_ERROR", "internal server error".into(), vec![])
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                fields,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            let challenge = match code {
                "INVALID_TOKEN" | "TOKEN_EXPIRED" => r#"Bearer error="invalid_token""#,
                _ => "Bearer",
            };
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        }
        response
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid(reason) => AppError::InvalidToken(reason),
            TokenError::Expired => AppError::ExpiredToken,
            TokenError::MissingSecret | TokenError::WeakSecret | TokenError::TtlOutOfRange => {
                AppError::Configuration(e.to_string())
            }
            TokenError::Signing(_) => AppError::internal(e),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(field) => AppError::DuplicateKey { field },
            other => AppError::internal(other),
        }
    }
}

impl From<IdCodecError> for AppError {
    fn from(e: IdCodecError) -> Self {
        match e {
            // Client supplied a malformed public id (e.g. /notes/{id})
            IdCodecError::DecodeInvalidFormat | IdCodecError::DecodeOutOfRange => {
                AppError::MalformedIdentifier
            }
            // server-side config / programming errors
            other => AppError::internal(other),
        }
    }
}

impl From<HashError> for AppError {
    fn from(e: HashError) -> Self {
        AppError::internal(e)
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Configuration(e.to_string())
    }
}
