/*
 * Responsibility
 * - Json / Query wrappers whose rejection is AppError
 * - serde's message goes to the debug log only; the client gets a fixed field error
 */
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
};

use crate::error::AppError;

/// `Json<T>` with failures translated like every other error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

/// `Query<T>` with failures translated like every other error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "query string rejected");
                Err(AppError::validation("query", "query string is invalid"))
            }
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "json body rejected");

    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge;
    }

    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::validation("body", "Content-Type must be application/json")
        }
        JsonRejection::JsonSyntaxError(_) => {
            AppError::validation("body", "request body is not valid JSON")
        }
        JsonRejection::JsonDataError(_) => {
            AppError::validation("body", "request body does not match the expected fields")
        }
        _ => AppError::validation("body", "request body could not be read"),
    }
}
