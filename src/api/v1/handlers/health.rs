/*
 * Responsibility
 * - GET /health (liveness)
 * - goes through the access middleware like every other route; anonymous is fine
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
