/*
 * Responsibility
 * - extractors handlers use instead of touching request parts directly
 * - every rejection is an AppError
 */
pub mod auth_ctx;
pub mod payload;
pub mod public_id;

pub use auth_ctx::{AuthedPrincipal, CurrentContext};
pub use payload::{ApiJson, ApiQuery};
