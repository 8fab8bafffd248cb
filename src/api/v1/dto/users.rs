/*
 * Responsibility
 * - Users request DTOs (responses reuse PrincipalSummary)
 */
use serde::Deserialize;

use super::Checks;
use super::auth::check_display_name;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub display_name: String,
}

impl UpdateMeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut checks = Checks::new();
        check_display_name(&mut checks, &self.display_name);
        checks.finish()
    }
}
