/*
 * Responsibility
 * - request/response DTOs per resource
 * - request DTOs validate() into AppError::Validation with every failing field
 * - response DTOs carry encoded public ids, never store ids
 */
pub mod auth;
pub mod contacts;
pub mod notes;
pub mod posts;
pub mod users;

use serde::{Deserialize, Deserializer};

use crate::error::{AppError, FieldError};

/// Collects field failures so one response lists all of them.
#[derive(Debug, Default)]
pub(crate) struct Checks(Vec<FieldError>);

impl Checks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn require(&mut self, ok: bool, field: &'static str, message: &'static str) {
        if !ok {
            self.0.push(FieldError { field, message });
        }
    }

    pub(crate) fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Tri-state for PATCH-like updates:
/// - missing: None (leave as is)
/// - null: Some(None) (clear)
/// - value: Some(Some(v))
///
/// Use together with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checks_collect_every_failure() {
        let mut checks = Checks::new();
        checks.require(false, "a", "a is required");
        checks.require(true, "b", "b is required");
        checks.require(false, "c", "c is required");

        match checks.finish() {
            Err(AppError::Validation(fields)) => {
                let names: Vec<_> = fields.iter().map(|f| f.field).collect();
                assert_eq!(names, ["a", "c"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn no_failures_is_ok() {
        assert!(Checks::new().finish().is_ok());
    }
}
