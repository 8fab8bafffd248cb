//! Ownership-based authorization.
//!
//! Callers check existence first: a missing resource is `NotFound` and never
//! reaches [`OwnershipGuard::authorize`].

use crate::error::AppError;
use crate::repos::models::{Principal, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Operation::Read)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No principal: the client should log in.
    Unauthenticated,
    /// Authenticated, but someone else owns the resource.
    NotOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => Err(AppError::Unauthenticated),
            Decision::Deny(DenyReason::NotOwner) => Err(AppError::Forbidden),
        }
    }
}

/// Stateless; a unit struct so the rule has a single home.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipGuard;

impl OwnershipGuard {
    /// - Read: any authenticated principal; anonymous only for publicly readable kinds
    /// - Update / Delete: only the owner
    pub fn authorize(
        &self,
        principal: Option<&Principal>,
        resource: &Resource,
        operation: Operation,
    ) -> Decision {
        match (principal, operation) {
            (None, Operation::Read) if resource.kind().is_public_read() => Decision::Allow,
            (None, _) => Decision::Deny(DenyReason::Unauthenticated),
            (Some(_), Operation::Read) => Decision::Allow,
            (Some(p), _) if p.id == resource.owner_id() => Decision::Allow,
            (Some(_), _) => Decision::Deny(DenyReason::NotOwner),
        }
    }
}
