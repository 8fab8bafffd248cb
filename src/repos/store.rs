use async_trait::async_trait;
use uuid::Uuid;

use crate::repos::error::StoreResult;
use crate::repos::models::{
    NewPrincipal, NewResource, Principal, Resource, ResourceKind, StoredCredential,
};

/// The backing store for principals and resources.
///
/// Implementations serialize conflicting writes themselves; callers never retry.
#[async_trait]
pub trait Store: Send + Sync {
    async fn load_principal_by_id(&self, id: Uuid) -> StoreResult<Option<Principal>>;

    /// Looks up a principal with its credential hash by login name.
    async fn find_credential(&self, username: &str) -> StoreResult<Option<StoredCredential>>;

    /// Returns `StoreError::Conflict("username")` when the name is taken.
    async fn insert_principal(&self, new: NewPrincipal) -> StoreResult<Principal>;

    async fn update_principal(
        &self,
        id: Uuid,
        display_name: &str,
    ) -> StoreResult<Option<Principal>>;

    /// Deletes the principal and every resource it owns.
    async fn delete_principal(&self, id: Uuid) -> StoreResult<bool>;

    async fn load_resource_by_id(&self, id: i64) -> StoreResult<Option<Resource>>;

    /// Newest first. `owner_id` narrows to one owner.
    async fn list_resources(
        &self,
        kind: ResourceKind,
        owner_id: Option<Uuid>,
    ) -> StoreResult<Vec<Resource>>;

    async fn insert_resource(&self, new: NewResource) -> StoreResult<Resource>;

    /// Persists the payload of `resource`.
    ///
    /// Owner and kind are never rewritten. Returns `Ok(None)` if the row is gone.
    async fn save_resource(&self, resource: &Resource) -> StoreResult<Option<Resource>>;

    async fn delete_resource(&self, id: i64) -> StoreResult<bool>;
}
