/*
 * Responsibility
 * - the ownership-gated CRUD flow shared by notes / posts / contacts
 * - order per request: authenticated? -> load -> NotFound? -> authorize -> effect
 * - a row that disappears between load and write is NotFound, never retried
 */
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::Store;
use crate::repos::models::{NewResource, Payload, Principal, Resource, ResourceKind};
use crate::services::auth::context::RequestContext;
use crate::services::auth::guard::{Operation, OwnershipGuard};

fn not_found(kind: ResourceKind) -> AppError {
    AppError::not_found(kind.as_str())
}

fn require_principal(ctx: &RequestContext) -> Result<&Principal, AppError> {
    ctx.principal().ok_or(AppError::Unauthenticated)
}

/// Loads `id`, hiding resources of another kind behind `NotFound`.
async fn load(store: &dyn Store, kind: ResourceKind, id: i64) -> Result<Resource, AppError> {
    store
        .load_resource_by_id(id)
        .await?
        .filter(|r| r.kind() == kind)
        .ok_or_else(|| not_found(kind))
}

async fn load_authorized(
    store: &dyn Store,
    ctx: &RequestContext,
    kind: ResourceKind,
    id: i64,
    operation: Operation,
) -> Result<Resource, AppError> {
    if operation.is_mutation() {
        require_principal(ctx)?;
    }

    let resource = load(store, kind, id).await?;

    let decision = OwnershipGuard.authorize(ctx.principal(), &resource, operation);
    if !decision.is_allowed() {
        tracing::info!(
            resource_id = id,
            kind = %kind,
            ?operation,
            ?decision,
            principal_id = ?ctx.principal().map(|p| p.id),
            "access denied"
        );
    }
    decision.into_result()?;

    Ok(resource)
}

pub async fn create(
    store: &dyn Store,
    ctx: &RequestContext,
    payload: Payload,
) -> Result<Resource, AppError> {
    let owner = require_principal(ctx)?;

    let resource = store
        .insert_resource(NewResource {
            owner_id: owner.id,
            payload,
        })
        .await?;

    tracing::debug!(resource_id = resource.id(), kind = %resource.kind(), "resource created");
    Ok(resource)
}

pub async fn fetch(
    store: &dyn Store,
    ctx: &RequestContext,
    kind: ResourceKind,
    id: i64,
) -> Result<Resource, AppError> {
    load_authorized(store, ctx, kind, id, Operation::Read).await
}

/// Lists resources of `kind`.
///
/// Public kinds list everything (optionally narrowed to `author`); private kinds
/// list the caller's own and require authentication.
pub async fn list(
    store: &dyn Store,
    ctx: &RequestContext,
    kind: ResourceKind,
    author: Option<Uuid>,
) -> Result<Vec<Resource>, AppError> {
    let owner_filter = if kind.is_public_read() {
        author
    } else {
        Some(require_principal(ctx)?.id)
    };

    Ok(store.list_resources(kind, owner_filter).await?)
}

/// Applies `edit` to the current payload and saves it.
pub async fn update<F>(
    store: &dyn Store,
    ctx: &RequestContext,
    kind: ResourceKind,
    id: i64,
    edit: F,
) -> Result<Resource, AppError>
where
    F: FnOnce(&mut Payload) -> Result<(), AppError>,
{
    let mut resource = load_authorized(store, ctx, kind, id, Operation::Update).await?;

    let mut payload = resource.payload().clone();
    edit(&mut payload)?;
    if !resource.replace_payload(payload) {
        return Err(AppError::internal(anyhow::anyhow!(
            "edit changed the kind of resource {id}"
        )));
    }

    store
        .save_resource(&resource)
        .await?
        .ok_or_else(|| not_found(kind))
}

pub async fn delete(
    store: &dyn Store,
    ctx: &RequestContext,
    kind: ResourceKind,
    id: i64,
) -> Result<(), AppError> {
    load_authorized(store, ctx, kind, id, Operation::Delete).await?;

    if store.delete_resource(id).await? {
        Ok(())
    } else {
        Err(not_found(kind))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ErrorKind;
    use crate::repos::models::{NewPrincipal, NotePayload, PostPayload, StoredCredential};
    use crate::repos::{MemoryStore, StoreResult};

    /// Deletes the target row right before a save, as a concurrent request would.
    struct DeletingStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl Store for DeletingStore {
        async fn load_principal_by_id(&self, id: Uuid) -> StoreResult<Option<Principal>> {
            self.inner.load_principal_by_id(id).await
        }
        async fn find_credential(&self, username: &str) -> StoreResult<Option<StoredCredential>> {
            self.inner.find_credential(username).await
        }
        async fn insert_principal(&self, new: NewPrincipal) -> StoreResult<Principal> {
            self.inner.insert_principal(new).await
        }
        async fn update_principal(&self, id: Uuid, name: &str) -> StoreResult<Option<Principal>> {
            self.inner.update_principal(id, name).await
        }
        async fn delete_principal(&self, id: Uuid) -> StoreResult<bool> {
            self.inner.delete_principal(id).await
        }
        async fn load_resource_by_id(&self, id: i64) -> StoreResult<Option<Resource>> {
            self.inner.load_resource_by_id(id).await
        }
        async fn list_resources(
            &self,
            kind: ResourceKind,
            owner_id: Option<Uuid>,
        ) -> StoreResult<Vec<Resource>> {
            self.inner.list_resources(kind, owner_id).await
        }
        async fn insert_resource(&self, new: NewResource) -> StoreResult<Resource> {
            self.inner.insert_resource(new).await
        }
        async fn save_resource(&self, resource: &Resource) -> StoreResult<Option<Resource>> {
            self.inner.delete_resource(resource.id()).await?;
            self.inner.save_resource(resource).await
        }
        async fn delete_resource(&self, id: i64) -> StoreResult<bool> {
            self.inner.delete_resource(id).await
        }
    }

    async fn principal(store: &dyn Store, name: &str) -> Principal {
        store
            .insert_principal(NewPrincipal {
                username: name.into(),
                display_name: name.into(),
                credential_hash: "x".into(),
            })
            .await
            .unwrap()
    }

    fn ctx_of(p: &Principal) -> RequestContext {
        RequestContext::authenticated("token".into(), p.clone())
    }

    fn note(title: &str) -> Payload {
        Payload::Note(NotePayload {
            title: title.into(),
            body: "body".into(),
        })
    }

    fn retitle(title: &'static str) -> impl FnOnce(&mut Payload) -> Result<(), AppError> {
        move |p| {
            if let Payload::Note(n) = p {
                n.title = title.into();
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn non_owner_delete_is_forbidden_and_resource_survives() {
        let store = MemoryStore::new();
        let a = principal(&store, "a").await;
        let b = principal(&store, "b").await;
        let r = create(&store, &ctx_of(&a), note("mine")).await.unwrap();

        let err = delete(&store, &ctx_of(&b), ResourceKind::Note, r.id())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(store.load_resource_by_id(r.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn anonymous_mutation_is_unauthenticated_before_lookup() {
        let store = MemoryStore::new();
        let anon = RequestContext::anonymous();

        // even for ids that do not exist
        let err = delete(&store, &anon, ResourceKind::Note, 999).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);

        let err = create(&store, &anon, note("x")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn missing_resource_is_not_found_not_forbidden() {
        let store = MemoryStore::new();
        let a = principal(&store, "a").await;

        let err = update(&store, &ctx_of(&a), ResourceKind::Note, 41, retitle("x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn wrong_kind_is_not_found() {
        let store = MemoryStore::new();
        let a = principal(&store, "a").await;
        let r = create(&store, &ctx_of(&a), note("n")).await.unwrap();

        let err = fetch(&store, &ctx_of(&a), ResourceKind::Post, r.id())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn owner_update_keeps_owner() {
        let store = MemoryStore::new();
        let a = principal(&store, "a").await;
        let r = create(&store, &ctx_of(&a), note("old")).await.unwrap();

        let updated = update(&store, &ctx_of(&a), ResourceKind::Note, r.id(), retitle("new"))
            .await
            .unwrap();
        assert_eq!(updated.owner_id(), a.id);
        assert_eq!(updated.payload(), &note("new"));
    }

    #[tokio::test]
    async fn row_deleted_mid_update_is_not_found() {
        let store = DeletingStore {
            inner: MemoryStore::new(),
        };
        let a = principal(&store, "a").await;
        let r = create(&store, &ctx_of(&a), note("soon gone")).await.unwrap();

        let err = update(&store, &ctx_of(&a), ResourceKind::Note, r.id(), retitle("late"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn concurrent_deletes_one_wins_other_not_found() {
        let store = Arc::new(MemoryStore::new());
        let a = principal(store.as_ref(), "a").await;
        let r = create(store.as_ref(), &ctx_of(&a), note("n")).await.unwrap();

        let (ctx1, ctx2) = (ctx_of(&a), ctx_of(&a));
        let (first, second) = tokio::join!(
            delete(store.as_ref(), &ctx1, ResourceKind::Note, r.id()),
            delete(store.as_ref(), &ctx2, ResourceKind::Note, r.id()),
        );
        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .filter_map(|o| o.as_ref().err())
                .all(|e| e.kind() == ErrorKind::NotFound)
        );
    }

    #[tokio::test]
    async fn private_lists_are_scoped_to_caller_public_lists_are_not() {
        let store = MemoryStore::new();
        let a = principal(&store, "a").await;
        let b = principal(&store, "b").await;

        create(&store, &ctx_of(&a), note("a-note")).await.unwrap();
        create(&store, &ctx_of(&b), note("b-note")).await.unwrap();
        for p in [&a, &b] {
            create(
                &store,
                &ctx_of(p),
                Payload::Post(PostPayload {
                    title: "t".into(),
                    content: "c".into(),
                }),
            )
            .await
            .unwrap();
        }

        let notes = list(&store, &ctx_of(&a), ResourceKind::Note, None).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].owner_id(), a.id);

        let anon = RequestContext::anonymous();
        assert_eq!(
            list(&store, &anon, ResourceKind::Post, None).await.unwrap().len(),
            2
        );
        assert_eq!(
            list(&store, &anon, ResourceKind::Post, Some(b.id))
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            list(&store, &anon, ResourceKind::Note, None)
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::Unauthenticated
        );
    }
}
