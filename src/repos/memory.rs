//! In-memory store (no DATABASE_URL, and tests)
//!
//! One `RwLock` over the whole state, so every write is serialized.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::{StoreError, StoreResult};
use crate::repos::models::{
    NewPrincipal, NewResource, Principal, Resource, ResourceKind, StoredCredential,
};
use crate::repos::store::Store;

#[derive(Default)]
struct State {
    principals: HashMap<Uuid, StoredCredential>,
    resources: HashMap<i64, Resource>,
    last_resource_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn resource_count(&self) -> usize {
        self.state.read().await.resources.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load_principal_by_id(&self, id: Uuid) -> StoreResult<Option<Principal>> {
        let state = self.state.read().await;
        Ok(state.principals.get(&id).map(|c| c.principal.clone()))
    }

    async fn find_credential(&self, username: &str) -> StoreResult<Option<StoredCredential>> {
        let state = self.state.read().await;
        Ok(state
            .principals
            .values()
            .find(|c| c.principal.username == username)
            .cloned())
    }

    async fn insert_principal(&self, new: NewPrincipal) -> StoreResult<Principal> {
        let mut state = self.state.write().await;

        if state
            .principals
            .values()
            .any(|c| c.principal.username == new.username)
        {
            return Err(StoreError::Conflict("username"));
        }

        let principal = Principal {
            id: Uuid::new_v4(),
            username: new.username,
            display_name: new.display_name,
            created_at: Utc::now(),
        };
        state.principals.insert(
            principal.id,
            StoredCredential {
                principal: principal.clone(),
                credential_hash: new.credential_hash,
            },
        );

        Ok(principal)
    }

    async fn update_principal(
        &self,
        id: Uuid,
        display_name: &str,
    ) -> StoreResult<Option<Principal>> {
        let mut state = self.state.write().await;
        Ok(state.principals.get_mut(&id).map(|c| {
            c.principal.display_name = display_name.to_string();
            c.principal.clone()
        }))
    }

    async fn delete_principal(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.principals.remove(&id).is_none() {
            return Ok(false);
        }
        // cascade, like the FK on resources.owner_id
        state.resources.retain(|_, r| r.owner_id() != id);
        Ok(true)
    }

    async fn load_resource_by_id(&self, id: i64) -> StoreResult<Option<Resource>> {
        let state = self.state.read().await;
        Ok(state.resources.get(&id).cloned())
    }

    async fn list_resources(
        &self,
        kind: ResourceKind,
        owner_id: Option<Uuid>,
    ) -> StoreResult<Vec<Resource>> {
        let state = self.state.read().await;
        let mut rows: Vec<Resource> = state
            .resources
            .values()
            .filter(|r| r.kind() == kind)
            .filter(|r| owner_id.is_none_or(|owner| r.owner_id() == owner))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id().cmp(&a.id()));
        Ok(rows)
    }

    async fn insert_resource(&self, new: NewResource) -> StoreResult<Resource> {
        let mut state = self.state.write().await;
        state.last_resource_id += 1;

        let now = Utc::now();
        let resource = Resource::from_parts(
            state.last_resource_id,
            new.owner_id,
            new.payload,
            now,
            now,
        );
        state.resources.insert(resource.id(), resource.clone());
        Ok(resource)
    }

    async fn save_resource(&self, resource: &Resource) -> StoreResult<Option<Resource>> {
        let mut state = self.state.write().await;
        let Some(stored) = state.resources.get_mut(&resource.id()) else {
            return Ok(None);
        };

        if !stored.replace_payload(resource.payload().clone()) {
            return Err(StoreError::Corrupt(format!(
                "kind change on resource {}",
                resource.id()
            )));
        }
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete_resource(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.resources.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::models::{NotePayload, Payload, PostPayload};

    fn new_principal(name: &str) -> NewPrincipal {
        NewPrincipal {
            username: name.to_string(),
            display_name: name.to_uppercase(),
            credential_hash: "hash".to_string(),
        }
    }

    fn note(title: &str) -> Payload {
        Payload::Note(NotePayload {
            title: title.to_string(),
            body: "body".to_string(),
        })
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store.insert_principal(new_principal("alice")).await.unwrap();

        let err = store.insert_principal(new_principal("alice")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict("username")));
    }

    #[tokio::test]
    async fn save_keeps_owner_and_reports_vanished_rows() {
        let store = MemoryStore::new();
        let alice = store.insert_principal(new_principal("alice")).await.unwrap();
        let bob = store.insert_principal(new_principal("bob")).await.unwrap();

        let created = store
            .insert_resource(NewResource {
                owner_id: alice.id,
                payload: note("first"),
            })
            .await
            .unwrap();

        // A copy claiming another owner must not move ownership.
        let forged = Resource::from_parts(
            created.id(),
            bob.id,
            note("second"),
            created.created_at,
            created.updated_at,
        );
        let saved = store.save_resource(&forged).await.unwrap().unwrap();
        assert_eq!(saved.owner_id(), alice.id);
        assert_eq!(saved.payload(), &note("second"));

        assert!(store.delete_resource(created.id()).await.unwrap());
        assert!(store.save_resource(&saved).await.unwrap().is_none());
        assert!(!store.delete_resource(created.id()).await.unwrap());
    }

    #[tokio::test]
    async fn save_rejects_kind_change() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let created = store
            .insert_resource(NewResource {
                owner_id: owner,
                payload: note("n"),
            })
            .await
            .unwrap();

        let as_post = Resource::from_parts(
            created.id(),
            owner,
            Payload::Post(PostPayload {
                title: "p".into(),
                content: "c".into(),
            }),
            created.created_at,
            created.updated_at,
        );
        assert!(matches!(
            store.save_resource(&as_post).await,
            Err(StoreError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn deleting_principal_cascades_to_resources() {
        let store = MemoryStore::new();
        let alice = store.insert_principal(new_principal("alice")).await.unwrap();
        let bob = store.insert_principal(new_principal("bob")).await.unwrap();

        for (owner, title) in [(alice.id, "a1"), (alice.id, "a2"), (bob.id, "b1")] {
            store
                .insert_resource(NewResource {
                    owner_id: owner,
                    payload: note(title),
                })
                .await
                .unwrap();
        }

        assert!(store.delete_principal(alice.id).await.unwrap());
        assert_eq!(store.resource_count().await, 1);
        assert!(store.load_principal_by_id(alice.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_by_kind_and_owner_newest_first() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        for (owner, title) in [(alice, "a1"), (bob, "b1"), (alice, "a2")] {
            store
                .insert_resource(NewResource {
                    owner_id: owner,
                    payload: note(title),
                })
                .await
                .unwrap();
        }

        let mine = store
            .list_resources(ResourceKind::Note, Some(alice))
            .await
            .unwrap();
        let titles: Vec<_> = mine
            .iter()
            .map(|r| match r.payload() {
                Payload::Note(n) => n.title.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(titles, ["a2", "a1"]);

        assert!(
            store
                .list_resources(ResourceKind::Post, None)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
