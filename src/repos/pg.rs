//! Postgres-backed [`Store`].

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::repos::error::StoreResult;
use crate::repos::models::{
    NewPrincipal, NewResource, Principal, Resource, ResourceKind, StoredCredential,
};
use crate::repos::store::Store;
use crate::repos::{principal_repo, resource_repo};

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and applies the embedded migrations.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn load_principal_by_id(&self, id: Uuid) -> StoreResult<Option<Principal>> {
        principal_repo::get(&self.pool, id).await
    }

    async fn find_credential(&self, username: &str) -> StoreResult<Option<StoredCredential>> {
        principal_repo::find_credential(&self.pool, username).await
    }

    async fn insert_principal(&self, new: NewPrincipal) -> StoreResult<Principal> {
        principal_repo::create(&self.pool, &new).await
    }

    async fn update_principal(
        &self,
        id: Uuid,
        display_name: &str,
    ) -> StoreResult<Option<Principal>> {
        principal_repo::update(&self.pool, id, display_name).await
    }

    async fn delete_principal(&self, id: Uuid) -> StoreResult<bool> {
        principal_repo::delete(&self.pool, id).await
    }

    async fn load_resource_by_id(&self, id: i64) -> StoreResult<Option<Resource>> {
        resource_repo::get(&self.pool, id).await
    }

    async fn list_resources(
        &self,
        kind: ResourceKind,
        owner_id: Option<Uuid>,
    ) -> StoreResult<Vec<Resource>> {
        resource_repo::list(&self.pool, kind, owner_id).await
    }

    async fn insert_resource(&self, new: NewResource) -> StoreResult<Resource> {
        resource_repo::create(&self.pool, &new).await
    }

    async fn save_resource(&self, resource: &Resource) -> StoreResult<Option<Resource>> {
        resource_repo::update(&self.pool, resource).await
    }

    async fn delete_resource(&self, id: i64) -> StoreResult<bool> {
        resource_repo::delete(&self.pool, id).await
    }
}
