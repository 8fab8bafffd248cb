/*
 * Responsibility
 * - resources CRUD (notes / posts / contacts share one table, payload is JSONB)
 * - owner_id and kind are written once, on INSERT
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::repos::error::{StoreError, StoreResult};
use crate::repos::models::{NewResource, Payload, Resource, ResourceKind};

#[derive(Debug, Clone, sqlx::FromRow)]
struct ResourceRow {
    id: i64,
    kind: String,
    owner_id: Uuid,
    payload: Json<Payload>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ResourceRow> for Resource {
    type Error = StoreError;

    fn try_from(row: ResourceRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse::<ResourceKind>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let payload = row.payload.0;
        if payload.kind() != kind {
            return Err(StoreError::Corrupt(format!(
                "resource {} has kind column {} but {} payload",
                row.id,
                kind,
                payload.kind()
            )));
        }

        Ok(Resource::from_parts(
            row.id,
            row.owner_id,
            payload,
            row.created_at,
            row.updated_at,
        ))
    }
}

fn into_resources(rows: Vec<ResourceRow>) -> StoreResult<Vec<Resource>> {
    rows.into_iter().map(Resource::try_from).collect()
}

pub async fn list(
    db: &PgPool,
    kind: ResourceKind,
    owner_id: Option<Uuid>,
) -> StoreResult<Vec<Resource>> {
    let rows = sqlx::query_as::<_, ResourceRow>(
        r#"
        SELECT id, kind, owner_id, payload, created_at, updated_at
        FROM resources
        WHERE kind = $1
          AND ($2::uuid IS NULL OR owner_id = $2)
        ORDER BY id DESC
        "#,
    )
    .bind(kind.as_str())
    .bind(owner_id)
    .fetch_all(db)
    .await?;

    into_resources(rows)
}

pub async fn create(db: &PgPool, new: &NewResource) -> StoreResult<Resource> {
    let row = sqlx::query_as::<_, ResourceRow>(
        r#"
        INSERT INTO resources (kind, owner_id, payload)
        VALUES ($1, $2, $3)
        RETURNING id, kind, owner_id, payload, created_at, updated_at
        "#,
    )
    .bind(new.payload.kind().as_str())
    .bind(new.owner_id)
    .bind(Json(&new.payload))
    .fetch_one(db)
    .await?;

    row.try_into()
}

pub async fn get(db: &PgPool, id: i64) -> StoreResult<Option<Resource>> {
    let row = sqlx::query_as::<_, ResourceRow>(
        r#"
        SELECT id, kind, owner_id, payload, created_at, updated_at
        FROM resources
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    row.map(Resource::try_from).transpose()
}

pub async fn update(db: &PgPool, resource: &Resource) -> StoreResult<Option<Resource>> {
    // kind in the WHERE clause: a payload of another kind matches no row
    let row = sqlx::query_as::<_, ResourceRow>(
        r#"
        UPDATE resources
        SET
            payload = $3,
            updated_at = now()
        WHERE id = $1 AND kind = $2
        RETURNING id, kind, owner_id, payload, created_at, updated_at
        "#,
    )
    .bind(resource.id())
    .bind(resource.kind().as_str())
    .bind(Json(resource.payload()))
    .fetch_optional(db)
    .await?;

    row.map(Resource::try_from).transpose()
}

pub async fn delete(db: &PgPool, id: i64) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM resources
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
