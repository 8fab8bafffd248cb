/*
 * Responsibility
 * - SQLx access to the principals table
 * - unique violations on username surface as StoreError::Conflict
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{StoreError, StoreResult};
use crate::repos::models::{NewPrincipal, Principal, StoredCredential};

#[derive(Debug, FromRow)]
struct PrincipalRow {
    id: Uuid,
    username: String,
    display_name: String,
    created_at: DateTime<Utc>,
}

impl From<PrincipalRow> for Principal {
    fn from(row: PrincipalRow) -> Self {
        Principal {
            id: row.id,
            username: row.username,
            display_name: row.display_name,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialRow {
    id: Uuid,
    username: String,
    display_name: String,
    created_at: DateTime<Utc>,
    credential_hash: String,
}

pub async fn get(db: &PgPool, id: Uuid) -> StoreResult<Option<Principal>> {
    let row = sqlx::query_as::<_, PrincipalRow>(
        r#"
        SELECT id, username, display_name, created_at
        FROM principals
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(Principal::from))
}

pub async fn find_credential(db: &PgPool, username: &str) -> StoreResult<Option<StoredCredential>> {
    let row = sqlx::query_as::<_, CredentialRow>(
        r#"
        SELECT id, username, display_name, created_at, credential_hash
        FROM principals
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?;

    Ok(row.map(|r| StoredCredential {
        principal: Principal {
            id: r.id,
            username: r.username,
            display_name: r.display_name,
            created_at: r.created_at,
        },
        credential_hash: r.credential_hash,
    }))
}

pub async fn create(db: &PgPool, new: &NewPrincipal) -> StoreResult<Principal> {
    let row = sqlx::query_as::<_, PrincipalRow>(
        r#"
        INSERT INTO principals (id, username, display_name, credential_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, display_name, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.username)
    .bind(&new.display_name)
    .bind(&new.credential_hash)
    .fetch_one(db)
    .await
    .map_err(|e| StoreError::from_sqlx(e, "username"))?;

    Ok(row.into())
}

pub async fn update(db: &PgPool, id: Uuid, display_name: &str) -> StoreResult<Option<Principal>> {
    let row = sqlx::query_as::<_, PrincipalRow>(
        r#"
        UPDATE principals
        SET display_name = $2
        WHERE id = $1
        RETURNING id, username, display_name, created_at
        "#,
    )
    .bind(id)
    .bind(display_name)
    .fetch_optional(db)
    .await?;

    Ok(row.map(Principal::from))
}

// resources.owner_id is ON DELETE CASCADE
pub async fn delete(db: &PgPool, id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM principals
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
