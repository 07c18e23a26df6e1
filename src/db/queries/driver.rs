//! Driver database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::{is_restrict_violation, DeleteOutcome};
use crate::types::driver::{CreateDriverRequest, Driver, UpdateDriverRequest};

/// Create a new driver
pub async fn create_driver(pool: &PgPool, request: CreateDriverRequest) -> Result<Driver> {
    let driver = sqlx::query_as::<_, Driver>(
        r#"
        INSERT INTO drivers (id, name, created_at, updated_at)
        VALUES ($1, $2, NOW(), NOW())
        RETURNING id, name, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&request.name)
    .fetch_one(pool)
    .await?;

    Ok(driver)
}

/// List drivers, optionally filtered by name substring
pub async fn list_drivers(pool: &PgPool, search: Option<&str>) -> Result<Vec<Driver>> {
    let drivers = if let Some(search) = search {
        sqlx::query_as::<_, Driver>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM drivers
            WHERE name ILIKE $1
            ORDER BY name ASC
            "#,
        )
        .bind(format!("%{}%", search))
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, Driver>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM drivers
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?
    };

    Ok(drivers)
}

/// Update a driver
pub async fn update_driver(pool: &PgPool, request: UpdateDriverRequest) -> Result<Option<Driver>> {
    let driver = sqlx::query_as::<_, Driver>(
        r#"
        UPDATE drivers
        SET name = COALESCE($2, name),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, created_at, updated_at
        "#,
    )
    .bind(request.id)
    .bind(request.name)
    .fetch_optional(pool)
    .await?;

    Ok(driver)
}

/// Delete a driver. A driver with assigned shifts cannot be deleted.
pub async fn delete_driver(pool: &PgPool, id: Uuid) -> Result<DeleteOutcome> {
    let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await;

    match result {
        Ok(res) if res.rows_affected() > 0 => Ok(DeleteOutcome::Deleted),
        Ok(_) => Ok(DeleteOutcome::NotFound),
        Err(e) if is_restrict_violation(&e) => Ok(DeleteOutcome::InUse),
        Err(e) => Err(e.into()),
    }
}
