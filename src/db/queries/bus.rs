//! Bus database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::{is_restrict_violation, DeleteOutcome};
use crate::types::bus::{Bus, CreateBusRequest, UpdateBusRequest};

/// Create a new bus
pub async fn create_bus(pool: &PgPool, request: CreateBusRequest) -> Result<Bus> {
    let bus = sqlx::query_as::<_, Bus>(
        r#"
        INSERT INTO buses (id, licence_plate, created_at, updated_at)
        VALUES ($1, $2, NOW(), NOW())
        RETURNING id, licence_plate, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&request.licence_plate)
    .fetch_one(pool)
    .await?;

    Ok(bus)
}

/// List buses, optionally filtered by licence plate substring
pub async fn list_buses(pool: &PgPool, search: Option<&str>) -> Result<Vec<Bus>> {
    let buses = if let Some(search) = search {
        sqlx::query_as::<_, Bus>(
            r#"
            SELECT id, licence_plate, created_at, updated_at
            FROM buses
            WHERE licence_plate ILIKE $1
            ORDER BY licence_plate ASC
            "#,
        )
        .bind(format!("%{}%", search))
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, Bus>(
            r#"
            SELECT id, licence_plate, created_at, updated_at
            FROM buses
            ORDER BY licence_plate ASC
            "#,
        )
        .fetch_all(pool)
        .await?
    };

    Ok(buses)
}

/// Update a bus
pub async fn update_bus(pool: &PgPool, request: UpdateBusRequest) -> Result<Option<Bus>> {
    let bus = sqlx::query_as::<_, Bus>(
        r#"
        UPDATE buses
        SET licence_plate = COALESCE($2, licence_plate),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, licence_plate, created_at, updated_at
        "#,
    )
    .bind(request.id)
    .bind(request.licence_plate)
    .fetch_optional(pool)
    .await?;

    Ok(bus)
}

/// Delete a bus. A bus with assigned shifts cannot be deleted; the FK
/// RESTRICT constraint is the guard and maps to `DeleteOutcome::InUse`.
pub async fn delete_bus(pool: &PgPool, id: Uuid) -> Result<DeleteOutcome> {
    let result = sqlx::query("DELETE FROM buses WHERE id = $1")
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
