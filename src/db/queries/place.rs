//! Place database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::{is_restrict_violation, DeleteOutcome};
use crate::types::place::{CreatePlaceRequest, Place, UpdatePlaceRequest};

/// Create a new place
pub async fn create_place(pool: &PgPool, request: CreatePlaceRequest) -> Result<Place> {
    let place = sqlx::query_as::<_, Place>(
        r#"
        INSERT INTO places (id, name, lat, lng, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NOW(), NOW())
        RETURNING id, name, lat, lng, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&request.name)
    .bind(request.lat)
    .bind(request.lng)
    .fetch_one(pool)
    .await?;

    Ok(place)
}

/// List places, optionally filtered by name substring
pub async fn list_places(pool: &PgPool, search: Option<&str>) -> Result<Vec<Place>> {
    let places = if let Some(search) = search {
        sqlx::query_as::<_, Place>(
            r#"
            SELECT id, name, lat, lng, created_at, updated_at
            FROM places
            WHERE name ILIKE $1
            ORDER BY name ASC
            "#,
        )
        .bind(format!("%{}%", search))
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, Place>(
            r#"
            SELECT id, name, lat, lng, created_at, updated_at
            FROM places
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?
    };

    Ok(places)
}

/// Update a place
pub async fn update_place(pool: &PgPool, request: UpdatePlaceRequest) -> Result<Option<Place>> {
    let place = sqlx::query_as::<_, Place>(
        r#"
        UPDATE places
        SET name = COALESCE($2, name),
            lat = COALESCE($3, lat),
            lng = COALESCE($4, lng),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, lat, lng, created_at, updated_at
        "#,
    )
    .bind(request.id)
    .bind(request.name)
    .bind(request.lat)
    .bind(request.lng)
    .fetch_optional(pool)
    .await?;

    Ok(place)
}

/// Delete a place. A place referenced by stops cannot be deleted.
pub async fn delete_place(pool: &PgPool, id: Uuid) -> Result<DeleteOutcome> {
    let result = sqlx::query("DELETE FROM places WHERE id = $1")
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
