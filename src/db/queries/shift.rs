//! Shift database queries
//!
//! Stops are only written here, as part of saving their owning shift's
//! full stop list. Departure and arrival are always recomputed from the
//! stop times (MIN/MAX aggregate), never stored.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::services::shift_validation::{
    self, ShiftWindow, StopCandidate, Violation,
};
use crate::types::shift::{SaveShiftRequest, ShiftStopWithPlace, ShiftWithTimes};

/// Outcome of a checked save: the persisted shift, or the violations that
/// blocked it.
#[derive(Debug)]
pub enum SaveOutcome {
    Saved(ShiftWithTimes),
    Rejected(Vec<Violation>),
}

const SHIFT_WITH_TIMES_SELECT: &str = r#"
    SELECT
        sh.id, sh.bus_id, sh.driver_id,
        b.licence_plate,
        d.name AS driver_name,
        CASE WHEN COUNT(st.id) >= 2 THEN MIN(st.time) END AS departure,
        CASE WHEN COUNT(st.id) >= 2 THEN MAX(st.time) END AS arrival,
        CASE WHEN COUNT(st.id) >= 2
             THEN (EXTRACT(EPOCH FROM MAX(st.time) - MIN(st.time)) / 60)::bigint
        END AS duration_minutes,
        sh.created_at, sh.updated_at
    FROM bus_shifts sh
    INNER JOIN buses b ON b.id = sh.bus_id
    INNER JOIN drivers d ON d.id = sh.driver_id
    LEFT JOIN bus_stops st ON st.shift_id = sh.id
"#;

/// List shifts with derived times, optionally filtered by bus or driver
pub async fn list_shifts(
    pool: &PgPool,
    bus_id: Option<Uuid>,
    driver_id: Option<Uuid>,
) -> Result<Vec<ShiftWithTimes>> {
    let query = format!(
        r#"
        {SHIFT_WITH_TIMES_SELECT}
        WHERE ($1::uuid IS NULL OR sh.bus_id = $1)
          AND ($2::uuid IS NULL OR sh.driver_id = $2)
        GROUP BY sh.id, b.licence_plate, d.name
        ORDER BY MIN(st.time) ASC NULLS LAST
        "#
    );

    let shifts = sqlx::query_as::<_, ShiftWithTimes>(&query)
        .bind(bus_id)
        .bind(driver_id)
        .fetch_all(pool)
        .await?;

    Ok(shifts)
}

/// Get a single shift with derived times
pub async fn get_shift(pool: &PgPool, id: Uuid) -> Result<Option<ShiftWithTimes>> {
    let query = format!(
        r#"
        {SHIFT_WITH_TIMES_SELECT}
        WHERE sh.id = $1
        GROUP BY sh.id, b.licence_plate, d.name
        "#
    );

    let shift = sqlx::query_as::<_, ShiftWithTimes>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(shift)
}

/// Get the stops of a shift ordered by time, with place names
pub async fn get_shift_stops(pool: &PgPool, shift_id: Uuid) -> Result<Vec<ShiftStopWithPlace>> {
    let stops = sqlx::query_as::<_, ShiftStopWithPlace>(
        r#"
        SELECT st.id, st.shift_id, st.place_id, p.name AS place_name, st.time
        FROM bus_stops st
        INNER JOIN places p ON p.id = st.place_id
        WHERE st.shift_id = $1
        ORDER BY st.time ASC
        "#,
    )
    .bind(shift_id)
    .fetch_all(pool)
    .await?;

    Ok(stops)
}

/// Delete a shift; its stops go with it (ON DELETE CASCADE)
pub async fn delete_shift(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM bus_shifts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Derived [departure, arrival] windows of a bus's shifts, excluding one
/// shift by identity on the update path. Shifts with fewer than two stops
/// have no defined window and are skipped.
pub async fn bus_intervals<'e, E>(
    executor: E,
    bus_id: Uuid,
    exclude_shift_id: Option<Uuid>,
) -> Result<Vec<ShiftWindow>>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows: Vec<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT MIN(st.time) AS departure, MAX(st.time) AS arrival
        FROM bus_shifts sh
        INNER JOIN bus_stops st ON st.shift_id = sh.id
        WHERE sh.bus_id = $1
          AND ($2::uuid IS NULL OR sh.id <> $2)
        GROUP BY sh.id
        HAVING COUNT(st.id) >= 2
        "#,
    )
    .bind(bus_id)
    .bind(exclude_shift_id)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(departure, arrival)| ShiftWindow { departure, arrival })
        .collect())
}

/// Same as [`bus_intervals`], for a driver.
pub async fn driver_intervals<'e, E>(
    executor: E,
    driver_id: Uuid,
    exclude_shift_id: Option<Uuid>,
) -> Result<Vec<ShiftWindow>>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows: Vec<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT MIN(st.time) AS departure, MAX(st.time) AS arrival
        FROM bus_shifts sh
        INNER JOIN bus_stops st ON st.shift_id = sh.id
        WHERE sh.driver_id = $1
          AND ($2::uuid IS NULL OR sh.id <> $2)
        GROUP BY sh.id
        HAVING COUNT(st.id) >= 2
        "#,
    )
    .bind(driver_id)
    .bind(exclude_shift_id)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(departure, arrival)| ShiftWindow { departure, arrival })
        .collect())
}

/// Dry-run of the shift checks: structural validation first, then bus and
/// driver conflict checks. Never writes.
pub async fn check_shift(pool: &PgPool, request: &SaveShiftRequest) -> Result<Vec<Violation>> {
    let valid = match shift_validation::validate_stops(&stop_candidates(request)) {
        Ok(valid) => valid,
        Err(violation) => return Ok(vec![violation]),
    };

    let bus_windows = bus_intervals(pool, request.bus_id, request.id).await?;
    let driver_windows = driver_intervals(pool, request.driver_id, request.id).await?;

    Ok(shift_validation::resource_conflicts(
        &valid.window,
        &bus_windows,
        &driver_windows,
    ))
}

/// Validate and persist a shift with its full stop list.
///
/// The conflict check and the write happen in one transaction holding
/// advisory locks on both resources, so a concurrent save for the same bus
/// or driver cannot slip a conflicting shift in between the interval read
/// and the commit. The stop list replaces the previous one atomically.
pub async fn save_shift_checked(pool: &PgPool, request: &SaveShiftRequest) -> Result<SaveOutcome> {
    let valid = match shift_validation::validate_stops(&stop_candidates(request)) {
        Ok(valid) => valid,
        Err(violation) => return Ok(SaveOutcome::Rejected(vec![violation])),
    };

    let mut tx = pool.begin().await?;

    lock_resources(&mut tx, request.bus_id, request.driver_id).await?;

    let bus_windows = bus_intervals(&mut *tx, request.bus_id, request.id).await?;
    let driver_windows = driver_intervals(&mut *tx, request.driver_id, request.id).await?;

    let violations =
        shift_validation::resource_conflicts(&valid.window, &bus_windows, &driver_windows);
    if !violations.is_empty() {
        tx.rollback().await?;
        return Ok(SaveOutcome::Rejected(violations));
    }

    let shift_id = upsert_shift(&mut tx, request).await?;

    sqlx::query("DELETE FROM bus_stops WHERE shift_id = $1")
        .bind(shift_id)
        .execute(&mut *tx)
        .await?;

    for &(place_id, time) in &valid.stops {
        sqlx::query(
            r#"
            INSERT INTO bus_stops (id, shift_id, place_id, time)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(shift_id)
        .bind(place_id)
        .bind(time)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let saved = get_shift(pool, shift_id)
        .await?
        .context("shift missing right after save")?;

    Ok(SaveOutcome::Saved(saved))
}

fn stop_candidates(request: &SaveShiftRequest) -> Vec<StopCandidate> {
    request
        .stops
        .iter()
        .map(|s| StopCandidate {
            place_id: s.place_id,
            time: s.time,
            delete: s.delete,
        })
        .collect()
}

/// Take `pg_advisory_xact_lock` for both resources, in sorted key order so
/// two saves touching the same pair of resources cannot deadlock.
async fn lock_resources(
    tx: &mut Transaction<'_, Postgres>,
    bus_id: Uuid,
    driver_id: Uuid,
) -> Result<()> {
    let mut keys = [advisory_key(bus_id), advisory_key(driver_id)];
    keys.sort_unstable();

    for key in keys {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(key)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

/// Collapse a uuid into the bigint key space of pg_advisory_xact_lock.
fn advisory_key(id: Uuid) -> i64 {
    let (hi, lo) = id.as_u64_pair();
    (hi ^ lo) as i64
}

async fn upsert_shift(
    tx: &mut Transaction<'_, Postgres>,
    request: &SaveShiftRequest,
) -> Result<Uuid> {
    let shift_id = request.id.unwrap_or_else(Uuid::new_v4);

    sqlx::query(
        r#"
        INSERT INTO bus_shifts (id, bus_id, driver_id, created_at, updated_at)
        VALUES ($1, $2, $3, NOW(), NOW())
        ON CONFLICT (id) DO UPDATE SET
            bus_id = EXCLUDED.bus_id,
            driver_id = EXCLUDED.driver_id,
            updated_at = NOW()
        "#,
    )
    .bind(shift_id)
    .bind(request.bus_id)
    .bind(request.driver_id)
    .execute(&mut **tx)
    .await?;

    Ok(shift_id)
}
