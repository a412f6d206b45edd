//! Raw Material Repository

use super::{RepoError, RepoResult};
use shared::models::{RawMaterial, RawMaterialCreate, RawMaterialUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SELECT: &str = "SELECT id, name, unit, initial_quantity, processed_quantity, usable_quantity, low_stock_threshold, supplier, created_at, updated_at FROM raw_material";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<RawMaterial>> {
    let materials = sqlx::query_as::<_, RawMaterial>(&format!("{SELECT} ORDER BY name"))
        .fetch_all(pool)
        .await?;
    Ok(materials)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<RawMaterial>> {
    let material = sqlx::query_as::<_, RawMaterial>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(material)
}

pub async fn create(pool: &SqlitePool, data: &RawMaterialCreate) -> RepoResult<RawMaterial> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO raw_material (id, name, unit, initial_quantity, processed_quantity, usable_quantity, low_stock_threshold, supplier, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.unit.trim())
    .bind(data.initial_quantity)
    .bind(data.processed_quantity)
    .bind(data.usable_quantity.unwrap_or(data.processed_quantity))
    .bind(data.low_stock_threshold)
    .bind(&data.supplier)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create raw material".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &RawMaterialUpdate) -> RepoResult<RawMaterial> {
    let rows = sqlx::query(
        "UPDATE raw_material SET name = COALESCE(?1, name), unit = COALESCE(?2, unit), initial_quantity = COALESCE(?3, initial_quantity), processed_quantity = COALESCE(?4, processed_quantity), usable_quantity = COALESCE(?5, usable_quantity), low_stock_threshold = COALESCE(?6, low_stock_threshold), supplier = COALESCE(?7, supplier), updated_at = ?8 WHERE id = ?9",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.unit.as_deref().map(str::trim))
    .bind(data.initial_quantity)
    .bind(data.processed_quantity)
    .bind(data.usable_quantity)
    .bind(data.low_stock_threshold)
    .bind(&data.supplier)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Raw material {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Raw material {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM raw_material WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
