//! Packer Repository

use super::{RepoError, RepoResult};
use shared::models::{Packer, PackerCreate, PackerUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqlitePool};

/// `completed_orders` is derived from packed assignments
const SELECT: &str = "SELECT p.id, p.name, p.phone, p.is_active, \
    (SELECT COUNT(*) FROM packing_assignment a WHERE a.packer_id = p.id AND a.status = 'packed') AS completed_orders, \
    p.created_at, p.updated_at FROM packer p";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Packer>> {
    let packers = sqlx::query_as::<_, Packer>(&format!("{SELECT} ORDER BY p.name"))
        .fetch_all(pool)
        .await?;
    Ok(packers)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Packer>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let packer = sqlx::query_as::<_, Packer>(&format!("{SELECT} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(packer)
}

pub async fn create(pool: &SqlitePool, data: &PackerCreate) -> RepoResult<Packer> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO packer (id, name, phone, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.phone)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create packer".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &PackerUpdate) -> RepoResult<Packer> {
    let rows = sqlx::query(
        "UPDATE packer SET name = COALESCE(?1, name), phone = COALESCE(?2, phone), is_active = COALESCE(?3, is_active), updated_at = ?4 WHERE id = ?5",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.phone)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Packer {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Packer {id} not found")))
}

/// Delete a packer.
///
/// Refused while the packer holds an open assignment. A packer with
/// assignment history is deactivated instead (软删除) so history keeps
/// pointing at a real row.
pub async fn delete(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<bool> {
    let mut tx = super::begin_write(pool).await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM packer WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Ok(false);
    }

    let (open, history): (i64, i64) = sqlx::query_as(
        "SELECT \
            COALESCE(SUM(CASE WHEN status = 'assigned' AND expires_at > ?1 THEN 1 ELSE 0 END), 0), \
            COUNT(*) \
         FROM packing_assignment WHERE packer_id = ?2",
    )
    .bind(now)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if open > 0 {
        return Err(RepoError::Conflict(format!(
            "Packer {id} has {open} open assignment(s)"
        )));
    }

    if history > 0 {
        sqlx::query("UPDATE packer SET is_active = 0, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    } else {
        sqlx::query("DELETE FROM packer WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(true)
}
