//! Packing Assignment Repository
//!
//! An assignment is open while `status = 'assigned' AND expires_at > now`.
//! Every token lookup goes through that predicate.

use super::RepoResult;
use shared::models::{AssignmentStatus, PackingAssignment};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, order_id, packer_id, token, status, expires_at, created_at, updated_at";

pub async fn insert(conn: &mut SqliteConnection, assignment: &PackingAssignment) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO packing_assignment (id, order_id, packer_id, token, status, expires_at, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(assignment.id)
    .bind(assignment.order_id)
    .bind(assignment.packer_id)
    .bind(&assignment.token)
    .bind(assignment.status)
    .bind(assignment.expires_at)
    .bind(assignment.created_at)
    .bind(assignment.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<PackingAssignment>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let assignment = sqlx::query_as::<_, PackingAssignment>(&format!(
        "SELECT {COLUMNS} FROM packing_assignment WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(assignment)
}

/// Open assignment for this token, if any
pub async fn find_open_by_token<'e, E>(
    executor: E,
    token: &str,
    now: i64,
) -> RepoResult<Option<PackingAssignment>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let assignment = sqlx::query_as::<_, PackingAssignment>(&format!(
        "SELECT {COLUMNS} FROM packing_assignment WHERE token = ? AND status = 'assigned' AND expires_at > ?"
    ))
    .bind(token)
    .bind(now)
    .fetch_optional(executor)
    .await?;
    Ok(assignment)
}

/// Expire every open assignment of an order. Packed rows are never touched.
pub async fn revoke_open_for_order(
    conn: &mut SqliteConnection,
    order_id: i64,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE packing_assignment SET expires_at = ?1, updated_at = ?1 WHERE order_id = ?2 AND status = 'assigned' AND expires_at > ?1",
    )
    .bind(now)
    .bind(order_id)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected())
}

/// `assigned → packed` for the open assignment matching token and order.
/// Returns `None` when nothing matched (wrong pair, expired, or already packed).
pub async fn mark_packed(
    conn: &mut SqliteConnection,
    token: &str,
    order_id: i64,
    now: i64,
) -> RepoResult<Option<PackingAssignment>> {
    let assignment = sqlx::query_as::<_, PackingAssignment>(&format!(
        "UPDATE packing_assignment SET status = ?1, updated_at = ?2 \
         WHERE token = ?3 AND order_id = ?4 AND status = 'assigned' AND expires_at > ?2 \
         RETURNING {COLUMNS}"
    ))
    .bind(AssignmentStatus::Packed)
    .bind(now)
    .bind(token)
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(assignment)
}

/// Assignment history of a packer, newest first
pub async fn find_by_packer(pool: &SqlitePool, packer_id: i64) -> RepoResult<Vec<PackingAssignment>> {
    let assignments = sqlx::query_as::<_, PackingAssignment>(&format!(
        "SELECT {COLUMNS} FROM packing_assignment WHERE packer_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(packer_id)
    .fetch_all(pool)
    .await?;
    Ok(assignments)
}

pub async fn find_by_order<'e, E>(executor: E, order_id: i64) -> RepoResult<Vec<PackingAssignment>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let assignments = sqlx::query_as::<_, PackingAssignment>(&format!(
        "SELECT {COLUMNS} FROM packing_assignment WHERE order_id = ? ORDER BY created_at, id"
    ))
    .bind(order_id)
    .fetch_all(executor)
    .await?;
    Ok(assignments)
}

/// `(packed, assigned)` counts for a packer
pub async fn count_by_status(pool: &SqlitePool, packer_id: i64) -> RepoResult<(i64, i64)> {
    let counts: (i64, i64) = sqlx::query_as(
        "SELECT \
            COALESCE(SUM(CASE WHEN status = 'packed' THEN 1 ELSE 0 END), 0), \
            COALESCE(SUM(CASE WHEN status = 'assigned' THEN 1 ELSE 0 END), 0) \
         FROM packing_assignment WHERE packer_id = ?",
    )
    .bind(packer_id)
    .fetch_one(pool)
    .await?;
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{order, test_support};
    use shared::models::{Order, OrderStatus};
    use shared::util::snowflake_id;

    async fn seed_order(pool: &SqlitePool) -> (i64, i64) {
        let customer = test_support::customer(pool, "Alice", 0.0).await;
        let packer = test_support::packer(pool, "P1").await;
        let order = Order {
            id: snowflake_id(),
            customer_id: customer.id,
            total_amount: 10.0,
            pending_payments: 0.0,
            status: OrderStatus::Pending,
            packer_id: None,
            packing_assignment_id: None,
            is_personalized: false,
            payment_method: None,
            barcode: uuid::Uuid::new_v4().to_string(),
            created_at: 0,
            updated_at: 0,
            items: vec![],
        };
        let mut conn = pool.acquire().await.unwrap();
        order::insert(&mut conn, &order).await.unwrap();
        (order.id, packer.id)
    }

    fn assignment(order_id: i64, packer_id: i64, token: &str, expires_at: i64) -> PackingAssignment {
        PackingAssignment {
            id: snowflake_id(),
            order_id,
            packer_id,
            token: token.into(),
            status: AssignmentStatus::Assigned,
            expires_at,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn token_lookup_respects_expiry() {
        let pool = test_support::pool().await;
        let (order_id, packer_id) = seed_order(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        insert(&mut conn, &assignment(order_id, packer_id, "tok", 1_000)).await.unwrap();

        assert!(find_open_by_token(&mut *conn, "tok", 999).await.unwrap().is_some());
        assert!(find_open_by_token(&mut *conn, "tok", 1_000).await.unwrap().is_none());
        assert!(find_open_by_token(&mut *conn, "other", 0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mark_packed_succeeds_once() {
        let pool = test_support::pool().await;
        let (order_id, packer_id) = seed_order(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        insert(&mut conn, &assignment(order_id, packer_id, "tok", 1_000)).await.unwrap();

        assert!(mark_packed(&mut conn, "tok", order_id + 1, 10).await.unwrap().is_none());

        let packed = mark_packed(&mut conn, "tok", order_id, 10).await.unwrap().unwrap();
        assert_eq!(packed.status, AssignmentStatus::Packed);
        assert_eq!(packed.updated_at, 10);

        assert!(mark_packed(&mut conn, "tok", order_id, 11).await.unwrap().is_none());
        assert!(find_open_by_token(&mut *conn, "tok", 11).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_token_rejected() {
        let pool = test_support::pool().await;
        let (order_id, packer_id) = seed_order(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        insert(&mut conn, &assignment(order_id, packer_id, "tok", 1_000)).await.unwrap();
        let err = insert(&mut conn, &assignment(order_id, packer_id, "tok", 1_000))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::db::repository::RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn revoke_only_touches_open_rows() {
        let pool = test_support::pool().await;
        let (order_id, packer_id) = seed_order(&pool).await;
        {
            let mut conn = pool.acquire().await.unwrap();
            insert(&mut conn, &assignment(order_id, packer_id, "a", 1_000)).await.unwrap();
            mark_packed(&mut conn, "a", order_id, 5).await.unwrap();
            insert(&mut conn, &assignment(order_id, packer_id, "b", 1_000)).await.unwrap();

            assert_eq!(revoke_open_for_order(&mut conn, order_id, 50).await.unwrap(), 1);
            assert!(find_open_by_token(&mut *conn, "b", 50).await.unwrap().is_none());
        }

        let history = find_by_order(&pool, order_id).await.unwrap();
        assert_eq!(history.len(), 2);
        let packed = history.iter().find(|a| a.token == "a").unwrap();
        assert_eq!(packed.expires_at, 1_000);

        assert_eq!(count_by_status(&pool, packer_id).await.unwrap(), (1, 1));
    }
}
