//! Order Repository
//!
//! Status writes are compare-and-set: every `UPDATE` carries the status the
//! caller observed and reports whether it matched.

use super::RepoResult;
use shared::models::{Order, OrderItem, OrderQuery, OrderStatus};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

const SELECT: &str = "SELECT id, customer_id, total_amount, pending_payments, status, packer_id, packing_assignment_id, is_personalized, payment_method, barcode, created_at, updated_at FROM sales_order";

pub async fn find_all(pool: &SqlitePool, query: &OrderQuery) -> RepoResult<Vec<Order>> {
    let mut orders = sqlx::query_as::<_, Order>(&format!(
        "{SELECT} WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR customer_id = ?2) ORDER BY created_at DESC"
    ))
    .bind(query.status)
    .bind(query.customer_id)
    .fetch_all(pool)
    .await?;

    for order in &mut orders {
        order.items = find_items(pool, order.id).await?;
    }
    Ok(orders)
}

/// Load an order with its items
pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    match order {
        Some(mut order) => {
            order.items = find_items(&mut *conn, id).await?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

pub async fn find_by_barcode(pool: &SqlitePool, barcode: &str) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("{SELECT} WHERE barcode = ?"))
        .bind(barcode)
        .fetch_optional(pool)
        .await?;
    match order {
        Some(mut order) => {
            order.items = find_items(pool, order.id).await?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

pub async fn find_status<'e, E>(executor: E, id: i64) -> RepoResult<Option<OrderStatus>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let status = sqlx::query_scalar::<_, OrderStatus>("SELECT status FROM sales_order WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(status)
}

pub async fn find_items<'e, E>(executor: E, order_id: i64) -> RepoResult<Vec<OrderItem>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_name, quantity, unit_price, unit FROM order_item WHERE order_id = ? ORDER BY position",
    )
    .bind(order_id)
    .fetch_all(executor)
    .await?;
    Ok(items)
}

/// Insert the order row and all of its items
pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO sales_order (id, customer_id, total_amount, pending_payments, status, packer_id, packing_assignment_id, is_personalized, payment_method, barcode, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, NULL, NULL, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(order.customer_id)
    .bind(order.total_amount)
    .bind(order.pending_payments)
    .bind(order.status)
    .bind(order.is_personalized)
    .bind(&order.payment_method)
    .bind(&order.barcode)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;

    for (position, item) in order.items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_item (id, order_id, position, product_name, quantity, unit_price, unit) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(item.id)
        .bind(order.id)
        .bind(position as i64)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(&item.unit)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// `status := to` only if the stored status is still `expected`
pub async fn update_status(
    conn: &mut SqliteConnection,
    id: i64,
    expected: OrderStatus,
    to: OrderStatus,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE sales_order SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(to)
    .bind(now)
    .bind(id)
    .bind(expected)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Move to `Packing` and attach the packer and assignment, only if the
/// stored status is still `expected`
pub async fn start_packing(
    conn: &mut SqliteConnection,
    id: i64,
    expected: OrderStatus,
    packer_id: i64,
    assignment_id: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE sales_order SET status = ?1, packer_id = ?2, packing_assignment_id = ?3, updated_at = ?4 WHERE id = ?5 AND status = ?6",
    )
    .bind(OrderStatus::Packing)
    .bind(packer_id)
    .bind(assignment_id)
    .bind(now)
    .bind(id)
    .bind(expected)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Delete an order together with its items and packing assignments
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = super::begin_write(pool).await?;
    sqlx::query("DELETE FROM packing_assignment WHERE order_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM order_item WHERE order_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM sales_order WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;
    use shared::util::{now_millis, snowflake_id};

    fn new_order(customer_id: i64) -> Order {
        let id = snowflake_id();
        let now = now_millis();
        let item = |name: &str, quantity: f64, unit_price: f64| OrderItem {
            id: snowflake_id(),
            order_id: id,
            product_name: name.into(),
            quantity,
            unit_price,
            unit: Some("pcs".into()),
        };
        Order {
            id,
            customer_id,
            total_amount: 350.0,
            pending_payments: 0.0,
            status: OrderStatus::Pending,
            packer_id: None,
            packing_assignment_id: None,
            is_personalized: false,
            payment_method: None,
            barcode: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            items: vec![item("Soap", 3.0, 100.0), item("Towel", 1.0, 50.0)],
        }
    }

    #[tokio::test]
    async fn insert_and_load_keeps_item_order() {
        let pool = test_support::pool().await;
        let customer = test_support::customer(&pool, "Alice", 0.0).await;
        let new = new_order(customer.id);
        let mut conn = pool.acquire().await.unwrap();
        insert(&mut conn, &new).await.unwrap();

        let loaded = find_by_id(&mut conn, new.id).await.unwrap().unwrap();
        assert_eq!(loaded, new);
        assert_eq!(loaded.items[0].product_name, "Soap");
        assert_eq!(loaded.items[1].product_name, "Towel");

        drop(conn);
        let by_barcode = find_by_barcode(&pool, &new.barcode).await.unwrap();
        assert_eq!(by_barcode.map(|o| o.id), Some(new.id));
    }

    #[tokio::test]
    async fn status_update_is_compare_and_set() {
        let pool = test_support::pool().await;
        let customer = test_support::customer(&pool, "Alice", 0.0).await;
        let new = new_order(customer.id);
        let mut conn = pool.acquire().await.unwrap();
        insert(&mut conn, &new).await.unwrap();
        let id = new.id;

        assert!(
            update_status(&mut conn, id, OrderStatus::Pending, OrderStatus::Cancelled, 1)
                .await
                .unwrap()
        );
        // Stale expectation loses
        assert!(
            !update_status(&mut conn, id, OrderStatus::Pending, OrderStatus::Packing, 2)
                .await
                .unwrap()
        );
        assert_eq!(
            find_status(&mut *conn, id).await.unwrap(),
            Some(OrderStatus::Cancelled)
        );
    }

    #[tokio::test]
    async fn list_filters_by_status_and_customer() {
        let pool = test_support::pool().await;
        let alice = test_support::customer(&pool, "Alice", 0.0).await;
        let bob = test_support::customer(&pool, "Bob", 0.0).await;
        let a = new_order(alice.id);
        let b = new_order(bob.id);
        {
            let mut conn = pool.acquire().await.unwrap();
            insert(&mut conn, &a).await.unwrap();
            insert(&mut conn, &b).await.unwrap();
            update_status(&mut conn, b.id, OrderStatus::Pending, OrderStatus::Cancelled, 1)
                .await
                .unwrap();
        }

        let all = find_all(&pool, &OrderQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|o| o.items.len() == 2));

        let pending = find_all(
            &pool,
            &OrderQuery {
                status: Some(OrderStatus::Pending),
                customer_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, a.id);

        let bobs = find_all(
            &pool,
            &OrderQuery {
                status: None,
                customer_id: Some(bob.id),
            },
        )
        .await
        .unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn delete_removes_items() {
        let pool = test_support::pool().await;
        let customer = test_support::customer(&pool, "Alice", 0.0).await;
        let new = new_order(customer.id);
        {
            let mut conn = pool.acquire().await.unwrap();
            insert(&mut conn, &new).await.unwrap();
        }
        assert!(delete(&pool, new.id).await.unwrap());
        assert!(find_items(&pool, new.id).await.unwrap().is_empty());
        assert!(!delete(&pool, new.id).await.unwrap());
    }
}
