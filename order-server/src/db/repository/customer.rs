//! Customer Repository

use super::{RepoError, RepoResult};
use shared::models::{Customer, CustomerCreate, CustomerUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqlitePool};

const SELECT: &str = "SELECT id, name, email, phone, address, pending_payments, created_at, updated_at FROM customer";

/// List customers, optionally filtered by a case-insensitive substring of
/// name, email or phone.
///
/// SQLite `lower()` only folds ASCII, so matching runs on Unicode-lowercased
/// values here.
pub async fn find_all(pool: &SqlitePool, query: Option<&str>) -> RepoResult<Vec<Customer>> {
    let customers = sqlx::query_as::<_, Customer>(&format!("{SELECT} ORDER BY name"))
        .fetch_all(pool)
        .await?;

    let Some(needle) = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
    else {
        return Ok(customers);
    };

    Ok(customers
        .into_iter()
        .filter(|c| matches_search(c, &needle))
        .collect())
}

fn matches_search(customer: &Customer, needle: &str) -> bool {
    [
        Some(customer.name.as_str()),
        customer.email.as_deref(),
        customer.phone.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Customer>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let customer = sqlx::query_as::<_, Customer>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(customer)
}

pub async fn create(pool: &SqlitePool, data: &CustomerCreate) -> RepoResult<Customer> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO customer (id, name, email, phone, address, pending_payments, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(data.pending_payments)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &CustomerUpdate) -> RepoResult<Customer> {
    let rows = sqlx::query(
        "UPDATE customer SET name = COALESCE(?1, name), email = COALESCE(?2, email), phone = COALESCE(?3, phone), address = COALESCE(?4, address), pending_payments = COALESCE(?5, pending_payments), updated_at = ?6 WHERE id = ?7",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(data.pending_payments)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_order WHERE customer_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if orders > 0 {
        return Err(RepoError::Conflict(format!(
            "Customer {id} has {orders} order(s)"
        )));
    }
    let rows = sqlx::query("DELETE FROM customer WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;

    #[tokio::test]
    async fn search_is_case_insensitive_across_fields() {
        let pool = test_support::pool().await;
        test_support::customer(&pool, "Alice", 0.0).await;
        let bob = create(
            &pool,
            &CustomerCreate {
                name: "Bob".into(),
                email: Some("BOB@Shop.test".into()),
                phone: Some("+1 999 123".into()),
                address: None,
                pending_payments: 0.0,
            },
        )
        .await
        .unwrap();

        let by_name = find_all(&pool, Some("aLi")).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Alice");

        let by_email = find_all(&pool, Some("shop.TEST")).await.unwrap();
        assert_eq!(by_email, vec![bob.clone()]);

        let by_phone = find_all(&pool, Some("999")).await.unwrap();
        assert_eq!(by_phone, vec![bob]);

        assert_eq!(find_all(&pool, Some("  ")).await.unwrap().len(), 2);
        assert!(find_all(&pool, Some("zzz")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let pool = test_support::pool().await;
        let elodie = create(
            &pool,
            &CustomerCreate {
                name: "ÉLODIE Müller".into(),
                email: Some("ÉLODIE@Exemple.fr".into()),
                phone: None,
                address: None,
                pending_payments: 0.0,
            },
        )
        .await
        .unwrap();
        test_support::customer(&pool, "Zoe", 0.0).await;

        for needle in ["élodie", "MÜLLER", "dIE mü", "élodie@exemple"] {
            let hits = find_all(&pool, Some(needle)).await.unwrap();
            assert_eq!(hits, vec![elodie.clone()], "{needle}");
        }
    }

    #[tokio::test]
    async fn negative_balance_rejected_by_schema() {
        let pool = test_support::pool().await;
        let customer = test_support::customer(&pool, "Carol", 10.0).await;
        let err = update(
            &pool,
            customer.id,
            &CustomerUpdate {
                pending_payments: Some(-1.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn update_keeps_unset_fields() {
        let pool = test_support::pool().await;
        let customer = test_support::customer(&pool, "Dave", 5.0).await;
        let updated = update(
            &pool,
            customer.id,
            &CustomerUpdate {
                address: Some("2 Side St".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Dave");
        assert_eq!(updated.pending_payments, 5.0);
        assert_eq!(updated.address.as_deref(), Some("2 Side St"));
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let pool = test_support::pool().await;
        let err = update(&pool, 42, &CustomerUpdate::default()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
