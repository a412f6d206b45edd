//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductVariant, ProductVariantInput};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

const SELECT: &str =
    "SELECT id, name, description, unit, is_active, created_at, updated_at FROM product";

/// Product fields after boundary normalization
#[derive(Debug, Clone)]
pub struct ProductInsert {
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub variants: Vec<ProductVariantInput>,
}

/// Partial update; `variants` replaces the full set when present
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub is_active: Option<bool>,
    pub variants: Option<Vec<ProductVariantInput>>,
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let mut products = sqlx::query_as::<_, Product>(&format!("{SELECT} ORDER BY name"))
        .fetch_all(pool)
        .await?;
    for product in &mut products {
        product.variants = find_variants(pool, product.id).await?;
    }
    Ok(products)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match product {
        Some(mut product) => {
            product.variants = find_variants(pool, id).await?;
            Ok(Some(product))
        }
        None => Ok(None),
    }
}

/// Product owning the variant with this barcode
pub async fn find_by_barcode(pool: &SqlitePool, barcode: &str) -> RepoResult<Option<Product>> {
    let product_id: Option<i64> =
        sqlx::query_scalar("SELECT product_id FROM product_variant WHERE barcode = ?")
            .bind(barcode)
            .fetch_optional(pool)
            .await?;
    match product_id {
        Some(id) => find_by_id(pool, id).await,
        None => Ok(None),
    }
}

async fn find_variants<'e, E>(executor: E, product_id: i64) -> RepoResult<Vec<ProductVariant>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let variants = sqlx::query_as::<_, ProductVariant>(
        "SELECT id, product_id, size, price, stock, barcode FROM product_variant WHERE product_id = ? ORDER BY price, id",
    )
    .bind(product_id)
    .fetch_all(executor)
    .await?;
    Ok(variants)
}

async fn insert_variants(
    conn: &mut SqliteConnection,
    product_id: i64,
    variants: &[ProductVariantInput],
) -> RepoResult<()> {
    for variant in variants {
        sqlx::query(
            "INSERT INTO product_variant (id, product_id, size, price, stock, barcode) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(product_id)
        .bind(&variant.size)
        .bind(variant.price)
        .bind(variant.stock)
        .bind(&variant.barcode)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, data: ProductInsert) -> RepoResult<Product> {
    let id = snowflake_id();
    let now = now_millis();
    let mut tx = super::begin_write(pool).await?;
    sqlx::query(
        "INSERT INTO product (id, name, description, unit, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.unit)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    insert_variants(&mut tx, id, &data.variants).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductPatch) -> RepoResult<Product> {
    let mut tx = super::begin_write(pool).await?;
    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), description = COALESCE(?2, description), unit = COALESCE(?3, unit), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.unit)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    if let Some(variants) = &data.variants {
        sqlx::query("DELETE FROM product_variant WHERE product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_variants(&mut tx, id, variants).await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;

    fn variant(size: &str, price: f64, barcode: &str) -> ProductVariantInput {
        ProductVariantInput {
            size: Some(size.into()),
            price,
            stock: 5.0,
            barcode: Some(barcode.into()),
        }
    }

    #[tokio::test]
    async fn create_with_variants_and_find_by_barcode() {
        let pool = test_support::pool().await;
        let product = create(
            &pool,
            ProductInsert {
                name: "T-Shirt".into(),
                description: None,
                unit: Some("pcs".into()),
                variants: vec![variant("M", 12.0, "111"), variant("L", 14.0, "222")],
            },
        )
        .await
        .unwrap();
        assert_eq!(product.variants.len(), 2);
        assert_eq!(product.variants[0].size.as_deref(), Some("M"));

        let found = find_by_barcode(&pool, "222").await.unwrap().unwrap();
        assert_eq!(found.id, product.id);
        assert!(find_by_barcode(&pool, "333").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_barcode_rolls_back_create() {
        let pool = test_support::pool().await;
        let err = create(
            &pool,
            ProductInsert {
                name: "Mug".into(),
                description: None,
                unit: None,
                variants: vec![variant("S", 3.0, "dup"), variant("L", 4.0, "dup")],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
        assert!(find_all(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_variants_and_delete_cascades() {
        let pool = test_support::pool().await;
        let product = create(
            &pool,
            ProductInsert {
                name: "Cap".into(),
                description: None,
                unit: None,
                variants: vec![variant("One", 8.0, "c1")],
            },
        )
        .await
        .unwrap();

        let updated = update(
            &pool,
            product.id,
            ProductPatch {
                name: Some("Cap v2".into()),
                variants: Some(vec![variant("S", 7.0, "c2"), variant("L", 9.0, "c3")]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Cap v2");
        assert_eq!(updated.variants.len(), 2);
        assert!(find_by_barcode(&pool, "c1").await.unwrap().is_none());

        assert!(delete(&pool, product.id).await.unwrap());
        let left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_variant")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(left, 0);
    }
}
