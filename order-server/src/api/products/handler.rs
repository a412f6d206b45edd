//! Product API Handlers
//!
//! 商品可以直接提交 `variants`，也可以提交扁平的 `unitPrice` / `barcode` /
//! `quantity`，后者在这里被归一成单个规格。

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::product::{self, ProductInsert, ProductPatch};
use crate::db::repository::RepoError;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, normalize_optional, validate_non_negative,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Product, ProductCreate, ProductUpdate, ProductVariantInput};

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::ProductNotFound).with_detail("productId", id)
}

fn map_write_error(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ProductBarcodeExists, msg),
        other => other.into(),
    }
}

/// Validate and trim variants. Blank barcodes and sizes become `None`.
fn normalize_variants(variants: Vec<ProductVariantInput>) -> AppResult<Vec<ProductVariantInput>> {
    variants
        .into_iter()
        .map(|v| {
            validate_non_negative(v.price, "price")?;
            validate_non_negative(v.stock, "stock")?;
            validate_optional_text(&v.size, "size", MAX_SHORT_TEXT_LEN)?;
            validate_optional_text(&v.barcode, "barcode", MAX_SHORT_TEXT_LEN)?;
            Ok(ProductVariantInput {
                size: normalize_optional(v.size),
                price: v.price,
                stock: v.stock,
                barcode: normalize_optional(v.barcode),
            })
        })
        .collect()
}

/// Flat `{unitPrice, barcode, quantity}` → one variant
fn variants_from_create(payload: &mut ProductCreate) -> Vec<ProductVariantInput> {
    if let Some(variants) = payload.variants.take() {
        return variants;
    }
    match payload.unit_price {
        Some(price) => vec![ProductVariantInput {
            size: None,
            price,
            stock: payload.quantity.unwrap_or(0.0),
            barcode: payload.barcode.take(),
        }],
        None => Vec::new(),
    }
}

/// GET /api/products - 商品列表 (含规格)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(product::find_all(&state.pool).await?))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let found = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(found))
}

/// GET /api/products/barcode/:code - 按规格条码查找商品
pub async fn get_by_barcode(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<Product>> {
    let found = product::find_by_barcode(&state.pool, code.trim())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound).with_detail("barcode", code))?;
    Ok(Json(found))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    Json(mut payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.unit, "unit", MAX_SHORT_TEXT_LEN)?;

    let variants = normalize_variants(variants_from_create(&mut payload))?;
    let insert = ProductInsert {
        name: payload.name.trim().to_string(),
        description: normalize_optional(payload.description),
        unit: normalize_optional(payload.unit),
        variants,
    };

    let created = product::create(&state.pool, insert)
        .await
        .map_err(map_write_error)?;
    tracing::info!(product_id = created.id, variants = created.variants.len(), "Product created");
    Ok(Json(created))
}

/// PUT /api/products/:id - 更新商品 (`variants` 存在时整体替换)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.unit, "unit", MAX_SHORT_TEXT_LEN)?;

    let patch = ProductPatch {
        name: payload.name.map(|n| n.trim().to_string()),
        description: payload.description,
        unit: payload.unit,
        is_active: payload.is_active,
        variants: payload.variants.map(normalize_variants).transpose()?,
    };

    let updated = product::update(&state.pool, id, patch)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => map_write_error(other),
        })?;
    Ok(Json(updated))
}

/// DELETE /api/products/:id - 删除商品及其规格
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !product::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(product_id = id, "Product deleted");
    Ok(Json(true))
}
