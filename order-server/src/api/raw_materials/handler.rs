//! Raw Material API Handlers
//!
//! 响应带派生字段 `wastage` 和 `stockStatus`，两者都不落库。

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{RepoError, raw_material};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, normalize_optional, validate_non_negative,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{RawMaterialCreate, RawMaterialUpdate, RawMaterialView};

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::RawMaterialNotFound).with_detail("rawMaterialId", id)
}

/// Quantities after merging a patch onto the stored row
struct Quantities {
    initial: f64,
    processed: f64,
    usable: f64,
    threshold: f64,
}

fn validate_quantities(q: &Quantities) -> AppResult<()> {
    validate_non_negative(q.initial, "initialQuantity")?;
    validate_non_negative(q.processed, "processedQuantity")?;
    validate_non_negative(q.usable, "usableQuantity")?;
    validate_non_negative(q.threshold, "lowStockThreshold")?;
    if q.processed > q.initial {
        return Err(AppError::with_message(
            ErrorCode::RawMaterialOverProcessed,
            format!(
                "processedQuantity ({}) exceeds initialQuantity ({})",
                q.processed, q.initial
            ),
        ));
    }
    Ok(())
}

/// GET /api/raw-materials - 原材料列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<RawMaterialView>>> {
    let materials = raw_material::find_all(&state.pool).await?;
    Ok(Json(materials.into_iter().map(RawMaterialView::from).collect()))
}

/// GET /api/raw-materials/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RawMaterialView>> {
    let found = raw_material::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(found.into()))
}

/// POST /api/raw-materials - 登记原材料
pub async fn create(
    State(state): State<ServerState>,
    Json(mut payload): Json<RawMaterialCreate>,
) -> AppResult<Json<RawMaterialView>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.supplier, "supplier", MAX_NAME_LEN)?;
    validate_quantities(&Quantities {
        initial: payload.initial_quantity,
        processed: payload.processed_quantity,
        usable: payload.usable_quantity.unwrap_or(payload.processed_quantity),
        threshold: payload.low_stock_threshold,
    })?;
    payload.supplier = normalize_optional(payload.supplier);

    let created = raw_material::create(&state.pool, &payload).await?;
    tracing::info!(raw_material_id = created.id, "Raw material created");
    Ok(Json(created.into()))
}

/// PUT /api/raw-materials/:id - 更新原材料 (合并后整体校验)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RawMaterialUpdate>,
) -> AppResult<Json<RawMaterialView>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(unit) = &payload.unit {
        validate_required_text(unit, "unit", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&payload.supplier, "supplier", MAX_NAME_LEN)?;

    let current = raw_material::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    validate_quantities(&Quantities {
        initial: payload.initial_quantity.unwrap_or(current.initial_quantity),
        processed: payload.processed_quantity.unwrap_or(current.processed_quantity),
        usable: payload.usable_quantity.unwrap_or(current.usable_quantity),
        threshold: payload.low_stock_threshold.unwrap_or(current.low_stock_threshold),
    })?;

    let updated = raw_material::update(&state.pool, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            RepoError::Validation(msg) => {
                AppError::with_message(ErrorCode::RawMaterialOverProcessed, msg)
            }
            other => other.into(),
        })?;
    Ok(Json(updated.into()))
}

/// DELETE /api/raw-materials/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !raw_material::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processed_above_initial_is_over_processed() {
        let err = validate_quantities(&Quantities {
            initial: 100.0,
            processed: 120.0,
            usable: 0.0,
            threshold: 10.0,
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::RawMaterialOverProcessed);
    }

    #[test]
    fn negative_quantity_is_out_of_range() {
        let err = validate_quantities(&Quantities {
            initial: 100.0,
            processed: 10.0,
            usable: -1.0,
            threshold: 10.0,
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.details.unwrap()["field"], "usableQuantity");
    }
}
