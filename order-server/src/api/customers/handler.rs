//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::repository::{RepoError, customer};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, normalize_optional,
    validate_optional_email, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Customer, CustomerCreate, CustomerQuery, CustomerUpdate};

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::CustomerNotFound).with_detail("customerId", id)
}

fn check_balance(value: f64) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::NegativeBalance,
            format!("pendingPayments must be >= 0, got {value}"),
        )
        .with_detail("field", "pendingPayments"));
    }
    Ok(())
}

/// GET /api/customers?q= - 客户列表 (按名称/邮箱/电话模糊搜索)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let q = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let customers = customer::find_all(&state.pool, q).await?;
    Ok(Json(customers))
}

/// GET /api/customers/:id - 获取单个客户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let found = customer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(found))
}

/// POST /api/customers - 创建客户
pub async fn create(
    State(state): State<ServerState>,
    Json(mut payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_email(&payload.email)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    check_balance(payload.pending_payments)?;

    payload.name = payload.name.trim().to_string();
    payload.email = normalize_optional(payload.email);
    payload.phone = normalize_optional(payload.phone);
    payload.address = normalize_optional(payload.address);

    let created = customer::create(&state.pool, &payload).await?;
    tracing::info!(customer_id = created.id, "Customer created");
    Ok(Json(created))
}

/// PUT /api/customers/:id - 更新客户
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(mut payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_email(&payload.email)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    if let Some(balance) = payload.pending_payments {
        check_balance(balance)?;
    }
    payload.name = payload.name.map(|n| n.trim().to_string());

    let updated = customer::update(&state.pool, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

/// DELETE /api/customers/:id - 删除客户 (有订单时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    match customer::delete(&state.pool, id).await {
        Ok(true) => {
            tracing::info!(customer_id = id, "Customer deleted");
            Ok(Json(true))
        }
        Ok(false) => Err(not_found(id)),
        Err(RepoError::Conflict(msg)) => Err(AppError::with_message(
            ErrorCode::CustomerHasOrders,
            msg,
        )
        .with_detail("customerId", id)),
        Err(e) => Err(e.into()),
    }
}
