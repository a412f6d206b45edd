//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    InvoiceQuery, InvoiceSummary, Order, OrderCreate, OrderQuery, OrderStatusUpdate,
};

/// GET /api/orders?status=&customerId= - 订单列表 (最新在前)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_all(&state.pool, &query).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get_order(id).await?))
}

/// GET /api/orders/barcode/:code - 按订单条码查找
pub async fn get_by_barcode(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<Order>> {
    let found = order::find_by_barcode(&state.pool, code.trim())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("barcode", code))?;
    Ok(Json(found))
}

/// POST /api/orders - 创建订单 (总额由服务端计算)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.create_order(payload).await?))
}

/// PUT /api/orders/:id/status - 管理员状态变更
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.update_status(id, payload).await?))
}

/// DELETE /api/orders/:id - 删除订单 (级联删除明细和打包分配)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.orders.delete_order(id).await?;
    Ok(Json(true))
}

/// GET /api/orders/:id/invoice?pendingPaid= - 发票汇总
pub async fn invoice(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<InvoiceQuery>,
) -> AppResult<Json<InvoiceSummary>> {
    Ok(Json(state.orders.invoice(id, query.pending_paid).await?))
}
