//! Packing API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::{
    AssignPackerRequest, AssignPackerResponse, AssignmentDetail, ConfirmPackedResponse,
    PackerAssignmentsResponse, PackerStats,
};

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    token: Option<String>,
}

/// PUT /packing/:orderId/assign - 分配打包员
pub async fn assign(
    State(state): State<ServerState>,
    Path(order_id): Path<i64>,
    Json(payload): Json<AssignPackerRequest>,
) -> AppResult<Json<AssignPackerResponse>> {
    let response = state
        .packing
        .assign_packer(order_id, payload.packer_id)
        .await?;
    Ok(Json(response))
}

/// GET /packing/:token - 完整分配详情
pub async fn assignment_detail(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> AppResult<Json<AssignmentDetail>> {
    Ok(Json(state.packing.get_assignment_detail(&token).await?))
}

/// GET /packing/for-packer/:token - 打包员视图
pub async fn packer_view(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> AppResult<Json<PackerAssignmentsResponse>> {
    Ok(Json(state.packing.get_packer_view(&token).await?))
}

/// GET /packing/for-packer?token= - 打包员视图
pub async fn packer_view_by_query(
    State(state): State<ServerState>,
    Query(query): Query<TokenQuery>,
) -> AppResult<Json<PackerAssignmentsResponse>> {
    let token = query
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(AppError::invalid_token)?;
    Ok(Json(state.packing.get_packer_view(token.trim()).await?))
}

/// PUT /packing/:token/:orderId/packed - 确认打包完成 (每个令牌只能成功一次)
pub async fn confirm_packed(
    State(state): State<ServerState>,
    Path((token, order_id)): Path<(String, i64)>,
) -> AppResult<Json<ConfirmPackedResponse>> {
    Ok(Json(state.packing.confirm_packed(&token, order_id).await?))
}

/// GET /packing/packer/:packerId/stats - 打包员统计
pub async fn packer_stats(
    State(state): State<ServerState>,
    Path(packer_id): Path<i64>,
) -> AppResult<Json<PackerStats>> {
    Ok(Json(state.packing.packer_stats(packer_id).await?))
}
