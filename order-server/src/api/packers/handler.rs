//! Packer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{RepoError, packer};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, normalize_optional, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Packer, PackerCreate, PackerStats, PackerUpdate, PackingAssignment};
use shared::util::now_millis;

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::PackerNotFound).with_detail("packerId", id)
}

/// GET /api/packers - 打包员列表 (含已完成数量)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Packer>>> {
    let packers = packer::find_all(&state.pool).await?;
    Ok(Json(packers))
}

/// GET /api/packers/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Packer>> {
    let found = packer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(found))
}

/// POST /api/packers - 创建打包员
pub async fn create(
    State(state): State<ServerState>,
    Json(mut payload): Json<PackerCreate>,
) -> AppResult<Json<Packer>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    payload.name = payload.name.trim().to_string();
    payload.phone = normalize_optional(payload.phone);

    let created = packer::create(&state.pool, &payload).await?;
    tracing::info!(packer_id = created.id, "Packer created");
    Ok(Json(created))
}

/// PUT /api/packers/:id - 更新打包员 (含启用/停用)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(mut payload): Json<PackerUpdate>,
) -> AppResult<Json<Packer>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    payload.name = payload.name.map(|n| n.trim().to_string());

    let updated = packer::update(&state.pool, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

/// DELETE /api/packers/:id - 删除打包员 (持有未完成分配时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    match packer::delete(&state.pool, id, now_millis()).await {
        Ok(true) => {
            tracing::info!(packer_id = id, "Packer deleted");
            Ok(Json(true))
        }
        Ok(false) => Err(not_found(id)),
        Err(RepoError::Conflict(msg)) => Err(AppError::with_message(
            ErrorCode::PackerHasActiveAssignments,
            msg,
        )
        .with_detail("packerId", id)),
        Err(e) => Err(e.into()),
    }
}

/// GET /api/packers/:id/assignments - 分配历史 (最新在前)
pub async fn list_assignments(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<PackingAssignment>>> {
    let assignments = state.packing.packer_assignments(id).await?;
    Ok(Json(assignments))
}

/// GET /api/packers/:id/stats
pub async fn stats(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PackerStats>> {
    let stats = state.packing.packer_stats(id).await?;
    Ok(Json(stats))
}
