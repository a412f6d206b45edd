//! Packing API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /packing/{orderId}/assign | PUT | 分配打包员，返回令牌、链接、二维码 |
//! | /packing/{token} | GET | 完整分配详情 (内部) |
//! | /packing/for-packer/{token} | GET | 打包员视图 (脱敏) |
//! | /packing/for-packer?token= | GET | 同上，查询参数形式 |
//! | /packing/{token}/{orderId}/packed | PUT | 确认打包完成 |
//! | /packing/packer/{packerId}/stats | GET | 打包员统计 |
//!
//! 同样的路由也挂在 `/api/packing` 下。令牌是唯一凭证。

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/packing", routes())
        .nest("/api/packing", routes())
}

// 第二段统一用 `{key}`：分配时是订单 ID，其余是令牌
fn routes() -> Router<ServerState> {
    Router::new()
        .route("/for-packer", get(handler::packer_view_by_query))
        .route("/for-packer/{token}", get(handler::packer_view))
        .route("/packer/{packer_id}/stats", get(handler::packer_stats))
        .route("/{key}", get(handler::assignment_detail))
        .route("/{key}/assign", put(handler::assign))
        .route("/{key}/{order_id}/packed", put(handler::confirm_packed))
}
