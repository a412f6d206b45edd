//! Order API 模块
//!
//! `Pending → Packing → Packed` 由打包流程驱动 (见 [`crate::api::packing`])，
//! 这里的状态接口只处理取消、发货和签收。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/", post(handler::create))
        .route("/barcode/{code}", get(handler::get_by_barcode))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/invoice", get(handler::invoice))
}
