//! HTTP API
//!
//! | 前缀 | 模块 | 说明 |
//! |------|------|------|
//! | /health | [`health`] | 健康检查 |
//! | /api/customers | [`customers`] | 客户 |
//! | /api/packers | [`packers`] | 打包员 |
//! | /api/products | [`products`] | 商品及规格 |
//! | /api/raw-materials | [`raw_materials`] | 原材料库存 |
//! | /api/orders | [`orders`] | 订单、状态变更、发票 |
//! | /packing, /api/packing | [`packing`] | 打包分配 (令牌访问) |
//! | /ws | [`ws`] | 实时事件推送 |

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod customers;
pub mod health;
pub mod middleware;
pub mod orders;
pub mod packers;
pub mod packing;
pub mod products;
pub mod raw_materials;
pub mod ws;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(customers::router())
        .merge(packers::router())
        .merge(products::router())
        .merge(raw_materials::router())
        .merge(orders::router())
        .merge(packing::router())
        .merge(ws::router())
}

/// Build a fully configured application with all middleware
///
/// Used by both the HTTP server and router-level tests
pub fn build_app(_state: &ServerState) -> Router<ServerState> {
    build_router()
        // CORS - admin UI and packer pages are served from another origin
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        // Request logging
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        // Request ID - set before logging sees the request, echoed on the response
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
}
