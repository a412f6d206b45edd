//! 订单模块
//!
//! - [`items`] - 订单行归一化与校验 (边界适配器)
//! - [`service`] - 创建、管理员状态变更、删除
//! - [`invoice`] - 发票汇总 (展示时计算，不落库)

pub mod invoice;
pub mod items;
pub mod service;

pub use items::NormalizedItem;
pub use service::OrderService;
