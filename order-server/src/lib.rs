//! Order Server - 订单与库存后端
//!
//! # 架构概述
//!
//! 核心是打包分配流程：管理员把订单分配给打包员，系统生成一次性令牌和
//! 链接/二维码，打包员凭令牌查看脱敏的订单内容并确认打包完成。
//!
//! - **打包流程** (`packing`): 分配、令牌、确认，全部状态写入都是 CAS
//! - **订单** (`orders`): 明细归一、总额计算、管理员状态变更、发票
//! - **数据库** (`db`): SQLite (sqlx)，嵌入式迁移
//! - **实时事件** (`events`): broadcast hub，经 `/ws` 推送
//! - **邮件** (`notify`): 下单/打包完成通知，失败只记录日志
//! - **HTTP API** (`api`): axum 路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、服务器、错误
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 连接池和仓储
//! ├── packing/       # 打包分配流程
//! ├── orders/        # 订单服务
//! ├── events/        # 实时事件 hub
//! ├── notify/        # 邮件
//! └── utils/         # 错误、日志、金额、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod events;
pub mod notify;
pub mod orders;
pub mod packing;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerError, ServerState};
pub use events::EventHub;
pub use orders::OrderService;
pub use packing::PackingService;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 设置运行环境
///
/// 1. 加载 `.env`
/// 2. 创建工作目录
/// 3. 初始化日志 (控制台 + `WORK_DIR/logs` 按天滚动)
pub fn setup_environment() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let log_dir = config.log_dir();
    init_logger_with_file(&config.log_level, config.log_json, Some(log_dir.as_path()))?;
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ___          _
 / _ \ _ __ __| | ___ _ __ ___
| | | | '__/ _` |/ _ \ '__/ __|
| |_| | | | (_| |  __/ |  \__ \
 \___/|_|  \__,_|\___|_|  |___/
    "#
    );
}
