//! Server State
//!
//! 显式构造的上下文对象，持有连接池、事件 hub、邮件发送器和业务服务。
//! 所有 handler 通过 `State<ServerState>` 访问，克隆成本很低。

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::{Config, Result};
use crate::db::DbService;
use crate::events::EventHub;
use crate::notify::{Mailer, mailer_from_config};
use crate::orders::OrderService;
use crate::packing::{PackingService, PackingSettings};

/// 服务器状态
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Arc<Config>,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 实时事件 hub
    pub events: EventHub,
    /// 邮件发送器
    pub mailer: Arc<dyn Mailer>,
    /// 打包分配服务
    pub packing: PackingService,
    /// 订单服务
    pub orders: OrderService,
}

impl ServerState {
    /// 手动构造 (通常使用 [`ServerState::initialize`])
    pub fn new(config: Config, pool: SqlitePool, mailer: Arc<dyn Mailer>) -> Self {
        let events = EventHub::new(config.event_channel_capacity);
        let packing = PackingService::new(
            pool.clone(),
            events.clone(),
            mailer.clone(),
            PackingSettings::from(&config),
        );
        let orders = OrderService::new(pool.clone(), events.clone(), mailer.clone());
        Self {
            config: Arc::new(config),
            pool,
            events,
            mailer,
            packing,
            orders,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建工作目录
    /// 2. 打开数据库并执行迁移
    /// 3. 根据配置选择邮件发送器
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let db = DbService::new(&config.database_path()).await?;
        let mailer = mailer_from_config(config);

        tracing::info!(
            work_dir = %config.work_dir,
            qr_enabled = config.qr_enabled,
            token_ttl_hours = config.packing_token_ttl_hours,
            "Server state initialized"
        );
        Ok(Self::new(config.clone(), db.pool, mailer))
    }

    /// In-memory database, for tests and demos
    pub async fn in_memory(config: Config) -> Result<Self> {
        let db = DbService::in_memory().await?;
        let mailer = mailer_from_config(&config);
        Ok(Self::new(config, db.pool, mailer))
    }

    /// Replace the mailer, rebuilding the services that hold it.
    /// The event hub and its subscribers are kept.
    pub fn with_mailer(self, mailer: Arc<dyn Mailer>) -> Self {
        let packing = PackingService::new(
            self.pool.clone(),
            self.events.clone(),
            mailer.clone(),
            PackingSettings::from(self.config.as_ref()),
        );
        let orders = OrderService::new(self.pool.clone(), self.events.clone(), mailer.clone());
        Self {
            mailer,
            packing,
            orders,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryMailer;
    use shared::message::RealtimeEvent;
    use shared::models::OrderDeleted;

    #[tokio::test]
    async fn with_mailer_keeps_event_subscribers() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
        let state = ServerState::in_memory(config).await.unwrap();
        let mut rx = state.events.subscribe();

        let mailer = Arc::new(MemoryMailer::new());
        let state = state.with_mailer(mailer.clone());
        assert_eq!(state.events.subscriber_count(), 1);

        state.events.publish(RealtimeEvent::OrderDeleted(OrderDeleted { id: 9 }));
        assert_eq!(rx.recv().await.unwrap().name(), "orderDeleted");
    }
}
