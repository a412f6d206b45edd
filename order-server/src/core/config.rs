use std::path::PathBuf;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | PUBLIC_BASE_URL | http://localhost:3000 | 打包员链接的前端地址 |
/// | PACKING_TOKEN_TTL_HOURS | 24 | 打包令牌有效期(小时) |
/// | QR_ENABLED | true | 是否生成二维码 |
/// | EVENT_CHANNEL_CAPACITY | 256 | 实时事件缓冲区大小 |
/// | MAIL_RELAY_URL | - | 邮件中继地址 (未设置则只记录日志) |
/// | MAIL_FROM | orders@localhost | 发件人 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_JSON | false | JSON 格式日志 |
/// | ENVIRONMENT | development | 运行环境 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/orders HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// Origin the packer links point at (admin/packer frontend)
    pub public_base_url: String,
    /// 打包令牌有效期 (小时)
    pub packing_token_ttl_hours: i64,
    pub qr_enabled: bool,
    pub event_channel_capacity: usize,
    pub mail_relay_url: Option<String>,
    pub mail_from: String,
    pub log_level: String,
    pub log_json: bool,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: parse_env("HTTP_PORT", 5000),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            packing_token_ttl_hours: parse_env("PACKING_TOKEN_TTL_HOURS", 24),
            qr_enabled: parse_env("QR_ENABLED", true),
            event_channel_capacity: parse_env("EVENT_CHANNEL_CAPACITY", 256),
            mail_relay_url: std::env::var("MAIL_RELAY_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            mail_from: std::env::var("MAIL_FROM").unwrap_or_else(|_| "orders@localhost".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: parse_env("LOG_JSON", false),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            shutdown_timeout_ms: parse_env("SHUTDOWN_TIMEOUT_MS", 10000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// SQLite 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("orders.db")
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 打包令牌有效期 (毫秒)
    pub fn packing_token_ttl_ms(&self) -> i64 {
        self.packing_token_ttl_hours.max(1) * 60 * 60 * 1000
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
