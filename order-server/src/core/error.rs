//! Server lifecycle errors
//!
//! Request-level failures use [`crate::utils::AppError`]; this type only
//! covers startup and the serve loop.

use thiserror::Error;

use crate::utils::AppError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("初始化失败: {0}")]
    Init(#[from] AppError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
