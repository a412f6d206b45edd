//! 统一错误处理
//!
//! 错误类型定义在 `shared::error`，这里负责把仓储层错误翻译成 [`AppError`]。
//!
//! | RepoError | ErrorCode | HTTP |
//! |-----------|-----------|------|
//! | NotFound | NotFound | 404 |
//! | Duplicate | AlreadyExists | 409 |
//! | Conflict | AlreadyExists | 409 |
//! | Validation | ValidationFailed | 400 |
//! | Busy | TimeoutError | 503 |
//! | Database | DatabaseError | 500 |
//!
//! 数据库错误只记录日志，不把底层信息返回给调用方。

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Conflict(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Busy(msg) => {
                tracing::warn!(error = %msg, "Database busy, write lock not acquired");
                AppError::with_message(ErrorCode::TimeoutError, "Database is busy, retry the request")
            }
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database operation failed");
                AppError::database("Database error")
            }
        }
    }
}
