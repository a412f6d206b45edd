//! Repository Module
//!
//! Free-function CRUD over SQLite. Functions that run inside a workflow
//! transaction take `&mut SqliteConnection`; single-statement readers take
//! any executor so they work with both the pool and a transaction.
//!
//! Read-then-write transactions are opened with [`begin_write`].

pub mod customer;
pub mod order;
pub mod packer;
pub mod packing;
pub mod product;
pub mod raw_material;

use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

/// SQLITE_BUSY and SQLITE_BUSY_SNAPSHOT
const SQLITE_BUSY_CODES: [&str; 2] = ["5", "517"];

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database busy: {0}")]
    Busy(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.message().to_string());
            }
            if db_err.is_check_violation() {
                return RepoError::Validation(db_err.message().to_string());
            }
            if db_err
                .code()
                .is_some_and(|code| SQLITE_BUSY_CODES.contains(&code.as_ref()))
            {
                return RepoError::Busy(db_err.message().to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Open a transaction holding the write lock from its first statement.
///
/// Under WAL a deferred transaction that read a snapshot cannot upgrade to a
/// writer after another connection committed (SQLITE_BUSY_SNAPSHOT).
pub async fn begin_write(pool: &SqlitePool) -> RepoResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::DbService;
    use shared::models::{Customer, CustomerCreate, Packer, PackerCreate};
    use sqlx::SqlitePool;

    pub async fn pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    pub async fn customer(pool: &SqlitePool, name: &str, pending: f64) -> Customer {
        super::customer::create(
            pool,
            &CustomerCreate {
                name: name.into(),
                email: Some(format!("{}@example.com", name.to_lowercase())),
                phone: Some("555-0100".into()),
                address: Some("1 Main St".into()),
                pending_payments: pending,
            },
        )
        .await
        .unwrap()
    }

    pub async fn packer(pool: &SqlitePool, name: &str) -> Packer {
        super::packer::create(
            pool,
            &PackerCreate {
                name: name.into(),
                phone: None,
                is_active: None,
            },
        )
        .await
        .unwrap()
    }
}
