//! Shared types for the order/packing service
//!
//! Wire and domain types used by order-server and its clients: error codes,
//! entity models and DTOs, real-time events, and small utilities.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::RealtimeEvent;
