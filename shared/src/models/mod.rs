//! Data models
//!
//! Shared between order-server and the admin UI (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps Unix millis.

pub mod customer;
pub mod invoice;
pub mod order;
pub mod packer;
pub mod packing;
pub mod product;
pub mod raw_material;

// Re-exports
pub use customer::*;
pub use invoice::*;
pub use order::*;
pub use packer::*;
pub use packing::*;
pub use product::*;
pub use raw_material::*;
