//! 打包分配工作流
//!
//! ```text
//! Pending ──assign──▶ Packing ──confirm(token)──▶ Packed
//!                      │  ▲
//!                      └──┘ re-assign (revokes the previous token)
//! ```
//!
//! - [`token`] - 随机访问令牌
//! - [`links`] - 打包员链接 (移动端 / PC 端)
//! - [`qr`] - 二维码渲染
//! - [`workflow`] - assign / view / confirm / stats

pub mod links;
pub mod qr;
pub mod token;
pub mod workflow;

pub use links::PackingLinks;
pub use workflow::{PackingService, PackingSettings};
