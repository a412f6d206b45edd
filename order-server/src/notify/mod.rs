//! 通知模块 - 邮件发送
//!
//! - [`Mailer`] - 发送接口
//! - [`HttpMailer`] - 通过 HTTP 中继发送
//! - [`LogMailer`] - 仅记录日志 (未配置中继时的默认实现)
//! - [`templates`] - 订单创建 / 打包完成邮件
//!
//! 发送总是在后台任务中进行，失败只记录 WARN，不影响触发它的请求。

pub mod mailer;
pub mod templates;

pub use mailer::{
    EmailMessage, HttpMailer, LogMailer, MailError, Mailer, MemoryMailer, mailer_from_config,
    spawn_send,
};
