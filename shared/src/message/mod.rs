//! 实时事件类型定义
//!
//! Events pushed from order-server to connected admin/packer clients.
//! Wire format is `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Order, OrderDeleted, PackingAssignment, PackingConfirmed};

/// Real-time event (fire-and-forget UI refresh hint)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum RealtimeEvent {
    OrderCreated(Box<Order>),
    OrderUpdated(Box<Order>),
    OrderDeleted(OrderDeleted),
    PackingAssignmentCreated(PackingAssignment),
    PackingAssignmentUpdated(PackingAssignment),
    PackingConfirmed(PackingConfirmed),
    /// Sent to a subscriber that fell behind; it should refetch
    Resync,
}

impl RealtimeEvent {
    /// Event name as seen on the wire
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OrderCreated(_) => "orderCreated",
            Self::OrderUpdated(_) => "orderUpdated",
            Self::OrderDeleted(_) => "orderDeleted",
            Self::PackingAssignmentCreated(_) => "packingAssignmentCreated",
            Self::PackingAssignmentUpdated(_) => "packingAssignmentUpdated",
            Self::PackingConfirmed(_) => "packingConfirmed",
            Self::Resync => "resync",
        }
    }

    pub fn order_created(order: Order) -> Self {
        Self::OrderCreated(Box::new(order))
    }

    pub fn order_updated(order: Order) -> Self {
        Self::OrderUpdated(Box::new(order))
    }
}

impl fmt::Display for RealtimeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
