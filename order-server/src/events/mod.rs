//! EventHub - 实时事件分发
//!
//! ```text
//! workflow / handlers ──publish──▶ EventHub (broadcast) ──▶ /ws session ──▶ admin / packer UI
//! ```
//!
//! Delivery is best effort. `publish` never blocks and never fails the
//! caller; a subscriber that falls behind gets a `resync` hint and is
//! expected to refetch.

use shared::message::RealtimeEvent;
use tokio::sync::broadcast;

/// Broadcast channel 容量默认值
pub const DEFAULT_CAPACITY: usize = 256;

/// 实时事件 hub (cheap to clone)
#[derive(Debug, Clone)]
pub struct EventHub {
    tx: broadcast::Sender<RealtimeEvent>,
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Fan an event out to every connected subscriber
    pub fn publish(&self, event: RealtimeEvent) {
        let name = event.name();
        match self.tx.send(event) {
            Ok(receivers) => tracing::debug!(event = name, receivers, "Event published"),
            // 无订阅者时 send 返回 Err，安全忽略
            Err(_) => tracing::trace!(event = name, "No subscribers, event dropped"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderDeleted;
    use tokio::sync::broadcast::error::RecvError;

    #[test]
    fn publish_without_subscribers_is_silent() {
        let hub = EventHub::new(4);
        hub.publish(RealtimeEvent::OrderDeleted(OrderDeleted { id: 1 }));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn every_subscriber_receives_in_order() {
        let hub = EventHub::new(8);
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();

        hub.publish(RealtimeEvent::OrderDeleted(OrderDeleted { id: 1 }));
        hub.publish(RealtimeEvent::OrderDeleted(OrderDeleted { id: 2 }));

        for rx in [&mut a, &mut b] {
            assert_eq!(
                rx.recv().await.unwrap(),
                RealtimeEvent::OrderDeleted(OrderDeleted { id: 1 })
            );
            assert_eq!(
                rx.recv().await.unwrap(),
                RealtimeEvent::OrderDeleted(OrderDeleted { id: 2 })
            );
        }
    }

    #[tokio::test]
    async fn slow_subscriber_observes_lag() {
        let hub = EventHub::new(2);
        let mut rx = hub.subscribe();
        for id in 0..5 {
            hub.publish(RealtimeEvent::OrderDeleted(OrderDeleted { id }));
        }
        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(3))));
        // Receiver continues from the oldest retained event
        assert_eq!(
            rx.recv().await.unwrap(),
            RealtimeEvent::OrderDeleted(OrderDeleted { id: 3 })
        );
    }
}
