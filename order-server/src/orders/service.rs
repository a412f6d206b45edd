//! Order Service
//!
//! Creation, admin status changes and deletion. The packing transitions
//! (`Pending → Packing → Packed`) belong to [`crate::packing`] and are refused
//! here.

use std::sync::Arc;

use shared::message::RealtimeEvent;
use shared::models::{
    InvoiceSummary, Order, OrderCreate, OrderDeleted, OrderItem, OrderStatus, OrderStatusUpdate,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::invoice::build_invoice;
use super::items::normalize_items;
use crate::db::repository::{self, RepoError, customer, order, packing};
use crate::events::EventHub;
use crate::notify::{self, Mailer};
use crate::utils::money::{subtotal, to_f64};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, normalize_optional, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// 管理员可执行的状态变更
///
/// | From | To |
/// |------|----|
/// | Pending, Packing | Cancelled |
/// | Packed | Shipped |
/// | Packed, Shipped | Delivered |
pub fn admin_transition_allowed(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
        (from, to),
        (Pending | Packing, Cancelled) | (Packed, Shipped) | (Packed | Shipped, Delivered)
    )
}

/// 订单服务
#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    events: EventHub,
    mailer: Arc<dyn Mailer>,
}

impl OrderService {
    pub fn new(pool: SqlitePool, events: EventHub, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            pool,
            events,
            mailer,
        }
    }

    /// Create an order in `Pending`.
    ///
    /// All items are validated before anything is written. The total is fixed
    /// here and the customer's current balance is copied onto the order.
    pub async fn create_order(&self, payload: OrderCreate) -> AppResult<Order> {
        let items = normalize_items(&payload.items)?;
        validate_optional_text(&payload.payment_method, "paymentMethod", MAX_SHORT_TEXT_LEN)?;

        let total = subtotal(items.iter().map(|item| (item.quantity, item.unit_price)))
            .ok_or_else(|| {
                AppError::validation("Order total is out of range").with_detail("field", "items")
            })?;

        let mut tx = repository::begin_write(&self.pool).await?;
        let owner = customer::find_by_id(&mut *tx, payload.customer_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::CustomerNotFound)
                    .with_detail("customerId", payload.customer_id)
            })?;

        let now = now_millis();
        let id = snowflake_id();
        let new_order = Order {
            id,
            customer_id: owner.id,
            total_amount: to_f64(total),
            pending_payments: owner.pending_payments,
            status: OrderStatus::Pending,
            packer_id: None,
            packing_assignment_id: None,
            is_personalized: payload.is_personalized.unwrap_or(false),
            payment_method: normalize_optional(payload.payment_method),
            barcode: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            items: items
                .into_iter()
                .map(|item| OrderItem {
                    id: snowflake_id(),
                    order_id: id,
                    product_name: item.product_name,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    unit: item.unit,
                })
                .collect(),
        };

        order::insert(&mut tx, &new_order).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            order_id = new_order.id,
            customer_id = owner.id,
            total = new_order.total_amount,
            items = new_order.items.len(),
            "Order created"
        );

        if let Some(message) = notify::templates::order_created(&new_order, &owner) {
            notify::spawn_send(self.mailer.clone(), message);
        }
        self.events
            .publish(RealtimeEvent::order_created(new_order.clone()));

        Ok(new_order)
    }

    pub async fn get_order(&self, id: i64) -> AppResult<Order> {
        let mut conn = self.pool.acquire().await.map_err(RepoError::from)?;
        order::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| order_not_found(id))
    }

    /// Admin status change, compare-and-set against `expected_status` (or
    /// the stored status when absent). Cancelling a packing order revokes its
    /// open assignment.
    pub async fn update_status(&self, id: i64, payload: OrderStatusUpdate) -> AppResult<Order> {
        let target = payload.status;
        let now = now_millis();
        let mut tx = repository::begin_write(&self.pool).await?;

        let current = order::find_status(&mut *tx, id)
            .await?
            .ok_or_else(|| order_not_found(id))?;
        let expected = payload.expected_status.unwrap_or(current);

        if !admin_transition_allowed(expected, target) {
            return Err(AppError::with_message(
                ErrorCode::OrderInvalidTransition,
                format!("Cannot change order status from {expected} to {target}"),
            )
            .with_detail("from", expected.as_str())
            .with_detail("to", target.as_str()));
        }

        let moved = order::update_status(&mut tx, id, expected, target, now).await?;
        if !moved {
            return Err(AppError::with_message(
                ErrorCode::OrderStatusConflict,
                format!("Order {id} is {current}, expected {expected}"),
            )
            .with_detail("orderId", id)
            .with_detail("expected", expected.as_str())
            .with_detail("actual", current.as_str()));
        }

        let revoked = if target == OrderStatus::Cancelled {
            packing::revoke_open_for_order(&mut tx, id, now).await?
        } else {
            0
        };

        let updated = order::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| order_not_found(id))?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id = id, from = %expected, to = %target, revoked, "Order status changed");
        self.events
            .publish(RealtimeEvent::order_updated(updated.clone()));
        Ok(updated)
    }

    /// Delete an order with its items and packing assignments
    pub async fn delete_order(&self, id: i64) -> AppResult<()> {
        if !order::delete(&self.pool, id).await? {
            return Err(order_not_found(id));
        }
        tracing::info!(order_id = id, "Order deleted");
        self.events
            .publish(RealtimeEvent::OrderDeleted(OrderDeleted { id }));
        Ok(())
    }

    pub async fn invoice(&self, id: i64, pending_paid: bool) -> AppResult<InvoiceSummary> {
        let mut conn = self.pool.acquire().await.map_err(RepoError::from)?;
        let found = order::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| order_not_found(id))?;
        let owner = customer::find_by_id(&mut *conn, found.customer_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::CustomerNotFound).with_detail("customerId", found.customer_id)
            })?;
        Ok(build_invoice(&found, &owner, pending_paid, now_millis()))
    }
}

fn order_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::OrderNotFound).with_detail("orderId", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;
    use crate::notify::MemoryMailer;
    use shared::models::OrderItemInput;

    fn line(name: &str, quantity: f64, unit_price: f64) -> OrderItemInput {
        OrderItemInput {
            product_name: Some(name.into()),
            quantity: Some(quantity),
            unit_price: Some(unit_price),
            ..Default::default()
        }
    }

    async fn service() -> (OrderService, SqlitePool, EventHub, Arc<MemoryMailer>) {
        let pool = test_support::pool().await;
        let events = EventHub::new(16);
        let mailer = Arc::new(MemoryMailer::new());
        let service = OrderService::new(pool.clone(), events.clone(), mailer.clone());
        (service, pool, events, mailer)
    }

    fn create(customer_id: i64) -> OrderCreate {
        OrderCreate {
            customer_id,
            items: vec![line("Soap", 3.0, 100.0), line("Towel", 1.0, 50.0)],
            is_personalized: None,
            payment_method: Some(" cash ".into()),
        }
    }

    #[test]
    fn transition_table() {
        use OrderStatus::*;
        assert!(admin_transition_allowed(Pending, Cancelled));
        assert!(admin_transition_allowed(Packing, Cancelled));
        assert!(admin_transition_allowed(Packed, Shipped));
        assert!(admin_transition_allowed(Packed, Delivered));
        assert!(admin_transition_allowed(Shipped, Delivered));

        assert!(!admin_transition_allowed(Pending, Packing));
        assert!(!admin_transition_allowed(Packing, Packed));
        assert!(!admin_transition_allowed(Packed, Cancelled));
        assert!(!admin_transition_allowed(Delivered, Shipped));
        assert!(!admin_transition_allowed(Cancelled, Pending));
    }

    #[tokio::test]
    async fn create_computes_total_and_snapshots_balance() {
        let (service, pool, events, _) = service().await;
        let mut rx = events.subscribe();
        let alice = test_support::customer(&pool, "Alice", 42.0).await;

        let created = service.create_order(create(alice.id)).await.unwrap();
        assert_eq!(created.total_amount, 350.0);
        assert_eq!(created.pending_payments, 42.0);
        assert_eq!(created.status, OrderStatus::Pending);
        assert_eq!(created.payment_method.as_deref(), Some("cash"));
        assert_eq!(created.items.len(), 2);
        assert!(uuid::Uuid::parse_str(&created.barcode).is_ok());
        assert_eq!(rx.recv().await.unwrap().name(), "orderCreated");

        // Later balance changes do not touch the order
        customer::update(
            &pool,
            alice.id,
            &shared::models::CustomerUpdate {
                pending_payments: Some(0.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(service.get_order(created.id).await.unwrap().pending_payments, 42.0);
    }

    #[tokio::test]
    async fn invalid_item_persists_nothing() {
        let (service, pool, _, _) = service().await;
        let alice = test_support::customer(&pool, "Alice", 0.0).await;
        let mut payload = create(alice.id);
        payload.items.push(line("Broken", 1.0, 0.0));

        let err = service.create_order(payload).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidItem);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_order")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn stored_total_equals_exact_line_sum() {
        let (service, pool, _, _) = service().await;
        let alice = test_support::customer(&pool, "Alice", 0.0).await;

        let mut payload = create(alice.id);
        payload.items = vec![
            line("Pin", 3.0, 0.33),
            line("Rope", 1.5, 0.02),
            line("Tape", 7.0, 19.99),
        ];
        let created = service.create_order(payload).await.unwrap();
        // 0.99 + 0.03 + 139.93
        assert_eq!(created.total_amount, 140.95);

        let mut payload = create(alice.id);
        payload.items = vec![line("Pin", 1.0, 0.004), line("Clip", 3.0, 0.333)];
        let err = service.create_order(payload).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidItem);
        assert_eq!(err.details.unwrap()["field"], "unitPrice");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_order")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn unknown_customer_rejected() {
        let (service, _, _, _) = service().await;
        let err = service.create_order(create(12345)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CustomerNotFound);
    }

    #[tokio::test]
    async fn confirmation_email_sent_when_customer_has_email() {
        let (service, pool, _, mailer) = service().await;
        let alice = test_support::customer(&pool, "Alice", 0.0).await;
        service.create_order(create(alice.id)).await.unwrap();

        for _ in 0..50 {
            if !mailer.sent().is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(mailer.sent()[0].to, "alice@example.com");
    }

    #[tokio::test]
    async fn admin_status_flow() {
        let (service, pool, _, _) = service().await;
        let alice = test_support::customer(&pool, "Alice", 0.0).await;
        let created = service.create_order(create(alice.id)).await.unwrap();

        let err = service
            .update_status(
                created.id,
                OrderStatusUpdate {
                    status: OrderStatus::Packing,
                    expected_status: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidTransition);

        // Stale expectation loses
        let err = service
            .update_status(
                created.id,
                OrderStatusUpdate {
                    status: OrderStatus::Delivered,
                    expected_status: Some(OrderStatus::Shipped),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderStatusConflict);

        let cancelled = service
            .update_status(
                created.id,
                OrderStatusUpdate {
                    status: OrderStatus::Cancelled,
                    expected_status: Some(OrderStatus::Pending),
                },
            )
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn delete_emits_event_and_cascades() {
        let (service, pool, events, _) = service().await;
        let alice = test_support::customer(&pool, "Alice", 0.0).await;
        let created = service.create_order(create(alice.id)).await.unwrap();
        let mut rx = events.subscribe();

        service.delete_order(created.id).await.unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            RealtimeEvent::OrderDeleted(OrderDeleted { id: created.id })
        );
        let err = service.get_order(created.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        let err = service.delete_order(created.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }

    #[tokio::test]
    async fn invoice_folds_pending_balance() {
        let (service, pool, _, _) = service().await;
        let alice = test_support::customer(&pool, "Alice", 20.0).await;
        let created = service.create_order(create(alice.id)).await.unwrap();

        let invoice = service.invoice(created.id, false).await.unwrap();
        assert_eq!(invoice.grand_total, 370.0);
        let invoice = service.invoice(created.id, true).await.unwrap();
        assert_eq!(invoice.grand_total, 350.0);
    }
}
