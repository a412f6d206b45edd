//! Order Model

use serde::{Deserialize, Serialize};

/// Order status (订单状态)
///
/// ```text
/// Pending ──assign──▶ Packing ──confirm──▶ Packed ──▶ Shipped ──▶ Delivered
///    │                   │                   └──────────────────────▲
///    └──────cancel───────┴──▶ Cancelled
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "PascalCase"))]
pub enum OrderStatus {
    Pending,
    Packing,
    Packed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Packing => "Packing",
            Self::Packed => "Packed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Packed and later statuses, plus Cancelled. No packer can be assigned.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Packed | Self::Shipped | Self::Delivered | Self::Cancelled
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    /// Σ quantity × unit price, fixed at creation
    pub total_amount: f64,
    /// Snapshot of the customer's balance at creation
    pub pending_payments: f64,
    pub status: OrderStatus,
    pub packer_id: Option<i64>,
    pub packing_assignment_id: Option<i64>,
    pub is_personalized: bool,
    pub payment_method: Option<String>,
    pub barcode: String,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Canonical order line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub unit: Option<String>,
}

/// Product reference as sent by the admin UI when the item is populated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemProductRef {
    pub name: Option<String>,
    pub unit: Option<String>,
}

/// Loosely-shaped line item as submitted by clients.
///
/// The name may arrive as `productName`, `name` or `product.name`, the price
/// as `unitPrice` or `price`. Normalized once at the API boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_name: Option<String>,
    pub name: Option<String>,
    pub product: Option<OrderItemProductRef>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub price: Option<f64>,
    pub unit: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub customer_id: i64,
    pub items: Vec<OrderItemInput>,
    pub is_personalized: Option<bool>,
    pub payment_method: Option<String>,
}

/// Admin status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    /// Status the caller last observed. Defaults to the current stored status.
    pub expected_status: Option<OrderStatus>,
}

/// Order list filters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<i64>,
}

/// `orderDeleted` payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderDeleted {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Packing.is_terminal());
        assert!(OrderStatus::Packed.is_terminal());
        assert!(OrderStatus::Shipped.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn status_serializes_pascal_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Packing).unwrap(),
            "\"Packing\""
        );
        let status: OrderStatus = serde_json::from_str("\"Cancelled\"").unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
        assert!(serde_json::from_str::<OrderStatus>("\"invoiced\"").is_err());
    }

    #[test]
    fn item_input_accepts_every_shape() {
        let a: OrderItemInput =
            serde_json::from_str(r#"{"productName":"Soap","quantity":3,"unitPrice":100}"#).unwrap();
        assert_eq!(a.product_name.as_deref(), Some("Soap"));

        let b: OrderItemInput =
            serde_json::from_str(r#"{"name":"Soap","quantity":1,"price":50}"#).unwrap();
        assert_eq!(b.name.as_deref(), Some("Soap"));
        assert_eq!(b.price, Some(50.0));

        let c: OrderItemInput = serde_json::from_str(
            r#"{"product":{"name":"Soap","unit":"bar"},"quantity":2,"unitPrice":10}"#,
        )
        .unwrap();
        assert_eq!(c.product.unwrap().unit.as_deref(), Some("bar"));
    }
}
