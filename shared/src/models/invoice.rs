//! Invoice Summary
//!
//! Presentation-time projection of an order. Nothing here is persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub product_name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub order_id: i64,
    pub barcode: String,
    pub customer: InvoiceCustomer,
    pub items: Vec<InvoiceLine>,
    pub subtotal: f64,
    pub pending_payments: f64,
    pub pending_paid: bool,
    pub grand_total: f64,
    pub issued_at: i64,
}

/// GET /api/orders/{id}/invoice query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceQuery {
    #[serde(default)]
    pub pending_paid: bool,
}
