//! Packing Assignment Models
//!
//! An assignment links one order to one packer for one packing cycle and
//! carries the bearer token the packer uses to read and confirm it.

use super::customer::Customer;
use super::order::{Order, OrderStatus};
use super::packer::Packer;
use serde::{Deserialize, Serialize};

/// Assignment status: `assigned → packed` (terminal)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum AssignmentStatus {
    Assigned,
    Packed,
}

/// PackingAssignment entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PackingAssignment {
    pub id: i64,
    pub order_id: i64,
    pub packer_id: i64,
    /// Bearer credential. Only ever returned to the admin who assigned.
    #[serde(skip_serializing, default)]
    pub token: String,
    pub status: AssignmentStatus,
    pub expires_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PackingAssignment {
    /// Open = still assigned and not yet expired
    pub fn is_open_at(&self, now: i64) -> bool {
        self.status == AssignmentStatus::Assigned && self.expires_at > now
    }
}

/// PUT /packing/{order_id}/assign body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPackerRequest {
    pub packer_id: i64,
}

/// PUT /packing/{order_id}/assign response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPackerResponse {
    pub success: bool,
    pub packing_token: String,
    /// `data:image/png;base64,...`, absent when rendering failed or is disabled
    pub qr_base64: Option<String>,
    /// Mobile flow link (`/packing?token=`)
    pub packer_link: String,
    /// Desktop flow link (`/for-packer?token=`)
    pub pc_link: String,
    pub assignment_id: i64,
    pub expires_at: i64,
}

/// Full internal view of an assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetail {
    pub assignment: PackingAssignment,
    pub order: Order,
    pub customer: Customer,
    pub packer: Packer,
}

impl AssignmentDetail {
    /// Redacted projection shown to a packer: customer contact and what to
    /// pack, nothing commercial
    pub fn packer_view(&self) -> PackerAssignmentView {
        PackerAssignmentView {
            assignment_id: self.assignment.id,
            order_id: self.order.id,
            status: self.assignment.status,
            expires_at: self.assignment.expires_at,
            is_personalized: self.order.is_personalized,
            customer: PackerCustomerView {
                name: self.customer.name.clone(),
                address: self.customer.address.clone(),
                phone: self.customer.phone.clone(),
            },
            items: self
                .order
                .items
                .iter()
                .map(|item| PackerItemView {
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    unit: item.unit.clone(),
                })
                .collect(),
        }
    }
}

/// Customer fields a packer is allowed to see
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackerCustomerView {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Item fields a packer is allowed to see
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackerItemView {
    pub product_name: String,
    pub quantity: f64,
    pub unit: Option<String>,
}

/// Sanitized assignment as shown to a packer. No prices, totals or dates
/// of the order itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackerAssignmentView {
    pub assignment_id: i64,
    pub order_id: i64,
    pub status: AssignmentStatus,
    pub expires_at: i64,
    pub is_personalized: bool,
    pub customer: PackerCustomerView,
    pub items: Vec<PackerItemView>,
}

/// GET /packing/for-packer response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerAssignmentsResponse {
    pub assignments: Vec<PackerAssignmentView>,
}

/// PUT /packing/{token}/{order_id}/packed response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPackedResponse {
    pub success: bool,
    pub message: String,
    pub order_id: i64,
}

/// `packingConfirmed` payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackingConfirmed {
    pub order_id: i64,
    pub status: OrderStatus,
}
