//! Invoice summary
//!
//! `grand_total = subtotal` when the customer's pending balance is marked
//! paid, `subtotal + pending_payments` otherwise. Computed on demand, never
//! written back to the order.

use shared::models::{
    Customer, InvoiceCustomer, InvoiceLine, InvoiceSummary, Order,
};

use crate::utils::money::{line_total, to_decimal, to_f64};

pub fn build_invoice(order: &Order, customer: &Customer, pending_paid: bool, issued_at: i64) -> InvoiceSummary {
    let lines: Vec<InvoiceLine> = order
        .items
        .iter()
        .map(|item| InvoiceLine {
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            unit_price: item.unit_price,
            line_total: to_f64(line_total(item.quantity, item.unit_price)),
        })
        .collect();

    let subtotal = to_decimal(order.total_amount);
    let grand_total = if pending_paid {
        subtotal
    } else {
        subtotal + to_decimal(order.pending_payments)
    };

    InvoiceSummary {
        order_id: order.id,
        barcode: order.barcode.clone(),
        customer: InvoiceCustomer {
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            address: customer.address.clone(),
        },
        items: lines,
        subtotal: to_f64(subtotal),
        pending_payments: order.pending_payments,
        pending_paid,
        grand_total: to_f64(grand_total),
        issued_at,
    }
}
