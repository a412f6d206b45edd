//! 订单邮件模板

use shared::models::{Customer, Order};

use super::EmailMessage;

fn recipient(customer: &Customer) -> Option<String> {
    customer
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
}

fn item_lines(order: &Order) -> String {
    order
        .items
        .iter()
        .map(|item| {
            let unit = item.unit.as_deref().unwrap_or("");
            format!("  - {} x {}{}", item.product_name, item.quantity, unit_suffix(unit))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn unit_suffix(unit: &str) -> String {
    if unit.is_empty() {
        String::new()
    } else {
        format!(" {unit}")
    }
}

/// Order confirmation. `None` when the customer has no email.
pub fn order_created(order: &Order, customer: &Customer) -> Option<EmailMessage> {
    let to = recipient(customer)?;
    let body = format!(
        "Hello {name},\n\n\
         We received your order {barcode}.\n\n\
         {items}\n\n\
         Total: {total:.2}\n\n\
         We will let you know once it is packed.",
        name = customer.name,
        barcode = order.barcode,
        items = item_lines(order),
        total = order.total_amount,
    );
    Some(EmailMessage {
        to,
        subject: format!("Order {} received", order.barcode),
        body,
    })
}

/// Packed notification. `None` when the customer has no email.
pub fn order_packed(order: &Order, customer: &Customer) -> Option<EmailMessage> {
    let to = recipient(customer)?;
    let body = format!(
        "Hello {name},\n\n\
         Your order {barcode} has been packed and will ship soon.\n\n\
         {items}",
        name = customer.name,
        barcode = order.barcode,
        items = item_lines(order),
    );
    Some(EmailMessage {
        to,
        subject: format!("Order {} packed", order.barcode),
        body,
    })
}
