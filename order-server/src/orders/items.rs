//! Order line normalization
//!
//! Clients send line items in several shapes. [`normalize_items`] is the
//! only place that knows about them; everything downstream sees
//! [`NormalizedItem`].
//!
//! | Field | Accepted keys (first present wins) |
//! |-------|------------------------------------|
//! | name | `productName`, `name`, `product.name` |
//! | price | `unitPrice`, `price` |
//! | unit | `unit`, `product.unit` |

use shared::models::OrderItemInput;

use crate::utils::money::{checked_line_total, is_whole_cents, to_decimal};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN};
use crate::utils::{AppError, ErrorCode};

/// Canonical order line
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedItem {
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub unit: Option<String>,
}

fn first_text<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn invalid_item(index: usize, field: &str, message: impl Into<String>) -> AppError {
    AppError::with_message(ErrorCode::OrderInvalidItem, message)
        .with_detail("index", index)
        .with_detail("field", field)
}

fn normalize_item(index: usize, input: &OrderItemInput) -> Result<NormalizedItem, AppError> {
    let product = input.product.as_ref();

    let product_name = first_text([
        input.product_name.as_deref(),
        input.name.as_deref(),
        product.and_then(|p| p.name.as_deref()),
    ])
    .ok_or_else(|| invalid_item(index, "productName", format!("Item {index} has no product name")))?;
    if product_name.chars().count() > MAX_NAME_LEN {
        return Err(invalid_item(
            index,
            "productName",
            format!("Item {index} product name is too long (max {MAX_NAME_LEN})"),
        ));
    }

    let quantity = input
        .quantity
        .filter(|q| q.is_finite() && *q > 0.0)
        .ok_or_else(|| {
            invalid_item(index, "quantity", format!("Item {index} quantity must be greater than zero"))
        })?;

    let unit_price = input
        .unit_price
        .or(input.price)
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| {
            invalid_item(index, "unitPrice", format!("Item {index} unit price must be greater than zero"))
        })?;

    if !is_whole_cents(to_decimal(unit_price)) {
        return Err(invalid_item(
            index,
            "unitPrice",
            format!("Item {index} unit price must have at most 2 decimal places"),
        ));
    }
    match checked_line_total(quantity, unit_price) {
        Some(line) if is_whole_cents(line) => {}
        Some(line) => {
            return Err(invalid_item(
                index,
                "quantity",
                format!("Item {index} line total {line} is not a whole number of cents"),
            ));
        }
        None => {
            return Err(invalid_item(
                index,
                "quantity",
                format!("Item {index} line total is out of range"),
            ));
        }
    }

    let unit = first_text([input.unit.as_deref(), product.and_then(|p| p.unit.as_deref())]);
    if unit.is_some_and(|u| u.chars().count() > MAX_SHORT_TEXT_LEN) {
        return Err(invalid_item(
            index,
            "unit",
            format!("Item {index} unit is too long (max {MAX_SHORT_TEXT_LEN})"),
        ));
    }

    Ok(NormalizedItem {
        product_name: product_name.to_string(),
        quantity,
        unit_price,
        unit: unit.map(str::to_string),
    })
}

/// Normalize and validate every line. Any invalid line rejects the whole list.
pub fn normalize_items(items: &[OrderItemInput]) -> Result<Vec<NormalizedItem>, AppError> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| normalize_item(index, item))
        .collect()
}
