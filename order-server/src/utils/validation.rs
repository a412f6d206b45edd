//! Input validation helpers
//!
//! Centralized text length constants and validation functions shared by the
//! CRUD handlers and the order service. SQLite TEXT has no built-in length
//! enforcement, so limits live here.

use crate::utils::{AppError, ErrorCode};
use validator::ValidateEmail;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: customer, packer, product, raw material, order line
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, unit, size, barcode, payment method
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(len) = value.as_ref().map(|v| v.chars().count())
        && len > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate an optional email address. Blank counts as absent.
pub fn validate_optional_email(value: &Option<String>) -> Result<(), AppError> {
    validate_optional_text(value, "email", MAX_EMAIL_LEN)?;
    if let Some(email) = value
        && !email.trim().is_empty()
        && !email.trim().validate_email()
    {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("Invalid email address: {email}"),
        )
        .with_detail("field", "email"));
    }
    Ok(())
}

/// Validate a finite, non-negative quantity or amount.
pub fn validate_non_negative(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be a non-negative number, got {value}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a finite, strictly positive quantity or price.
pub fn validate_positive(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be greater than zero, got {value}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Trim an optional string, mapping blank to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
