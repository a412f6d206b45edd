//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Packing errors
//! - 6xxx: Catalog errors (products, raw materials)
//! - 7xxx: Customer errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the admin UI can switch
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no line items
    OrderEmpty = 4002,
    /// Order line item is invalid
    OrderInvalidItem = 4003,
    /// Order status changed concurrently
    OrderStatusConflict = 4004,
    /// Requested status transition is not allowed
    OrderInvalidTransition = 4005,
    /// Order is in a terminal status
    OrderTerminal = 4006,

    // ==================== 5xxx: Packing ====================
    /// Packer not found
    PackerNotFound = 5001,
    /// Packer is inactive
    PackerInactive = 5002,
    /// Packer still holds open assignments
    PackerHasActiveAssignments = 5003,
    /// Packing token is invalid, expired or already used
    AssignmentTokenInvalid = 5004,
    /// Assignment changed concurrently
    AssignmentConflict = 5005,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product barcode already in use
    ProductBarcodeExists = 6002,
    /// Raw material not found
    RawMaterialNotFound = 6101,
    /// Processed quantity exceeds initial quantity
    RawMaterialOverProcessed = 6102,

    // ==================== 7xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 7001,
    /// Pending payments must not be negative
    NegativeBalance = 7002,
    /// Customer still has orders
    CustomerHasOrders = 7003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::OrderInvalidItem => "Order item is invalid",
            ErrorCode::OrderStatusConflict => "Order status was changed by another request",
            ErrorCode::OrderInvalidTransition => "Order status transition is not allowed",
            ErrorCode::OrderTerminal => "Order is already finalized",

            // Packing
            ErrorCode::PackerNotFound => "Packer not found",
            ErrorCode::PackerInactive => "Packer is inactive",
            ErrorCode::PackerHasActiveAssignments => "Packer has open packing assignments",
            ErrorCode::AssignmentTokenInvalid => "Invalid or expired token",
            ErrorCode::AssignmentConflict => "Packing assignment was changed by another request",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductBarcodeExists => "Product barcode already exists",
            ErrorCode::RawMaterialNotFound => "Raw material not found",
            ErrorCode::RawMaterialOverProcessed => {
                "Processed quantity cannot exceed initial quantity"
            }

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::NegativeBalance => "Pending payments cannot be negative",
            ErrorCode::CustomerHasOrders => "Customer has existing orders",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderInvalidItem),
            4004 => Ok(ErrorCode::OrderStatusConflict),
            4005 => Ok(ErrorCode::OrderInvalidTransition),
            4006 => Ok(ErrorCode::OrderTerminal),

            // Packing
            5001 => Ok(ErrorCode::PackerNotFound),
            5002 => Ok(ErrorCode::PackerInactive),
            5003 => Ok(ErrorCode::PackerHasActiveAssignments),
            5004 => Ok(ErrorCode::AssignmentTokenInvalid),
            5005 => Ok(ErrorCode::AssignmentConflict),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductBarcodeExists),
            6101 => Ok(ErrorCode::RawMaterialNotFound),
            6102 => Ok(ErrorCode::RawMaterialOverProcessed),

            // Customer
            7001 => Ok(ErrorCode::CustomerNotFound),
            7002 => Ok(ErrorCode::NegativeBalance),
            7003 => Ok(ErrorCode::CustomerHasOrders),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidRequest,
        ErrorCode::InvalidFormat,
        ErrorCode::RequiredField,
        ErrorCode::ValueOutOfRange,
        ErrorCode::OrderNotFound,
        ErrorCode::OrderEmpty,
        ErrorCode::OrderInvalidItem,
        ErrorCode::OrderStatusConflict,
        ErrorCode::OrderInvalidTransition,
        ErrorCode::OrderTerminal,
        ErrorCode::PackerNotFound,
        ErrorCode::PackerInactive,
        ErrorCode::PackerHasActiveAssignments,
        ErrorCode::AssignmentTokenInvalid,
        ErrorCode::AssignmentConflict,
        ErrorCode::ProductNotFound,
        ErrorCode::ProductBarcodeExists,
        ErrorCode::RawMaterialNotFound,
        ErrorCode::RawMaterialOverProcessed,
        ErrorCode::CustomerNotFound,
        ErrorCode::NegativeBalance,
        ErrorCode::CustomerHasOrders,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
        ErrorCode::NetworkError,
        ErrorCode::TimeoutError,
        ErrorCode::ConfigError,
    ];

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::OrderStatusConflict.code(), 4004);
        assert_eq!(ErrorCode::PackerNotFound.code(), 5001);
        assert_eq!(ErrorCode::AssignmentTokenInvalid.code(), 5004);
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::RawMaterialNotFound.code(), 6101);
        assert_eq!(ErrorCode::CustomerNotFound.code(), 7001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_covers_every_code() {
        for code in ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(*code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(1001), Err(InvalidErrorCode(1001)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::AssignmentTokenInvalid).unwrap();
        assert_eq!(json, "5004");

        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::OrderNotFound);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::OrderNotFound), "4001");
        assert_eq!(
            ErrorCode::AssignmentTokenInvalid.message(),
            "Invalid or expired token"
        );
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
    }
}
