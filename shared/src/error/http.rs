//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::PackerNotFound
            | Self::AssignmentTokenInvalid
            | Self::ProductNotFound
            | Self::RawMaterialNotFound
            | Self::CustomerNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::OrderStatusConflict
            | Self::OrderTerminal
            | Self::PackerHasActiveAssignments
            | Self::AssignmentConflict
            | Self::ProductBarcodeExists
            | Self::CustomerHasOrders => StatusCode::CONFLICT,

            // 503 Service Unavailable (transient, client can retry)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_codes() {
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::AssignmentTokenInvalid.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ErrorCode::PackerNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_codes() {
        assert_eq!(
            ErrorCode::OrderStatusConflict.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::OrderTerminal.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::PackerHasActiveAssignments.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_bad_request_codes() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::OrderInvalidTransition.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::PackerInactive.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NegativeBalance.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_system_codes() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::TimeoutError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
