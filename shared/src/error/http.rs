//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound
            | Self::ProductNotFound
            | Self::CollectionNotFound
            | Self::CartItemNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists | Self::ReorderInProgress => StatusCode::CONFLICT,

            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,

            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::CartEmpty
            | Self::ProductInvalidPrice
            | Self::ProductOutOfStock
            | Self::ImageInvalidType
            | Self::ImageLimitReached => StatusCode::BAD_REQUEST,

            Self::ImageTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::TimeoutError => StatusCode::GATEWAY_TIMEOUT,
            Self::NetworkError | Self::DatabaseError => StatusCode::BAD_GATEWAY,

            Self::Unknown
            | Self::ReorderSaveFailed
            | Self::InternalError
            | Self::ConfigError
            | Self::StorageError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify a status returned by the hosted backend
    pub fn from_http_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::AlreadyExists,
            StatusCode::UNAUTHORIZED => Self::NotAuthenticated,
            StatusCode::FORBIDDEN => Self::PermissionDenied,
            StatusCode::PAYLOAD_TOO_LARGE => Self::ImageTooLarge,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::TimeoutError,
            s if s.is_client_error() => Self::InvalidRequest,
            s if s.is_server_error() => Self::DatabaseError,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_status_classification() {
        assert_eq!(
            ErrorCode::from_http_status(StatusCode::UNAUTHORIZED),
            ErrorCode::NotAuthenticated
        );
        assert_eq!(
            ErrorCode::from_http_status(StatusCode::UNPROCESSABLE_ENTITY),
            ErrorCode::InvalidRequest
        );
        assert_eq!(
            ErrorCode::from_http_status(StatusCode::SERVICE_UNAVAILABLE),
            ErrorCode::DatabaseError
        );
        assert_eq!(ErrorCode::ImageTooLarge.http_status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
