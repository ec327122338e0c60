//! Unified error codes for the storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Cart errors
//! - 6xxx: Catalog errors (products, collections, ordering, images)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize as plain
/// numbers for the admin frontend.
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

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated against the backend
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Backend refused the operation for this key
    PermissionDenied = 2001,

    // ==================== 4xxx: Cart ====================
    /// Checkout attempted with no items
    CartEmpty = 4001,
    /// Cart line does not exist
    CartItemNotFound = 4002,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product price is not a positive amount
    ProductInvalidPrice = 6002,
    /// Product has no stock left
    ProductOutOfStock = 6003,
    /// Collection not found
    CollectionNotFound = 6101,
    /// One or more display order writes were rejected
    ReorderSaveFailed = 6201,
    /// A display order save is already in flight
    ReorderInProgress = 6202,
    /// Image exceeds the upload size limit
    ImageTooLarge = 6301,
    /// File is not an image
    ImageInvalidType = 6302,
    /// Entity already has the maximum number of images
    ImageLimitReached = 6303,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Hosted backend reported an error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Request timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Object storage error
    StorageError = 9401,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is the success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",

            ErrorCode::NotAuthenticated => "Not authenticated",
            ErrorCode::PermissionDenied => "Permission denied",

            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::CartItemNotFound => "Cart item not found",

            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product price must be positive",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::CollectionNotFound => "Collection not found",
            ErrorCode::ReorderSaveFailed => "Failed to save display order",
            ErrorCode::ReorderInProgress => "Display order save already in progress",
            ErrorCode::ImageTooLarge => "Image exceeds size limit",
            ErrorCode::ImageInvalidType => "File is not a valid image",
            ErrorCode::ImageLimitReached => "Image limit reached",

            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Backend error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Request timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageError => "Storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an unknown u16 to [`ErrorCode`]
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
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            1001 => Ok(ErrorCode::NotAuthenticated),
            2001 => Ok(ErrorCode::PermissionDenied),

            4001 => Ok(ErrorCode::CartEmpty),
            4002 => Ok(ErrorCode::CartItemNotFound),

            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductOutOfStock),
            6101 => Ok(ErrorCode::CollectionNotFound),
            6201 => Ok(ErrorCode::ReorderSaveFailed),
            6202 => Ok(ErrorCode::ReorderInProgress),
            6301 => Ok(ErrorCode::ImageTooLarge),
            6302 => Ok(ErrorCode::ImageInvalidType),
            6303 => Ok(ErrorCode::ImageLimitReached),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9401 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
