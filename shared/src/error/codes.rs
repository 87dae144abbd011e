//! Unified error codes for the vend.ai platform
//!
//! This module defines all error codes used across the server and frontend.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Store errors
//! - 4xxx: Order errors
//! - 5xxx: Storefront session errors
//! - 6xxx: Product errors
//! - 7xxx: Assistant errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
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
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,
    /// Email already registered
    EmailAlreadyRegistered = 1006,
    /// Password too short
    PasswordTooShort = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Resource belongs to another store
    StoreMismatch = 2002,

    // ==================== 3xxx: Store ====================
    /// Store not found
    StoreNotFound = 3001,
    /// Store slug already exists
    SlugAlreadyExists = 3002,
    /// Store slug has invalid format
    SlugInvalid = 3003,
    /// Feature not available in current plan
    PlanFeatureNotAvailable = 3004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order is empty (checkout with empty cart)
    OrderEmpty = 4002,
    /// Order creation failed
    OrderCreateFailed = 4003,
    /// Unknown order status value
    OrderStatusInvalid = 4004,

    // ==================== 5xxx: Storefront session ====================
    /// Storefront session not found (expired or never opened)
    SessionNotFound = 5001,
    /// Cart index out of range
    CartIndexOutOfRange = 5002,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Product is out of stock
    ProductOutOfStock = 6003,
    /// Variant not found on product
    VariantNotFound = 6004,
    /// Requested size has no stock for the selected variant
    SizeUnavailable = 6005,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid/corrupted image file
    InvalidImageFile = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Image processing failed
    ImageProcessingFailed = 6505,
    /// File storage failed
    FileStorageFailed = 6506,

    // ==================== 7xxx: Assistant ====================
    /// Assistant backend is not configured (missing API key)
    AssistantNotConfigured = 7001,
    /// Assistant request failed (transport or non-success status)
    AssistantRequestFailed = 7002,
    /// Assistant reply could not be parsed
    AssistantInvalidReply = 7003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
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

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::StoreMismatch => "Resource belongs to another store",

            // Store
            ErrorCode::StoreNotFound => "Store not found",
            ErrorCode::SlugAlreadyExists => "Store slug already exists",
            ErrorCode::SlugInvalid => "Store slug has invalid format",
            ErrorCode::PlanFeatureNotAvailable => "Feature not available in current plan",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderCreateFailed => "Order creation failed",
            ErrorCode::OrderStatusInvalid => "Unknown order status",

            // Storefront session
            ErrorCode::SessionNotFound => "Storefront session not found",
            ErrorCode::CartIndexOutOfRange => "Cart index out of range",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::VariantNotFound => "Variant not found on product",
            ErrorCode::SizeUnavailable => "Size has no stock for the selected variant",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",

            // Assistant
            ErrorCode::AssistantNotConfigured => "Assistant backend is not configured",
            ErrorCode::AssistantRequestFailed => "Assistant request failed",
            ErrorCode::AssistantInvalidReply => "Assistant reply could not be parsed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            ErrorCode::Success => StatusCode::OK,

            ErrorCode::NotAuthenticated
            | ErrorCode::TokenExpired
            | ErrorCode::TokenInvalid => StatusCode::UNAUTHORIZED,

            ErrorCode::InvalidCredentials => StatusCode::BAD_REQUEST,

            ErrorCode::PermissionDenied
            | ErrorCode::StoreMismatch
            | ErrorCode::AccountDisabled
            | ErrorCode::PlanFeatureNotAvailable => StatusCode::FORBIDDEN,

            ErrorCode::NotFound
            | ErrorCode::StoreNotFound
            | ErrorCode::OrderNotFound
            | ErrorCode::SessionNotFound
            | ErrorCode::ProductNotFound
            | ErrorCode::VariantNotFound => StatusCode::NOT_FOUND,

            ErrorCode::AlreadyExists
            | ErrorCode::EmailAlreadyRegistered
            | ErrorCode::SlugAlreadyExists => StatusCode::CONFLICT,

            ErrorCode::ProductOutOfStock
            | ErrorCode::SizeUnavailable
            | ErrorCode::OrderEmpty => StatusCode::UNPROCESSABLE_ENTITY,

            ErrorCode::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            ErrorCode::Unknown
            | ErrorCode::OrderCreateFailed
            | ErrorCode::ImageProcessingFailed
            | ErrorCode::FileStorageFailed
            | ErrorCode::AssistantNotConfigured
            | ErrorCode::InternalError
            | ErrorCode::DatabaseError
            | ErrorCode::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            ErrorCode::AssistantRequestFailed
            | ErrorCode::AssistantInvalidReply
            | ErrorCode::NetworkError => StatusCode::BAD_GATEWAY,

            ErrorCode::TimeoutError => StatusCode::GATEWAY_TIMEOUT,

            ErrorCode::ValidationFailed
            | ErrorCode::InvalidRequest
            | ErrorCode::InvalidFormat
            | ErrorCode::RequiredField
            | ErrorCode::ValueOutOfRange
            | ErrorCode::PasswordTooShort
            | ErrorCode::SlugInvalid
            | ErrorCode::OrderStatusInvalid
            | ErrorCode::CartIndexOutOfRange
            | ErrorCode::ProductInvalidPrice
            | ErrorCode::UnsupportedFileFormat
            | ErrorCode::InvalidImageFile
            | ErrorCode::NoFileProvided => StatusCode::BAD_REQUEST,
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
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,
            7 => ErrorCode::RequiredField,
            8 => ErrorCode::ValueOutOfRange,

            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,
            1005 => ErrorCode::AccountDisabled,
            1006 => ErrorCode::EmailAlreadyRegistered,
            1007 => ErrorCode::PasswordTooShort,

            2001 => ErrorCode::PermissionDenied,
            2002 => ErrorCode::StoreMismatch,

            3001 => ErrorCode::StoreNotFound,
            3002 => ErrorCode::SlugAlreadyExists,
            3003 => ErrorCode::SlugInvalid,
            3004 => ErrorCode::PlanFeatureNotAvailable,

            4001 => ErrorCode::OrderNotFound,
            4002 => ErrorCode::OrderEmpty,
            4003 => ErrorCode::OrderCreateFailed,
            4004 => ErrorCode::OrderStatusInvalid,

            5001 => ErrorCode::SessionNotFound,
            5002 => ErrorCode::CartIndexOutOfRange,

            6001 => ErrorCode::ProductNotFound,
            6002 => ErrorCode::ProductInvalidPrice,
            6003 => ErrorCode::ProductOutOfStock,
            6004 => ErrorCode::VariantNotFound,
            6005 => ErrorCode::SizeUnavailable,

            6501 => ErrorCode::FileTooLarge,
            6502 => ErrorCode::UnsupportedFileFormat,
            6503 => ErrorCode::InvalidImageFile,
            6504 => ErrorCode::NoFileProvided,
            6505 => ErrorCode::ImageProcessingFailed,
            6506 => ErrorCode::FileStorageFailed,

            7001 => ErrorCode::AssistantNotConfigured,
            7002 => ErrorCode::AssistantRequestFailed,
            7003 => ErrorCode::AssistantInvalidReply,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9003 => ErrorCode::NetworkError,
            9004 => ErrorCode::TimeoutError,
            9005 => ErrorCode::ConfigError,

            _ => return Err(InvalidErrorCode(value)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::StoreNotFound.code(), 3001);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::SessionNotFound.code(), 5001);
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::AssistantNotConfigured.code(), 7001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::DatabaseError.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0).unwrap(), ErrorCode::Success);
        assert_eq!(
            ErrorCode::try_from(1002).unwrap(),
            ErrorCode::InvalidCredentials
        );
        assert_eq!(
            ErrorCode::try_from(5002).unwrap(),
            ErrorCode::CartIndexOutOfRange
        );
        assert_eq!(
            ErrorCode::try_from(7002).unwrap(),
            ErrorCode::AssistantRequestFailed
        );
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(12345), Err(InvalidErrorCode(12345)));
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::SessionNotFound).unwrap();
        assert_eq!(json, "5001");
    }

    #[test]
    fn test_deserialize_roundtrip() {
        let code: ErrorCode = serde_json::from_str("6003").unwrap();
        assert_eq!(code, ErrorCode::ProductOutOfStock);

        assert!(serde_json::from_str::<ErrorCode>("4242").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "E0000");
        assert_eq!(format!("{}", ErrorCode::NotAuthenticated), "E1001");
        assert_eq!(format!("{}", ErrorCode::DatabaseError), "E9002");
    }

    #[test]
    fn test_http_status() {
        use http::StatusCode;
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::TokenExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::SlugAlreadyExists.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::ProductOutOfStock.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::AssistantRequestFailed.http_status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
