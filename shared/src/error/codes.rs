//! Unified error codes for the Pricebook backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalog errors
//! - 4xxx: Customer and order errors
//! - 5xxx: Import errors
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
    /// Required field missing
    RequiredField = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired or been revoked
    SessionExpired = 1005,
    /// Account is disabled
    AccountDisabled = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Cannot delete own account
    CannotDeleteSelf = 2003,
    /// Cannot delete the last admin account
    CannotDeleteLastAdmin = 2004,

    // ==================== 3xxx: Catalog ====================
    /// Brand not found
    BrandNotFound = 3001,
    /// Brand name already exists
    BrandNameExists = 3002,
    /// Brand is referenced by models or products
    BrandInUse = 3003,
    /// Model not found
    ModelNotFound = 3101,
    /// Model name already exists for this brand
    ModelNameExists = 3102,
    /// Model is referenced by products
    ModelInUse = 3103,
    /// Category not found
    CategoryNotFound = 3201,
    /// Category name already exists
    CategoryNameExists = 3202,
    /// Category is referenced by products
    CategoryInUse = 3203,
    /// Product not found
    ProductNotFound = 3301,
    /// Product part code already exists
    ProductPartCodeExists = 3302,
    /// Product price is invalid
    ProductInvalidPrice = 3303,

    // ==================== 4xxx: Customer / Order ====================
    /// Customer not found
    CustomerNotFound = 4001,
    /// Customer email already exists
    CustomerEmailExists = 4002,
    /// Customer has orders and cannot be deleted
    CustomerHasOrders = 4003,
    /// Order not found
    OrderNotFound = 4101,
    /// Order must contain at least one item
    OrderEmpty = 4102,
    /// Order requires a customer
    OrderCustomerRequired = 4103,
    /// Order status value is invalid
    OrderInvalidStatus = 4104,
    /// User not found
    UserNotFound = 4201,
    /// User email already exists
    UserEmailExists = 4202,

    // ==================== 5xxx: Import ====================
    /// Import file is missing required columns
    ImportMissingColumns = 5001,
    /// Import file is empty
    ImportEmptyFile = 5002,
    /// Import file could not be parsed
    ImportInvalidFile = 5003,
    /// No rows left to submit after validation and duplicate filtering
    ImportNothingToSubmit = 5004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            ErrorCode::Success => StatusCode::OK,

            ErrorCode::ValidationFailed
            | ErrorCode::InvalidRequest
            | ErrorCode::RequiredField
            | ErrorCode::ValueOutOfRange
            | ErrorCode::InvalidCredentials
            | ErrorCode::OrderEmpty
            | ErrorCode::OrderCustomerRequired
            | ErrorCode::OrderInvalidStatus
            | ErrorCode::ProductInvalidPrice
            | ErrorCode::ImportMissingColumns
            | ErrorCode::ImportEmptyFile
            | ErrorCode::ImportInvalidFile
            | ErrorCode::ImportNothingToSubmit => StatusCode::BAD_REQUEST,

            ErrorCode::NotAuthenticated
            | ErrorCode::TokenExpired
            | ErrorCode::TokenInvalid
            | ErrorCode::SessionExpired => StatusCode::UNAUTHORIZED,

            ErrorCode::PermissionDenied
            | ErrorCode::AdminRequired
            | ErrorCode::AccountDisabled
            | ErrorCode::CannotDeleteSelf
            | ErrorCode::CannotDeleteLastAdmin => StatusCode::FORBIDDEN,

            ErrorCode::NotFound
            | ErrorCode::BrandNotFound
            | ErrorCode::ModelNotFound
            | ErrorCode::CategoryNotFound
            | ErrorCode::ProductNotFound
            | ErrorCode::CustomerNotFound
            | ErrorCode::OrderNotFound
            | ErrorCode::UserNotFound => StatusCode::NOT_FOUND,

            ErrorCode::AlreadyExists
            | ErrorCode::BrandNameExists
            | ErrorCode::BrandInUse
            | ErrorCode::ModelNameExists
            | ErrorCode::ModelInUse
            | ErrorCode::CategoryNameExists
            | ErrorCode::CategoryInUse
            | ErrorCode::ProductPartCodeExists
            | ErrorCode::CustomerEmailExists
            | ErrorCode::CustomerHasOrders
            | ErrorCode::UserEmailExists => StatusCode::CONFLICT,

            ErrorCode::Unknown
            | ErrorCode::InternalError
            | ErrorCode::DatabaseError
            | ErrorCode::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::AccountDisabled => "Account has been disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin role required",
            ErrorCode::CannotDeleteSelf => "Cannot delete own account",
            ErrorCode::CannotDeleteLastAdmin => "Cannot delete the last admin account",

            // Catalog
            ErrorCode::BrandNotFound => "Brand not found",
            ErrorCode::BrandNameExists => "Brand name already exists",
            ErrorCode::BrandInUse => "Brand is in use by models or products",
            ErrorCode::ModelNotFound => "Model not found",
            ErrorCode::ModelNameExists => "Model name already exists for this brand",
            ErrorCode::ModelInUse => "Model is in use by products",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::CategoryInUse => "Category is in use by products",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductPartCodeExists => "Product part code already exists",
            ErrorCode::ProductInvalidPrice => "Product price is invalid",

            // Customer / Order
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CustomerEmailExists => "A customer with this email already exists",
            ErrorCode::CustomerHasOrders => "Customer has orders and cannot be deleted",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::OrderCustomerRequired => "Customer is required",
            ErrorCode::OrderInvalidStatus => "Invalid order status",
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UserEmailExists => "A user with this email already exists",

            // Import
            ErrorCode::ImportMissingColumns => "Missing required columns",
            ErrorCode::ImportEmptyFile => "Import file is empty",
            ErrorCode::ImportInvalidFile => "Import file could not be parsed",
            ErrorCode::ImportNothingToSubmit => "No products to import",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
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
            6 => Ok(ErrorCode::RequiredField),
            7 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1006 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),
            2003 => Ok(ErrorCode::CannotDeleteSelf),
            2004 => Ok(ErrorCode::CannotDeleteLastAdmin),

            // Catalog
            3001 => Ok(ErrorCode::BrandNotFound),
            3002 => Ok(ErrorCode::BrandNameExists),
            3003 => Ok(ErrorCode::BrandInUse),
            3101 => Ok(ErrorCode::ModelNotFound),
            3102 => Ok(ErrorCode::ModelNameExists),
            3103 => Ok(ErrorCode::ModelInUse),
            3201 => Ok(ErrorCode::CategoryNotFound),
            3202 => Ok(ErrorCode::CategoryNameExists),
            3203 => Ok(ErrorCode::CategoryInUse),
            3301 => Ok(ErrorCode::ProductNotFound),
            3302 => Ok(ErrorCode::ProductPartCodeExists),
            3303 => Ok(ErrorCode::ProductInvalidPrice),

            // Customer / Order
            4001 => Ok(ErrorCode::CustomerNotFound),
            4002 => Ok(ErrorCode::CustomerEmailExists),
            4003 => Ok(ErrorCode::CustomerHasOrders),
            4101 => Ok(ErrorCode::OrderNotFound),
            4102 => Ok(ErrorCode::OrderEmpty),
            4103 => Ok(ErrorCode::OrderCustomerRequired),
            4104 => Ok(ErrorCode::OrderInvalidStatus),
            4201 => Ok(ErrorCode::UserNotFound),
            4202 => Ok(ErrorCode::UserEmailExists),

            // Import
            5001 => Ok(ErrorCode::ImportMissingColumns),
            5002 => Ok(ErrorCode::ImportEmptyFile),
            5003 => Ok(ErrorCode::ImportInvalidFile),
            5004 => Ok(ErrorCode::ImportNothingToSubmit),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            other => Err(InvalidErrorCode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::AdminRequired,
            ErrorCode::BrandNameExists,
            ErrorCode::OrderEmpty,
            ErrorCode::ImportMissingColumns,
            ErrorCode::DatabaseError,
        ];
        for code in codes {
            let n: u16 = code.into();
            assert_eq!(ErrorCode::try_from(n), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(12345), Err(InvalidErrorCode(12345)));
    }

    #[test]
    fn test_http_status_mapping() {
        use http::StatusCode;
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::CustomerEmailExists.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::ImportMissingColumns.http_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
