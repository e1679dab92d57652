//! Error codes shared with the admin UI
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 9xxx: Store / system errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code enum
///
/// Represented as u16 values so the UI can map each refusal to its own
/// localized message instead of a generic "failed".
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

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Requested status is not reachable from the current status
    InvalidTransition = 4002,
    /// Order is already delivered or cancelled
    OrderAlreadyTerminal = 4003,
    /// The store did not apply the status change
    PersistFailure = 4004,
    /// Cancellation was requested without operator confirmation
    CancelNotConfirmed = 4005,

    // ==================== 6xxx: Catalog ====================
    /// Category is still referenced by menu items
    CategoryInUse = 6001,
    /// Menu item has no size entries
    EmptySizes = 6002,
    /// Category not found
    CategoryNotFound = 6003,

    // ==================== 9xxx: Store ====================
    /// Store could not be reached
    StoreUnavailable = 9001,
    /// Store refused the write
    StoreRejected = 9002,
    /// Live subscription or view worker has shut down
    SubscriptionClosed = 9003,
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
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",

            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidTransition => "Order cannot move to the requested status",
            ErrorCode::OrderAlreadyTerminal => "Order is already delivered or cancelled",
            ErrorCode::PersistFailure => "Status change could not be saved",
            ErrorCode::CancelNotConfirmed => "Cancellation must be confirmed first",

            ErrorCode::CategoryInUse => "Category is still used by menu items",
            ErrorCode::EmptySizes => "Menu item needs at least one size",
            ErrorCode::CategoryNotFound => "Category not found",

            ErrorCode::StoreUnavailable => "Store is unavailable",
            ErrorCode::StoreRejected => "Store rejected the request",
            ErrorCode::SubscriptionClosed => "Live order feed is closed",
        }
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
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),

            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::InvalidTransition),
            4003 => Ok(ErrorCode::OrderAlreadyTerminal),
            4004 => Ok(ErrorCode::PersistFailure),
            4005 => Ok(ErrorCode::CancelNotConfirmed),

            6001 => Ok(ErrorCode::CategoryInUse),
            6002 => Ok(ErrorCode::EmptySizes),
            6003 => Ok(ErrorCode::CategoryNotFound),

            9001 => Ok(ErrorCode::StoreUnavailable),
            9002 => Ok(ErrorCode::StoreRejected),
            9003 => Ok(ErrorCode::SubscriptionClosed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
