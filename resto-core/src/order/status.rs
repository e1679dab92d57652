//! Order status vocabulary
//!
//! One closed enumeration for every surface. The demo dashboard historically
//! labelled the entry state `new`; that label is accepted on input and
//! normalized to [`ENTRY_STATUS`], it is never written back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Order status
///
/// Declaration order is the canonical progression followed by the
/// `cancelled` side state, so `Ord` sorts statuses the way boards show them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[serde(alias = "new")]
    Pending,
    Preparing,
    Ready,
    /// For takeaway this means "picked up"; the stored value is the same
    Delivered,
    Cancelled,
}

/// Status every order is created with
pub const ENTRY_STATUS: OrderStatus = OrderStatus::Pending;

/// Legacy label of the entry state used by the demo dashboard
pub const LEGACY_ENTRY_LABEL: &str = "new";

/// Canonical forward progression of an order
pub static PROGRESSION: [OrderStatus; 4] = [
    OrderStatus::Pending,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::Delivered,
];

/// Every status, in board order
pub const ALL_STATUSES: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
];

impl OrderStatus {
    /// Stored identifier
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Position in [`PROGRESSION`], `None` for `cancelled`
    pub fn progression_index(&self) -> Option<usize> {
        PROGRESSION.iter().position(|s| s == self)
    }

    /// No outgoing transitions
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Still being worked on (not delivered, not cancelled)
    pub const fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Display label ("Pending", "Preparing", ...)
    pub fn label(&self) -> String {
        super::display_label(self.as_str())
    }

    /// Badge color shared by the order list, the detail view and the kitchen board
    pub const fn color(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "#f59e0b",
            OrderStatus::Preparing => "#3b82f6",
            OrderStatus::Ready => "#10b981",
            OrderStatus::Delivered => "#6b7280",
            OrderStatus::Cancelled => "#ef4444",
        }
    }

    /// Icon name shared by every status badge
    pub const fn icon(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "clock",
            OrderStatus::Preparing => "chef-hat",
            OrderStatus::Ready => "bell",
            OrderStatus::Delivered => "check-circle",
            OrderStatus::Cancelled => "x-circle",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        ENTRY_STATUS
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown order status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized == LEGACY_ENTRY_LABEL {
            return Ok(ENTRY_STATUS);
        }
        ALL_STATUSES
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}
