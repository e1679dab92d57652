//! Error values for the order lifecycle and the catalog guard
//!
//! Every refusal is a value with its own [`ErrorCode`], so the operator can
//! tell *why* a status change or deletion was refused. None of these errors
//! is fatal; the UI surfaces them and leaves the data untouched.

mod codes;

pub use codes::{ErrorCode, InvalidErrorCode};

use crate::order::OrderStatus;
use serde::Serialize;
use thiserror::Error;

/// Order lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleError {
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order is already {status}")]
    AlreadyTerminal { status: OrderStatus },
}

impl LifecycleError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LifecycleError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            LifecycleError::AlreadyTerminal { .. } => ErrorCode::OrderAlreadyTerminal,
        }
    }
}

/// Rejected order payloads
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderError {
    #[error("Order has no items")]
    EmptyItems,

    #[error("Item '{item}' needs a quantity of at least 1")]
    ZeroQuantity { item: String },
}

impl OrderError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::ValidationFailed
    }
}

/// Catalog errors
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogError {
    /// `count` is surfaced so the operator knows how many items to reassign
    #[error("Category '{category}' is used by {count} menu item(s)")]
    CategoryInUse { category: String, count: usize },

    #[error("Menu item '{item}' has no sizes")]
    EmptySizes { item: String },
}

impl CatalogError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::CategoryInUse { .. } => ErrorCode::CategoryInUse,
            CatalogError::EmptySizes { .. } => ErrorCode::EmptySizes,
        }
    }
}
