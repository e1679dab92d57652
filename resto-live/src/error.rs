//! Errors surfaced to the admin UI
//!
//! Each variant maps to its own [`ErrorCode`]; a failed transition and a
//! failed persist are never reported the same way.

use crate::store::StoreError;
use resto_core::error::{CatalogError, ErrorCode, LifecycleError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LiveError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The transition was valid but the store did not apply it
    #[error("Failed to save status of order {order_id}: {source}")]
    PersistFailure {
        order_id: String,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Cancelling order {order_id} requires operator confirmation")]
    NotConfirmed { order_id: String },

    #[error("Live order view is shut down")]
    Closed,
}

impl LiveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LiveError::Lifecycle(e) => e.code(),
            LiveError::Catalog(e) => e.code(),
            LiveError::PersistFailure { .. } => ErrorCode::PersistFailure,
            LiveError::Store(e) => e.code(),
            LiveError::NotConfirmed { .. } => ErrorCode::CancelNotConfirmed,
            LiveError::Closed => ErrorCode::SubscriptionClosed,
        }
    }
}

pub type LiveResult<T> = Result<T, LiveError>;

#[cfg(test)]
mod tests {
    use super::*;
    use resto_core::order::OrderStatus;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            LiveError::from(LifecycleError::InvalidTransition {
                from: OrderStatus::Preparing,
                to: OrderStatus::Pending,
            }),
            LiveError::from(LifecycleError::AlreadyTerminal {
                status: OrderStatus::Delivered,
            }),
            LiveError::from(CatalogError::CategoryInUse {
                category: "Desserts".into(),
                count: 1,
            }),
            LiveError::PersistFailure {
                order_id: "o1".into(),
                source: StoreError::Unavailable("offline".into()),
            },
            LiveError::NotConfirmed {
                order_id: "o1".into(),
            },
            LiveError::Closed,
        ];

        let mut codes: Vec<u16> = errors.iter().map(|e| e.code().code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_messages() {
        let err = LiveError::from(LifecycleError::InvalidTransition {
            from: OrderStatus::Preparing,
            to: OrderStatus::Pending,
        });
        assert_eq!(err.to_string(), "Cannot move order from preparing to pending");

        let err = LiveError::PersistFailure {
            order_id: "o1".into(),
            source: StoreError::Rejected("permission denied".into()),
        };
        assert_eq!(
            err.to_string(),
            "Failed to save status of order o1: Store rejected the write: permission denied"
        );
    }
}
