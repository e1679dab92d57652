//! Order status transitions
//!
//! Pure functions over [`Order`] values. Persisting a successful transition
//! is the caller's job; nothing here retries or performs I/O.
//!
//! # Transition graph
//!
//! ```text
//! pending ──▶ preparing ──▶ ready ──▶ delivered
//!    │            │           │
//!    └────────────┴───────────┴──────▶ cancelled
//! ```
//!
//! Forward moves may skip ahead along the progression; there is no way back
//! and nothing leaves `delivered` or `cancelled`.

use super::status::{OrderStatus, PROGRESSION};
use crate::error::LifecycleError;
use crate::models::Order;
use std::collections::BTreeMap;

/// Every status strictly after `current` in the progression
///
/// Empty for `delivered` and for `cancelled` (which is not part of the
/// progression).
pub fn next_statuses(current: OrderStatus) -> &'static [OrderStatus] {
    match current.progression_index() {
        Some(index) => &PROGRESSION[index + 1..],
        None => &[],
    }
}

/// Whether `advance` from `from` to `to` would succeed
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    if from.is_terminal() {
        return false;
    }
    to == OrderStatus::Cancelled || next_statuses(from).contains(&to)
}

/// Move `order` to `target`
///
/// Succeeds iff `target` is in [`next_statuses`] or is `cancelled` while the
/// order is still active. Only `status` changes on the returned copy.
/// Repeating a call that already succeeded fails, which is the "already
/// advanced" signal.
pub fn advance(order: &Order, target: OrderStatus) -> Result<Order, LifecycleError> {
    if target == OrderStatus::Cancelled {
        return cancel(order);
    }

    if !next_statuses(order.status).contains(&target) {
        return Err(LifecycleError::InvalidTransition {
            from: order.status,
            to: target,
        });
    }

    Ok(with_status(order, target))
}

/// Move `order` to the first status after its current one
pub fn advance_to_next(order: &Order) -> Result<Order, LifecycleError> {
    match next_statuses(order.status).first() {
        Some(&next) => Ok(with_status(order, next)),
        None => Err(LifecycleError::AlreadyTerminal {
            status: order.status,
        }),
    }
}

/// Cancel an active order
///
/// Callers must have the operator confirm before calling this.
pub fn cancel(order: &Order) -> Result<Order, LifecycleError> {
    if order.status.is_terminal() {
        return Err(LifecycleError::AlreadyTerminal {
            status: order.status,
        });
    }
    Ok(with_status(order, OrderStatus::Cancelled))
}

fn with_status(order: &Order, status: OrderStatus) -> Order {
    Order {
        status,
        ..order.clone()
    }
}

/// Orders partitioned by exact status
///
/// Each bucket keeps the relative order of the input (callers pass orders
/// already sorted by recency).
#[derive(Debug, Clone, Default)]
pub struct Classified<'a> {
    pub by_status: BTreeMap<OrderStatus, Vec<&'a Order>>,
}

impl<'a> Classified<'a> {
    pub fn get(&self, status: OrderStatus) -> &[&'a Order] {
        self.by_status.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, status: OrderStatus) -> usize {
        self.get(status).len()
    }
}

pub fn classify<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Classified<'a> {
    let mut classified = Classified::default();
    for order in orders {
        classified
            .by_status
            .entry(order.status)
            .or_default()
            .push(order);
    }
    classified
}

/// Capitalize the first letter of a status identifier
pub fn display_label(identifier: &str) -> String {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
