//! Derived order views
//!
//! Relative time labels, the kitchen board and the order desk summary. All of
//! them are computed from `status` + `created_at` alone, so every surface
//! agrees on what it shows.

use super::lifecycle::next_statuses;
use super::status::{ALL_STATUSES, OrderStatus};
use crate::models::Order;
use crate::util::MINUTE_MS;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Columns of the kitchen board, left to right
pub const KITCHEN_COLUMNS: [OrderStatus; 3] = [
    OrderStatus::Pending,
    OrderStatus::Preparing,
    OrderStatus::Ready,
];

/// Whole minutes since `created_at` (clock skew never yields a negative value)
pub fn elapsed_minutes(created_at: i64, now: i64) -> i64 {
    (now - created_at).max(0) / MINUTE_MS
}

/// Short relative label: "just now", "5m ago", "2h ago", "3d ago"
pub fn time_ago(created_at: i64, now: i64) -> String {
    let minutes = elapsed_minutes(created_at, now);
    match minutes {
        0 => "just now".to_string(),
        1..=59 => format!("{}m ago", minutes),
        60..=1439 => format!("{}h ago", minutes / 60),
        _ => format!("{}d ago", minutes / 1440),
    }
}

/// One order on the kitchen board
#[derive(Debug, Clone)]
pub struct KitchenTicket<'a> {
    pub order: &'a Order,
    pub elapsed_minutes: i64,
    pub time_ago: String,
    /// Waiting longer than the configured threshold
    pub late: bool,
    /// What the one-click bump moves the order to
    pub next_status: Option<OrderStatus>,
}

#[derive(Debug, Clone)]
pub struct KitchenColumn<'a> {
    pub status: OrderStatus,
    pub tickets: Vec<KitchenTicket<'a>>,
}

#[derive(Debug, Clone)]
pub struct KitchenBoard<'a> {
    pub columns: Vec<KitchenColumn<'a>>,
}

impl<'a> KitchenBoard<'a> {
    pub fn column(&self, status: OrderStatus) -> Option<&KitchenColumn<'a>> {
        self.columns.iter().find(|c| c.status == status)
    }

    pub fn ticket_count(&self) -> usize {
        self.columns.iter().map(|c| c.tickets.len()).sum()
    }

    pub fn late_count(&self) -> usize {
        self.columns
            .iter()
            .flat_map(|c| &c.tickets)
            .filter(|t| t.late)
            .count()
    }
}

/// Build the kitchen board
///
/// Within a column high priority comes first, then the oldest order (the
/// one the kitchen should be working on). Delivered and cancelled orders
/// are not shown.
pub fn kitchen_board<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    now: i64,
    late_after_minutes: i64,
) -> KitchenBoard<'a> {
    let mut columns: Vec<KitchenColumn<'a>> = KITCHEN_COLUMNS
        .into_iter()
        .map(|status| KitchenColumn {
            status,
            tickets: Vec::new(),
        })
        .collect();

    for order in orders {
        let Some(column) = columns.iter_mut().find(|c| c.status == order.status) else {
            continue;
        };
        let elapsed = elapsed_minutes(order.created_at, now);
        column.tickets.push(KitchenTicket {
            order,
            elapsed_minutes: elapsed,
            time_ago: time_ago(order.created_at, now),
            late: elapsed >= late_after_minutes,
            next_status: next_statuses(order.status).first().copied(),
        });
    }

    for column in &mut columns {
        column.tickets.sort_by_key(|t| {
            (
                Reverse(t.order.priority),
                t.order.created_at,
                t.order.order_number,
            )
        });
    }

    KitchenBoard { columns }
}

/// Order desk header numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    /// Every status is present, zero when empty
    pub counts: BTreeMap<OrderStatus, usize>,
    pub total_orders: usize,
    /// Sum of `total` over delivered orders
    pub delivered_revenue: Decimal,
}

impl OrderSummary {
    pub fn count(&self, status: OrderStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Orders still in the kitchen or waiting for pickup/delivery
    pub fn active_count(&self) -> usize {
        self.counts
            .iter()
            .filter(|(status, _)| status.is_active())
            .map(|(_, count)| count)
            .sum()
    }
}

pub fn summarize<'a>(orders: impl IntoIterator<Item = &'a Order>) -> OrderSummary {
    let mut counts: BTreeMap<OrderStatus, usize> =
        ALL_STATUSES.into_iter().map(|s| (s, 0)).collect();
    let mut total_orders = 0;
    let mut delivered_revenue = Decimal::ZERO;

    for order in orders {
        total_orders += 1;
        *counts.entry(order.status).or_default() += 1;
        if order.status == OrderStatus::Delivered {
            delivered_revenue += order.total;
        }
    }

    OrderSummary {
        counts,
        total_orders,
        delivered_revenue,
    }
}
