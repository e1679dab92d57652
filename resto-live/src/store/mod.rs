//! Document store contract
//!
//! The live view and the desks only talk to the store through these traits:
//!
//! - [`OrderStore`]: live query over `orders`, point read, status update
//! - [`CatalogStore`]: categories and menu items for the referential guard
//!
//! A live query first yields a [`StoreEvent::Snapshot`] of the complete
//! matching window, then incremental `Added` / `Modified` / `Removed` events.
//! No ordering between events of different documents is promised.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use resto_core::error::ErrorCode;
use resto_core::models::{Category, MenuItem, Order};
use resto_core::order::OrderStatus;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;

/// Live query filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderFilter {
    #[default]
    All,
    Status(OrderStatus),
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            OrderFilter::All => true,
            OrderFilter::Status(status) => order.status == *status,
        }
    }
}

impl fmt::Display for OrderFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderFilter::All => f.write_str("all"),
            OrderFilter::Status(status) => write!(f, "{}", status),
        }
    }
}

impl From<OrderStatus> for OrderFilter {
    fn from(status: OrderStatus) -> Self {
        OrderFilter::Status(status)
    }
}

/// Live query: filter, newest first, at most `limit` documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderQuery {
    pub filter: OrderFilter,
    pub limit: usize,
}

impl OrderQuery {
    pub fn new(filter: OrderFilter, limit: usize) -> Self {
        Self {
            filter,
            limit: limit.max(1),
        }
    }
}

/// Newest first; ties broken by id so the order is total
pub fn by_recency(a: &Order, b: &Order) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// One delivery of a live query
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// Complete matching window; always the first event of a subscription
    Snapshot(Vec<Order>),
    Added(Order),
    Modified(Order),
    Removed(String),
}

impl StoreEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreEvent::Snapshot(_) => "snapshot",
            StoreEvent::Added(_) => "added",
            StoreEvent::Modified(_) => "modified",
            StoreEvent::Removed(_) => "removed",
        }
    }

    /// Document id of an incremental event
    pub fn order_id(&self) -> Option<&str> {
        match self {
            StoreEvent::Snapshot(_) => None,
            StoreEvent::Added(order) | StoreEvent::Modified(order) => Some(&order.id),
            StoreEvent::Removed(id) => Some(id),
        }
    }
}

/// Receiving end of a live query
///
/// Dropping it ends the subscription on the store side.
#[derive(Debug)]
pub struct OrderSubscription {
    rx: mpsc::UnboundedReceiver<StoreEvent>,
}

impl OrderSubscription {
    pub fn new(rx: mpsc::UnboundedReceiver<StoreEvent>) -> Self {
        Self { rx }
    }

    /// Next event, `None` once the store closed the query
    pub async fn next(&mut self) -> Option<StoreEvent> {
        self.rx.recv().await
    }
}

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store rejected the write: {0}")]
    Rejected(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("{collection}/{id} not found")]
    NotFound {
        collection: &'static str,
        id: String,
    },

    #[error("Subscription closed")]
    Closed,
}

impl StoreError {
    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::Rejected(_) => ErrorCode::StoreRejected,
            StoreError::Unavailable(_) => ErrorCode::StoreUnavailable,
            StoreError::NotFound { collection, .. } if *collection == CATEGORIES => {
                ErrorCode::CategoryNotFound
            }
            StoreError::NotFound { .. } => ErrorCode::OrderNotFound,
            StoreError::Closed => ErrorCode::SubscriptionClosed,
        }
    }
}

pub const ORDERS: &str = "orders";
pub const CATEGORIES: &str = "categories";
pub const MENU_ITEMS: &str = "menuItems";

/// `orders` collection
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Open a live query
    async fn subscribe(&self, query: OrderQuery) -> Result<OrderSubscription, StoreError>;

    async fn get_order(&self, id: &str) -> Result<Order, StoreError>;

    /// Point update of the `status` field
    async fn update_status(&self, id: &str, status: OrderStatus) -> Result<(), StoreError>;
}

/// `categories` and `menuItems` collections
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Full current menu item collection
    async fn menu_items(&self) -> Result<Vec<MenuItem>, StoreError>;

    async fn delete_category(&self, id: &str) -> Result<(), StoreError>;

    /// Insert or replace by id
    async fn save_category(&self, category: &Category) -> Result<(), StoreError>;
}
