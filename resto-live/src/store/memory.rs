//! In-memory document store
//!
//! Reference implementation of [`OrderStore`] and [`CatalogStore`]. Every
//! live query keeps the window it last delivered; after each write the window
//! is recomputed and only the difference is sent, removals first.

use super::{
    CATEGORIES, CatalogStore, ORDERS, OrderQuery, OrderStore, OrderSubscription, StoreError,
    StoreEvent, by_recency,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use resto_core::error::OrderError;
use resto_core::models::{Category, MenuItem, Order, OrderCreate};
use resto_core::order::OrderStatus;
use resto_core::util::now_millis;
use std::collections::HashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

struct Watcher {
    query: OrderQuery,
    window: Vec<Order>,
    tx: mpsc::UnboundedSender<StoreEvent>,
}

impl Watcher {
    /// Send the diff between the delivered window and `next`
    ///
    /// Returns `false` once the subscriber has gone away.
    fn publish(&mut self, next: Vec<Order>) -> bool {
        let mut events = Vec::new();

        for old in &self.window {
            if !next.iter().any(|o| o.id == old.id) {
                events.push(StoreEvent::Removed(old.id.clone()));
            }
        }
        for order in &next {
            match self.window.iter().find(|o| o.id == order.id) {
                None => events.push(StoreEvent::Added(order.clone())),
                Some(old) if old != order => events.push(StoreEvent::Modified(order.clone())),
                Some(_) => {}
            }
        }

        self.window = next;
        events.into_iter().all(|event| self.tx.send(event).is_ok())
    }
}

#[derive(Default)]
struct Inner {
    orders: HashMap<String, Order>,
    last_number: u32,
    categories: Vec<Category>,
    menu_items: Vec<MenuItem>,
    watchers: Vec<Watcher>,
    failing_writes: usize,
}

impl Inner {
    fn window(&self, query: &OrderQuery) -> Vec<Order> {
        let mut matching: Vec<Order> = self
            .orders
            .values()
            .filter(|o| query.filter.matches(o))
            .cloned()
            .collect();
        matching.sort_by(by_recency);
        matching.truncate(query.limit);
        matching
    }

    fn notify(&mut self) {
        let mut watchers = std::mem::take(&mut self.watchers);
        watchers.retain_mut(|w| {
            let next = self.window(&w.query);
            w.publish(next)
        });
        self.watchers = watchers;
    }

    /// Consume one injected failure, if any
    fn check_write(&mut self, op: &str) -> Result<(), StoreError> {
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            tracing::debug!(op, remaining = self.failing_writes, "Injected write failure");
            return Err(StoreError::Rejected(format!("{} failed", op)));
        }
        Ok(())
    }
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new order (the customer ordering flow)
    ///
    /// Assigns an id, the next order number and the current time. Invalid
    /// payloads are refused before anything is stored.
    pub fn insert_order(&self, payload: OrderCreate) -> Result<Order, OrderError> {
        payload.validate()?;
        let mut inner = self.inner.lock();
        inner.last_number += 1;
        let order = Order::from_create(
            Uuid::new_v4().to_string(),
            inner.last_number,
            payload,
            now_millis(),
        );
        inner.orders.insert(order.id.clone(), order.clone());
        inner.notify();
        Ok(order)
    }

    /// Insert or replace a document as-is
    pub fn put_order(&self, order: Order) {
        let mut inner = self.inner.lock();
        inner.last_number = inner.last_number.max(order.order_number);
        inner.orders.insert(order.id.clone(), order);
        inner.notify();
    }

    pub fn remove_order(&self, id: &str) -> Option<Order> {
        let mut inner = self.inner.lock();
        let removed = inner.orders.remove(id);
        if removed.is_some() {
            inner.notify();
        }
        removed
    }

    pub fn order(&self, id: &str) -> Option<Order> {
        self.inner.lock().orders.get(id).cloned()
    }

    /// All orders, newest first
    pub fn orders(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.inner.lock().orders.values().cloned().collect();
        orders.sort_by(by_recency);
        orders
    }

    pub fn put_category(&self, category: Category) {
        let mut inner = self.inner.lock();
        match inner.categories.iter().position(|c| c.id == category.id) {
            Some(i) => inner.categories[i] = category,
            None => inner.categories.push(category),
        }
    }

    pub fn put_menu_item(&self, item: MenuItem) {
        let mut inner = self.inner.lock();
        match inner.menu_items.iter().position(|i| i.id == item.id) {
            Some(i) => inner.menu_items[i] = item,
            None => inner.menu_items.push(item),
        }
    }

    pub fn remove_menu_item(&self, id: &str) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.menu_items.len();
        inner.menu_items.retain(|i| i.id != id);
        inner.menu_items.len() != before
    }

    /// Reject the next `n` writes with [`StoreError::Rejected`]
    pub fn fail_next_writes(&self, n: usize) {
        self.inner.lock().failing_writes = n;
    }

    /// Number of open live queries
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.watchers.retain(|w| !w.tx.is_closed());
        inner.watchers.len()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn subscribe(&self, query: OrderQuery) -> Result<OrderSubscription, StoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        let window = inner.window(&query);
        tx.send(StoreEvent::Snapshot(window.clone()))
            .map_err(|_| StoreError::Closed)?;
        tracing::debug!(
            filter = %query.filter,
            limit = query.limit,
            size = window.len(),
            "Live query opened"
        );
        inner.watchers.push(Watcher { query, window, tx });
        Ok(OrderSubscription::new(rx))
    }

    async fn get_order(&self, id: &str) -> Result<Order, StoreError> {
        self.order(id).ok_or_else(|| StoreError::not_found(ORDERS, id))
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.check_write("update_status")?;
        let order = inner
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(ORDERS, id))?;
        order.status = status;
        inner.notify();
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories = self.inner.lock().categories.clone();
        categories.sort_by_key(|c| c.sort_order);
        Ok(categories)
    }

    async fn menu_items(&self) -> Result<Vec<MenuItem>, StoreError> {
        Ok(self.inner.lock().menu_items.clone())
    }

    async fn delete_category(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.check_write("delete_category")?;
        let before = inner.categories.len();
        inner.categories.retain(|c| c.id != id);
        if inner.categories.len() == before {
            return Err(StoreError::not_found(CATEGORIES, id));
        }
        Ok(())
    }

    async fn save_category(&self, category: &Category) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.check_write("save_category")?;
        match inner.categories.iter().position(|c| c.id == category.id) {
            Some(i) => inner.categories[i] = category.clone(),
            None => inner.categories.push(category.clone()),
        }
        Ok(())
    }
}
