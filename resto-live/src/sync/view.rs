//! Live order view reducer
//!
//! Holds the visible order collection for one filter at a time. Every store
//! event is tagged with the generation of the subscription that produced it;
//! [`OrderView::set_filter`] starts a new generation and events of older
//! generations are dropped without looking at their content.
//!
//! Every matching order the current generation has received is kept, sorted
//! newest first; only the first `limit` of them are visible. Orders beyond
//! the window are held back so that a removal arriving after an older add
//! still refills the window. The selected order is an id resolved against the
//! visible window on every read.

use crate::store::{OrderFilter, StoreEvent, by_recency};
use resto_core::models::{Order, OrderType};
use resto_core::order::{ENTRY_STATUS, OrderStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

/// Raised when a fresh order shows up after the snapshot
///
/// The sound/push layer listens for these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderAlert {
    pub order_id: String,
    pub order_number: u32,
    pub customer_name: String,
    pub order_type: OrderType,
    pub total: Decimal,
    pub created_at: i64,
}

impl From<&Order> for NewOrderAlert {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            order_number: order.order_number,
            customer_name: order.customer_name.clone(),
            order_type: order.order_type,
            total: order.total,
            created_at: order.created_at,
        }
    }
}

/// Outcome of [`OrderView::apply_event`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Event belongs to a superseded subscription
    Stale,
    /// Nothing visible changed
    Unchanged,
    Changed { alerts: Vec<NewOrderAlert> },
}

impl Applied {
    pub fn is_changed(&self) -> bool {
        matches!(self, Applied::Changed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct OrderView {
    filter: OrderFilter,
    limit: usize,
    generation: u64,
    loading: bool,
    /// Matching orders, newest first; the window is the first `limit`
    orders: Vec<Order>,
    selected: Option<String>,
    /// Ids delivered in this generation, visible or not
    seen: HashSet<String>,
    /// Newest `created_at` of the snapshot; older arrivals are backfills
    watermark: Option<i64>,
}

impl OrderView {
    /// Empty view in the loading state, generation 0
    pub fn new(filter: OrderFilter, limit: usize) -> Self {
        Self {
            filter,
            limit: limit.max(1),
            generation: 0,
            loading: true,
            orders: Vec::new(),
            selected: None,
            seen: HashSet::new(),
            watermark: None,
        }
    }

    /// Switch filter and start a new generation
    ///
    /// The collection is cleared and the view is loading until the snapshot
    /// of the returned generation arrives.
    pub fn set_filter(&mut self, filter: OrderFilter) -> u64 {
        self.generation += 1;
        self.filter = filter;
        self.loading = true;
        self.orders.clear();
        self.seen.clear();
        self.watermark = None;
        tracing::debug!(generation = self.generation, filter = %filter, "View reset");
        self.generation
    }

    pub fn apply_event(&mut self, generation: u64, event: StoreEvent) -> Applied {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                kind = event.kind(),
                "Dropping stale event"
            );
            return Applied::Stale;
        }

        let applied = match event {
            StoreEvent::Snapshot(orders) => {
                self.replace(orders);
                Applied::Changed { alerts: Vec::new() }
            }
            StoreEvent::Added(order) => self.upsert(order, true),
            StoreEvent::Modified(order) => self.upsert(order, false),
            StoreEvent::Removed(id) => self.remove(&id),
        };

        self.reconcile_selection();
        applied
    }

    fn replace(&mut self, orders: Vec<Order>) {
        let mut ids = HashSet::new();
        // Last copy of an id wins
        let mut deduped: Vec<Order> = orders
            .into_iter()
            .rev()
            .filter(|o| ids.insert(o.id.clone()))
            .filter(|o| self.filter.matches(o))
            .collect();
        deduped.sort_by(by_recency);
        self.watermark = deduped.first().map(|o| o.created_at);
        self.seen.extend(ids);
        self.orders = deduped;
        self.loading = false;
    }

    fn upsert(&mut self, order: Order, added: bool) -> Applied {
        let unseen = self.seen.insert(order.id.clone());

        if !self.filter.matches(&order) {
            return self.remove(&order.id);
        }

        let previous = self.orders.iter().position(|o| o.id == order.id);
        if let Some(i) = previous {
            if self.orders[i] == order {
                return Applied::Unchanged;
            }
            self.orders.remove(i);
        }

        let alert = (added && unseen && self.is_fresh(&order))
            .then(|| NewOrderAlert::from(&order));

        let at = self
            .orders
            .binary_search_by(|o| by_recency(o, &order))
            .unwrap_or_else(|i| i);
        self.orders.insert(at, order);

        if at < self.limit || previous.is_some_and(|i| i < self.limit) {
            Applied::Changed {
                alerts: alert.into_iter().collect(),
            }
        } else {
            Applied::Unchanged
        }
    }

    /// A newly created order rather than an older one filling freed room
    fn is_fresh(&self, order: &Order) -> bool {
        !self.loading
            && order.status == ENTRY_STATUS
            && self.watermark.is_none_or(|newest| order.created_at >= newest)
    }

    fn remove(&mut self, id: &str) -> Applied {
        match self.orders.iter().position(|o| o.id == id) {
            Some(i) => {
                self.orders.remove(i);
                if i < self.limit {
                    Applied::Changed { alerts: Vec::new() }
                } else {
                    Applied::Unchanged
                }
            }
            None => Applied::Unchanged,
        }
    }

    /// Point the detail view at `id`
    ///
    /// Returns the order if it is currently visible; otherwise the detail
    /// view shows nothing until it appears.
    pub fn select_order(&mut self, id: impl Into<String>) -> Option<&Order> {
        self.selected = Some(id.into());
        self.selected()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if the order left the collection
    ///
    /// Returns `true` when the selection was cleared. Ignored while loading,
    /// the order may still arrive with the snapshot.
    pub fn reconcile_selection(&mut self) -> bool {
        if self.loading {
            return false;
        }
        match &self.selected {
            Some(id) if !self.visible().iter().any(|o| &o.id == id) => {
                tracing::debug!(order_id = %id, "Selected order left the view");
                self.selected = None;
                true
            }
            _ => false,
        }
    }

    pub fn selected(&self) -> Option<&Order> {
        let id = self.selected.as_deref()?;
        self.get(id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.visible().iter().find(|o| o.id == id)
    }

    /// Visible window, newest first
    pub fn orders(&self) -> &[Order] {
        self.visible()
    }

    fn visible(&self) -> &[Order] {
        &self.orders[..self.orders.len().min(self.limit)]
    }

    pub fn filter(&self) -> OrderFilter {
        self.filter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn len(&self) -> usize {
        self.visible().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Visible orders in `status`
    pub fn count(&self, status: OrderStatus) -> usize {
        self.visible().iter().filter(|o| o.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resto_core::models::{OrderCreate, OrderItem};

    fn order(id: &str, created_at: i64) -> Order {
        let payload = OrderCreate {
            customer_name: "Ana".to_string(),
            customer_phone: "555".to_string(),
            order_type: OrderType::Delivery,
            delivery_address: None,
            items: vec![OrderItem::new("Burger", 2, Decimal::from(10))],
            delivery_fee: Decimal::from(2),
            notes: None,
            priority: Default::default(),
        };
        Order::from_create(id.to_string(), 1, payload, created_at)
    }

    fn with_status(mut order: Order, status: OrderStatus) -> Order {
        order.status = status;
        order
    }

    fn ids(view: &OrderView) -> Vec<&str> {
        view.orders().iter().map(|o| o.id.as_str()).collect()
    }

    fn ready_view(filter: OrderFilter, limit: usize, orders: Vec<Order>) -> (OrderView, u64) {
        let mut view = OrderView::new(filter, limit);
        let generation = view.set_filter(filter);
        view.apply_event(generation, StoreEvent::Snapshot(orders));
        (view, generation)
    }

    #[test]
    fn test_snapshot_modify_add_remove() {
        let (mut view, g) = ready_view(OrderFilter::All, 10, vec![order("o1", 1), order("o2", 2)]);
        assert_eq!(ids(&view), ["o2", "o1"]);

        view.apply_event(
            g,
            StoreEvent::Modified(with_status(order("o1", 1), OrderStatus::Ready)),
        );
        view.apply_event(g, StoreEvent::Added(order("o3", 3)));
        view.apply_event(g, StoreEvent::Removed("o2".into()));

        assert_eq!(ids(&view), ["o3", "o1"]);
        assert_eq!(view.get("o1").unwrap().status, OrderStatus::Ready);
        assert!(view.get("o2").is_none());
    }

    #[test]
    fn test_new_view_is_loading() {
        let mut view = OrderView::new(OrderFilter::All, 10);
        assert!(view.is_loading());
        assert!(view.is_empty());

        let g = view.set_filter(OrderFilter::All);
        view.apply_event(g, StoreEvent::Snapshot(vec![]));
        assert!(!view.is_loading());
    }

    #[test]
    fn test_set_filter_clears_to_loading() {
        let (mut view, _) = ready_view(OrderFilter::All, 10, vec![order("o1", 1)]);

        let g2 = view.set_filter(OrderStatus::Ready.into());
        assert!(view.is_loading());
        assert!(view.is_empty());
        assert_eq!(view.filter(), OrderFilter::Status(OrderStatus::Ready));
        assert_eq!(view.generation(), g2);
    }

    #[test]
    fn test_stale_events_are_dropped() {
        let (mut view, g1) = ready_view(OrderFilter::All, 10, vec![order("o1", 1)]);
        let g2 = view.set_filter(OrderStatus::Ready.into());

        assert_eq!(
            view.apply_event(g1, StoreEvent::Added(order("o9", 9))),
            Applied::Stale
        );
        assert_eq!(
            view.apply_event(g1, StoreEvent::Snapshot(vec![order("o8", 8)])),
            Applied::Stale
        );
        assert!(view.is_empty());
        assert!(view.is_loading());

        let ready = with_status(order("o2", 2), OrderStatus::Ready);
        view.apply_event(g2, StoreEvent::Snapshot(vec![ready]));
        assert_eq!(view.apply_event(g1, StoreEvent::Removed("o2".into())), Applied::Stale);
        assert_eq!(ids(&view), ["o2"]);
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let (mut view, g) = ready_view(OrderFilter::All, 10, vec![order("o1", 1)]);

        assert!(view.apply_event(g, StoreEvent::Added(order("o2", 2))).is_changed());
        assert_eq!(
            view.apply_event(g, StoreEvent::Added(order("o2", 2))),
            Applied::Unchanged
        );
        assert_eq!(
            view.apply_event(g, StoreEvent::Modified(order("o2", 2))),
            Applied::Unchanged
        );
        assert_eq!(ids(&view), ["o2", "o1"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut view, g) = ready_view(OrderFilter::All, 10, vec![order("o1", 1)]);
        assert_eq!(
            view.apply_event(g, StoreEvent::Removed("nope".into())),
            Applied::Unchanged
        );
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_removed_before_added_replay() {
        // Replayed out of order for the same id; the store's final state has o2
        let (mut view, g) = ready_view(OrderFilter::All, 10, vec![order("o1", 1)]);
        view.apply_event(g, StoreEvent::Removed("o2".into()));
        view.apply_event(g, StoreEvent::Added(order("o2", 2)));
        view.apply_event(g, StoreEvent::Added(order("o2", 2)));
        view.apply_event(
            g,
            StoreEvent::Modified(with_status(order("o2", 2), OrderStatus::Preparing)),
        );

        assert_eq!(ids(&view), ["o2", "o1"]);
        assert_eq!(view.get("o2").unwrap().status, OrderStatus::Preparing);
    }

    #[test]
    fn test_removed_after_added_leaves_no_trace() {
        let (mut view, g) = ready_view(OrderFilter::All, 10, vec![]);
        view.apply_event(g, StoreEvent::Added(order("o1", 1)));
        view.apply_event(g, StoreEvent::Modified(order("o1", 1)));
        view.apply_event(g, StoreEvent::Removed("o1".into()));
        assert!(view.is_empty());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let (mut view, g) = ready_view(
            OrderFilter::All,
            2,
            vec![order("o1", 1), order("o2", 2), order("o3", 3)],
        );
        assert_eq!(ids(&view), ["o3", "o2"]);

        view.apply_event(g, StoreEvent::Added(order("o4", 4)));
        assert_eq!(ids(&view), ["o4", "o3"]);

        // Older than the whole full window
        assert_eq!(
            view.apply_event(g, StoreEvent::Added(order("o0", 0))),
            Applied::Unchanged
        );
        assert_eq!(ids(&view), ["o4", "o3"]);
    }

    #[test]
    fn test_older_add_before_removal_refills_window() {
        let (mut view, g) = ready_view(OrderFilter::All, 2, vec![order("o3", 3), order("o2", 2)]);

        // Arrives before the removal that makes room for it
        assert_eq!(
            view.apply_event(g, StoreEvent::Added(order("o1", 1))),
            Applied::Unchanged
        );
        assert_eq!(ids(&view), ["o3", "o2"]);

        assert!(view.apply_event(g, StoreEvent::Removed("o3".into())).is_changed());
        assert_eq!(ids(&view), ["o2", "o1"]);

        // Held-back orders are not visible
        view.apply_event(g, StoreEvent::Added(order("o0", 0)));
        assert!(view.get("o0").is_none());
        assert_eq!(view.len(), 2);
        assert_eq!(
            view.apply_event(g, StoreEvent::Removed("o0".into())),
            Applied::Unchanged
        );
    }

    #[test]
    fn test_backfill_raises_no_alert() {
        let (mut view, g) = ready_view(OrderFilter::All, 2, vec![order("o3", 3), order("o2", 2)]);

        view.apply_event(g, StoreEvent::Removed("o3".into()));
        assert_eq!(
            view.apply_event(g, StoreEvent::Added(order("o1", 1))),
            Applied::Changed { alerts: vec![] }
        );
        assert_eq!(ids(&view), ["o2", "o1"]);

        // A genuinely new order still alerts, once
        match view.apply_event(g, StoreEvent::Added(order("o4", 4))) {
            Applied::Changed { alerts } => assert_eq!(alerts[0].order_id, "o4"),
            other => panic!("expected alert, got {:?}", other),
        }
        view.apply_event(g, StoreEvent::Removed("o4".into()));
        assert_eq!(
            view.apply_event(g, StoreEvent::Added(order("o4", 4))),
            Applied::Changed { alerts: vec![] }
        );
    }

    fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut all = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head.clone());
                all.push(tail);
            }
        }
        all
    }

    #[test]
    fn test_converges_under_any_interleaving() {
        // Store ends with o4, o2 (ready), o1 and o0; o3 is deleted
        let events = vec![
            StoreEvent::Added(order("o1", 1)),
            StoreEvent::Removed("o3".into()),
            StoreEvent::Modified(with_status(order("o2", 2), OrderStatus::Ready)),
            StoreEvent::Added(order("o0", 0)),
            StoreEvent::Added(order("o4", 4)),
        ];

        let orderings = permutations(&events);
        assert_eq!(orderings.len(), 120);

        for ordering in orderings {
            let (mut view, g) =
                ready_view(OrderFilter::All, 3, vec![order("o3", 3), order("o2", 2)]);
            for event in ordering.clone() {
                view.apply_event(g, event);
            }

            let kinds: Vec<_> = ordering.iter().map(|e| (e.kind(), e.order_id())).collect();
            assert_eq!(ids(&view), ["o4", "o2", "o1"], "ordering {:?}", kinds);
            assert_eq!(view.get("o2").unwrap().status, OrderStatus::Ready);
            assert_eq!(view.get("o4").unwrap().status, OrderStatus::Pending);
            assert!(view.len() <= view.limit());
            assert!(view
                .orders()
                .windows(2)
                .all(|w| by_recency(&w[0], &w[1]).is_lt()));
        }
    }

    #[test]
    fn test_snapshot_dedupes_last_wins() {
        let (view, _) = ready_view(
            OrderFilter::All,
            10,
            vec![
                order("o1", 1),
                with_status(order("o1", 1), OrderStatus::Ready),
            ],
        );
        assert_eq!(view.len(), 1);
        assert_eq!(view.get("o1").unwrap().status, OrderStatus::Ready);
    }

    #[test]
    fn test_modified_out_of_filter_removes() {
        let (mut view, g) = ready_view(
            OrderStatus::Pending.into(),
            10,
            vec![order("o1", 1), order("o2", 2)],
        );

        view.apply_event(
            g,
            StoreEvent::Modified(with_status(order("o1", 1), OrderStatus::Preparing)),
        );
        assert_eq!(ids(&view), ["o2"]);

        // Never matched, never visible
        assert_eq!(
            view.apply_event(
                g,
                StoreEvent::Added(with_status(order("o5", 5), OrderStatus::Ready))
            ),
            Applied::Unchanged
        );
    }

    #[test]
    fn test_equal_timestamps_order_by_id() {
        let (view, _) = ready_view(
            OrderFilter::All,
            10,
            vec![order("b", 5), order("a", 5), order("c", 6)],
        );
        assert_eq!(ids(&view), ["c", "a", "b"]);
    }

    #[test]
    fn test_selection_follows_updates() {
        let (mut view, g) = ready_view(OrderFilter::All, 10, vec![order("o1", 1)]);

        assert_eq!(view.select_order("o1").unwrap().status, OrderStatus::Pending);
        view.apply_event(
            g,
            StoreEvent::Modified(with_status(order("o1", 1), OrderStatus::Preparing)),
        );
        assert_eq!(view.selected().unwrap().status, OrderStatus::Preparing);

        view.apply_event(g, StoreEvent::Removed("o1".into()));
        assert!(view.selected().is_none());
        assert!(view.selected_id().is_none());
    }

    #[test]
    fn test_select_missing_shows_nothing() {
        let (mut view, _) = ready_view(OrderFilter::All, 10, vec![order("o1", 1)]);
        assert!(view.select_order("ghost").is_none());
        assert!(view.selected().is_none());

        view.clear_selection();
        assert!(view.selected_id().is_none());
    }

    #[test]
    fn test_selection_survives_filter_switch_when_present() {
        let (mut view, _) = ready_view(OrderFilter::All, 10, vec![order("o1", 1)]);
        view.select_order("o1");

        let g2 = view.set_filter(OrderStatus::Pending.into());
        assert!(view.selected().is_none());
        assert_eq!(view.selected_id(), Some("o1"));

        view.apply_event(g2, StoreEvent::Snapshot(vec![order("o1", 1)]));
        assert_eq!(view.selected().unwrap().id, "o1");

        let g3 = view.set_filter(OrderStatus::Ready.into());
        view.apply_event(g3, StoreEvent::Snapshot(vec![]));
        assert!(view.selected_id().is_none());
    }

    #[test]
    fn test_alerts_only_after_snapshot() {
        let mut view = OrderView::new(OrderFilter::All, 10);
        let g = view.set_filter(OrderFilter::All);

        // Before the snapshot nothing alerts
        let early = view.apply_event(g, StoreEvent::Added(order("o1", 1)));
        assert_eq!(early, Applied::Changed { alerts: vec![] });

        view.apply_event(g, StoreEvent::Snapshot(vec![order("o1", 1)]));

        match view.apply_event(g, StoreEvent::Added(order("o2", 2))) {
            Applied::Changed { alerts } => {
                assert_eq!(alerts.len(), 1);
                assert_eq!(alerts[0].order_id, "o2");
                assert_eq!(alerts[0].total, Decimal::from(22));
            }
            other => panic!("expected change, got {:?}", other),
        }

        // Not in the entry status, or merely modified: no alert
        let ready = with_status(order("o3", 3), OrderStatus::Ready);
        assert_eq!(
            view.apply_event(g, StoreEvent::Added(ready)),
            Applied::Changed { alerts: vec![] }
        );
        assert_eq!(
            view.apply_event(g, StoreEvent::Modified(order("o4", 4))),
            Applied::Changed { alerts: vec![] }
        );
    }

    #[test]
    fn test_alert_wire_format() {
        let alert = NewOrderAlert::from(&order("o1", 1700000000000));
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["orderId"], "o1");
        assert_eq!(json["orderType"], "delivery");
        assert_eq!(json["createdAt"], 1700000000000i64);
    }

    #[test]
    fn test_count_by_status() {
        let (view, _) = ready_view(
            OrderFilter::All,
            10,
            vec![
                order("o1", 1),
                with_status(order("o2", 2), OrderStatus::Ready),
                order("o3", 3),
            ],
        );
        assert_eq!(view.count(OrderStatus::Pending), 2);
        assert_eq!(view.count(OrderStatus::Ready), 1);
    }
}
