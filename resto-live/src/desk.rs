//! Order desk and menu editor actions
//!
//! Validate locally, then write to the store. A successful call returns the
//! confirmed value; the live view picks the change up from the store's event
//! stream and is never updated ahead of the store.

use crate::error::{LiveError, LiveResult};
use crate::store::{CatalogStore, OrderStore, StoreError};
use resto_core::catalog::guard;
use resto_core::models::{Category, Order};
use resto_core::order::{OrderStatus, lifecycle};
use resto_core::util::now_millis;
use std::sync::Arc;

/// Proof that the operator confirmed a cancellation
///
/// Built by the UI after its confirmation dialog, for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelConfirmation {
    order_id: String,
    operator: String,
    confirmed_at: i64,
}

impl CancelConfirmation {
    pub fn for_order(order_id: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            operator: operator.into(),
            confirmed_at: now_millis(),
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn confirmed_at(&self) -> i64 {
        self.confirmed_at
    }
}

/// Status changes from the order desk and the kitchen board
#[derive(Clone)]
pub struct OrderDesk {
    store: Arc<dyn OrderStore>,
}

impl OrderDesk {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    /// Move `order` forward to `target`
    ///
    /// `cancelled` is refused here with [`LiveError::NotConfirmed`]; use
    /// [`OrderDesk::cancel`].
    pub async fn change_status(&self, order: &Order, target: OrderStatus) -> LiveResult<Order> {
        if target == OrderStatus::Cancelled {
            return Err(LiveError::NotConfirmed {
                order_id: order.id.clone(),
            });
        }
        let next = lifecycle::advance(order, target)?;
        self.persist(order, next).await
    }

    /// Same as [`OrderDesk::change_status`], reading the order first
    pub async fn change_status_by_id(&self, order_id: &str, target: OrderStatus) -> LiveResult<Order> {
        let order = self.store.get_order(order_id).await?;
        self.change_status(&order, target).await
    }

    /// One step forward (the kitchen board button)
    pub async fn bump(&self, order: &Order) -> LiveResult<Order> {
        let next = lifecycle::advance_to_next(order)?;
        self.persist(order, next).await
    }

    pub async fn cancel(
        &self,
        order: &Order,
        confirmation: &CancelConfirmation,
    ) -> LiveResult<Order> {
        if confirmation.order_id != order.id {
            tracing::warn!(
                order_id = %order.id,
                confirmed_for = %confirmation.order_id,
                "Cancellation confirmed for another order"
            );
            return Err(LiveError::NotConfirmed {
                order_id: order.id.clone(),
            });
        }
        let next = lifecycle::cancel(order)?;
        tracing::info!(
            order_id = %order.id,
            operator = %confirmation.operator,
            "Cancellation confirmed"
        );
        self.persist(order, next).await
    }

    async fn persist(&self, order: &Order, next: Order) -> LiveResult<Order> {
        tracing::info!(
            order_id = %order.id,
            order_number = order.order_number,
            from = %order.status,
            to = %next.status,
            "Updating order status"
        );

        if let Err(source) = self.store.update_status(&order.id, next.status).await {
            tracing::warn!(
                order_id = %order.id,
                to = %next.status,
                error = %source,
                "Order status not saved"
            );
            return Err(LiveError::PersistFailure {
                order_id: order.id.clone(),
                source,
            });
        }
        Ok(next)
    }
}

/// Category edits from the menu editor
#[derive(Clone)]
pub struct CatalogDesk {
    store: Arc<dyn CatalogStore>,
}

impl CatalogDesk {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Delete `category` unless a menu item still names it
    pub async fn delete_category(&self, category: &Category) -> LiveResult<()> {
        // 1. Current items, never a cached copy
        let items = self.store.menu_items().await?;

        // 2. Referential guard
        guard::delete_category(category, &items)?;

        // 3. Store delete
        self.store.delete_category(&category.id).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category deleted");
        Ok(())
    }

    /// Rename and save; menu items keep the old name
    pub async fn rename_category(
        &self,
        category: &Category,
        new_name: impl Into<String>,
    ) -> LiveResult<Category> {
        let renamed = guard::rename_category(category, new_name);
        self.store.save_category(&renamed).await?;

        let items = self.store.menu_items().await?;
        let stale = guard::referencing_items(category, &items).count();
        if stale > 0 {
            tracing::warn!(
                category_id = %category.id,
                old_name = %category.name,
                new_name = %renamed.name,
                stale,
                "Menu items still point at the old category name"
            );
        } else {
            tracing::info!(category_id = %category.id, new_name = %renamed.name, "Category renamed");
        }
        Ok(renamed)
    }

    /// Category by id
    pub async fn category(&self, id: &str) -> LiveResult<Category> {
        self.store
            .categories()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found(crate::store::CATEGORIES, id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use resto_core::ErrorCode;
    use resto_core::error::{CatalogError, LifecycleError};
    use resto_core::models::{MenuItem, OrderCreate, OrderItem, OrderType};
    use rust_decimal::Decimal;

    fn seed(store: &MemoryStore) -> Order {
        store.insert_order(OrderCreate {
            customer_name: "Ana".to_string(),
            customer_phone: "555".to_string(),
            order_type: OrderType::Delivery,
            delivery_address: None,
            items: vec![OrderItem::new("Burger", 2, Decimal::from(10))],
            delivery_fee: Decimal::from(2),
            notes: None,
            priority: Default::default(),
        })
        .unwrap()
    }

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            color: None,
            active: true,
            sort_order: 0,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_change_status_persists() {
        let store = Arc::new(MemoryStore::new());
        let desk = OrderDesk::new(store.clone());
        let order = seed(&store);

        let preparing = desk
            .change_status(&order, OrderStatus::Preparing)
            .await
            .unwrap();
        assert_eq!(preparing.status, OrderStatus::Preparing);
        assert_eq!(preparing.total, Decimal::from(22));
        assert_eq!(store.order(&order.id).unwrap().status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn test_invalid_transition_does_not_write() {
        let store = Arc::new(MemoryStore::new());
        let desk = OrderDesk::new(store.clone());
        let order = seed(&store);
        let preparing = desk.bump(&order).await.unwrap();

        let err = desk
            .change_status(&preparing, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LiveError::Lifecycle(LifecycleError::InvalidTransition {
                from: OrderStatus::Preparing,
                to: OrderStatus::Pending
            })
        ));
        assert_eq!(store.order(&order.id).unwrap().status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn test_persist_failure_is_distinct() {
        let store = Arc::new(MemoryStore::new());
        let desk = OrderDesk::new(store.clone());
        let order = seed(&store);
        store.fail_next_writes(1);

        let err = desk
            .change_status(&order, OrderStatus::Preparing)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PersistFailure);
        assert_eq!(store.order(&order.id).unwrap().status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_cancel_requires_matching_confirmation() {
        let store = Arc::new(MemoryStore::new());
        let desk = OrderDesk::new(store.clone());
        let order = seed(&store);

        let err = desk
            .change_status(&order, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CancelNotConfirmed);

        let other = CancelConfirmation::for_order("someone-else", "maria");
        let err = desk.cancel(&order, &other).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CancelNotConfirmed);
        assert_eq!(store.order(&order.id).unwrap().status, OrderStatus::Pending);

        let confirmation = CancelConfirmation::for_order(&order.id, "maria");
        let cancelled = desk.cancel(&order, &confirmation).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let err = desk.cancel(&cancelled, &confirmation).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::OrderAlreadyTerminal);
    }

    #[tokio::test]
    async fn test_bump_walks_to_delivered() {
        let store = Arc::new(MemoryStore::new());
        let desk = OrderDesk::new(store.clone());
        let mut order = seed(&store);

        for expected in [
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Delivered,
        ] {
            order = desk.bump(&order).await.unwrap();
            assert_eq!(order.status, expected);
        }

        let err = desk.bump(&order).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::OrderAlreadyTerminal);
    }

    #[tokio::test]
    async fn test_change_status_by_id_unknown() {
        let store = Arc::new(MemoryStore::new());
        let desk = OrderDesk::new(store);

        let err = desk
            .change_status_by_id("missing", OrderStatus::Ready)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::OrderNotFound);
    }

    #[tokio::test]
    async fn test_delete_category_guarded() {
        let store = Arc::new(MemoryStore::new());
        let desserts = category("c2", "Desserts");
        store.put_category(category("c1", "Mains"));
        store.put_category(desserts.clone());
        store.put_menu_item(MenuItem::new("m1", "Steak", "Mains", Decimal::from(20)));
        store.put_menu_item(MenuItem::new("m2", "Flan", "Desserts", Decimal::from(5)));

        let desk = CatalogDesk::new(store.clone());

        let err = desk.delete_category(&desserts).await.unwrap_err();
        assert!(matches!(
            err,
            LiveError::Catalog(CatalogError::CategoryInUse { count: 1, .. })
        ));
        assert_eq!(store.categories().await.unwrap().len(), 2);

        store.remove_menu_item("m2");
        desk.delete_category(&desserts).await.unwrap();
        assert_eq!(store.categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_does_not_cascade() {
        let store = Arc::new(MemoryStore::new());
        let mains = category("c1", "Mains");
        store.put_category(mains.clone());
        store.put_menu_item(MenuItem::new("m1", "Steak", "Mains", Decimal::from(20)));

        let desk = CatalogDesk::new(store.clone());
        let renamed = desk.rename_category(&mains, "Main Courses").await.unwrap();

        assert_eq!(renamed.name, "Main Courses");
        assert_eq!(desk.category("c1").await.unwrap().name, "Main Courses");
        assert_eq!(store.menu_items().await.unwrap()[0].category, "Mains");
        // Nothing references the new name, so it can go
        desk.delete_category(&renamed).await.unwrap();
    }

    #[tokio::test]
    async fn test_category_not_found() {
        let desk = CatalogDesk::new(Arc::new(MemoryStore::new()));
        let err = desk.category("nope").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CategoryNotFound);
    }
}
