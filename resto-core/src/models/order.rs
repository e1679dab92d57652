//! Order Model

use crate::error::OrderError;
use crate::order::{ENTRY_STATUS, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the order reaches the customer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Delivery,
    #[serde(alias = "pickup")]
    Takeaway,
}

/// Informational only, never gates a transition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    High,
}

/// Delivery address (only meaningful for delivery orders)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Line item copied from the menu when the order was placed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    /// Unit price
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,
}

impl OrderItem {
    pub fn new(name: impl Into<String>, quantity: u32, price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
            size: None,
            extras: Vec::new(),
        }
    }

    /// quantity × unit price
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Opaque document id (immutable)
    pub id: String,
    /// Short number shown to staff and customers
    pub order_number: u32,
    pub customer_name: String,
    pub customer_phone: String,
    pub order_type: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<DeliveryAddress>,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp (epoch millis), drives every "time ago" display
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<i64>,
    #[serde(default)]
    pub priority: Priority,
}

/// Create order payload (produced by the ordering flow)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub customer_name: String,
    pub customer_phone: String,
    pub order_type: OrderType,
    #[serde(default)]
    pub delivery_address: Option<DeliveryAddress>,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub delivery_fee: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

impl OrderCreate {
    /// At least one line, every line with a positive quantity
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::EmptyItems);
        }
        if let Some(item) = self.items.iter().find(|i| i.quantity == 0) {
            return Err(OrderError::ZeroQuantity {
                item: item.name.clone(),
            });
        }
        Ok(())
    }
}

impl Order {
    /// Build the stored document from a create payload
    ///
    /// The total is computed from the items, the status is [`ENTRY_STATUS`].
    /// Takeaway orders never carry a delivery fee or address. The payload is
    /// taken as-is; callers placing new orders run [`OrderCreate::validate`]
    /// first.
    pub fn from_create(id: String, order_number: u32, payload: OrderCreate, created_at: i64) -> Self {
        let (delivery_fee, delivery_address) = match payload.order_type {
            OrderType::Delivery => (payload.delivery_fee, payload.delivery_address),
            OrderType::Takeaway => (Decimal::ZERO, None),
        };

        let mut order = Self {
            id,
            order_number,
            customer_name: payload.customer_name,
            customer_phone: payload.customer_phone,
            order_type: payload.order_type,
            delivery_address,
            items: payload.items,
            delivery_fee,
            total: Decimal::ZERO,
            status: ENTRY_STATUS,
            notes: payload.notes,
            created_at,
            paid_at: Some(created_at),
            priority: payload.priority,
        };
        order.total = order.computed_total();
        order
    }

    /// Sum of line totals
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Subtotal plus delivery fee
    pub fn computed_total(&self) -> Decimal {
        self.subtotal() + self.delivery_fee
    }

    /// Whether the stored total agrees with the line items
    pub fn total_matches(&self) -> bool {
        self.total == self.computed_total()
    }

    /// Number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn requires_address(&self) -> bool {
        self.order_type == OrderType::Delivery
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == Priority::High
    }
}
