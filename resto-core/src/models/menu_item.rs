//! Menu Item Model
//!
//! Orders copy item data into their own line items when placed, so nothing
//! here ever changes a historical order.

use crate::catalog::option_id;
use crate::error::CatalogError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Size or extra choice of a menu item
///
/// `id` is derived from `name`; two entries with the same normalized name
/// collide and that is not checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuOption {
    pub id: String,
    pub name: String,
    /// Price delta over the base price
    pub price: Decimal,
}

impl MenuOption {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        let name = name.into();
        Self {
            id: option_id(&name),
            name,
            price,
        }
    }

    /// Conventional first size entry (no price delta)
    pub fn base_size() -> Self {
        Self::new("Regular", Decimal::ZERO)
    }
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// Category reference (by category name)
    pub category: String,
    /// Base price
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comes_with: Option<String>,
    /// Gates new orders only, existing orders are unaffected
    #[serde(default = "default_true")]
    pub available: bool,
    /// URL in the image store
    #[serde(default)]
    pub image: String,
    pub sizes: Vec<MenuOption>,
    #[serde(default)]
    pub extras: Vec<MenuOption>,
}

fn default_true() -> bool {
    true
}

impl MenuItem {
    /// New available item seeded with the base size
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
            description: String::new(),
            comes_with: None,
            available: true,
            image: String::new(),
            sizes: vec![MenuOption::base_size()],
            extras: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.sizes.is_empty() {
            return Err(CatalogError::EmptySizes {
                item: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Base price plus the size delta (falls back to the base price)
    pub fn price_for_size(&self, size_id: &str) -> Decimal {
        self.sizes
            .iter()
            .find(|s| s.id == size_id)
            .map(|s| self.price + s.price)
            .unwrap_or(self.price)
    }
}
