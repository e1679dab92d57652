//! Category Model

use crate::catalog::default_color;
use serde::{Deserialize, Serialize};

/// Category entity
///
/// Menu items reference a category by `name`, not by `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Explicit display color; falls back to [`default_color`] of the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    pub name: String,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
    pub description: Option<String>,
}

impl Category {
    pub fn from_create(id: String, payload: CategoryCreate) -> Self {
        Self {
            id,
            name: payload.name,
            color: payload.color,
            active: true,
            sort_order: payload.sort_order.unwrap_or(0),
            description: payload.description,
        }
    }

    /// Color used by chips and badges
    pub fn display_color(&self) -> &str {
        match self.color.as_deref() {
            Some(color) if !color.is_empty() => color,
            _ => default_color(&self.name),
        }
    }
}
