//! Category referential guard
//!
//! Menu items reference categories by name (exact, case-sensitive match).
//! Renaming a category does NOT rewrite the items that pointed at the old
//! name; they keep the old value and no longer resolve to any category until
//! someone reassigns them. [`orphaned_items`] lists them.

use crate::error::CatalogError;
use crate::models::{Category, MenuItem};
use std::collections::HashSet;

/// Items whose `category` equals `category.name`
pub fn referencing_items<'a>(
    category: &'a Category,
    items: &'a [MenuItem],
) -> impl Iterator<Item = &'a MenuItem> + 'a {
    items.iter().filter(move |item| item.category == category.name)
}

pub fn can_delete_category(category: &Category, items: &[MenuItem]) -> bool {
    referencing_items(category, items).next().is_none()
}

/// Check that `category` may be deleted
///
/// The deletion itself is a store call made by the caller after this
/// returns `Ok`.
pub fn delete_category(category: &Category, items: &[MenuItem]) -> Result<(), CatalogError> {
    let count = referencing_items(category, items).count();
    if count > 0 {
        tracing::debug!(
            category = %category.name,
            count,
            "Category delete refused, still referenced"
        );
        return Err(CatalogError::CategoryInUse {
            category: category.name.clone(),
            count,
        });
    }
    Ok(())
}

/// Rename without touching any menu item
pub fn rename_category(category: &Category, new_name: impl Into<String>) -> Category {
    Category {
        name: new_name.into(),
        ..category.clone()
    }
}

/// Items whose category name matches no existing category
pub fn orphaned_items<'a>(categories: &[Category], items: &'a [MenuItem]) -> Vec<&'a MenuItem> {
    let names: HashSet<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    items
        .iter()
        .filter(|item| !names.contains(item.category.as_str()))
        .collect()
}
