//! Data models
//!
//! Document shapes of the `orders`, `categories` and `menuItems` collections.
//! Field names follow the store (`camelCase`); ids are opaque strings and
//! timestamps are epoch milliseconds.

pub mod category;
pub mod menu_item;
pub mod order;

// Re-exports
pub use category::*;
pub use menu_item::*;
pub use order::*;
