//! Core types for the restaurant admin panel
//!
//! Pure, synchronous building blocks shared by every surface of the admin
//! panel (order desk, kitchen board, menu editor):
//!
//! - [`models`]: orders, categories and menu items as stored in the document store
//! - [`order`]: the order status lifecycle and the views derived from it
//! - [`catalog`]: the category/menu-item referential guard
//! - [`error`]: error codes and error values shared with the UI layer
//!
//! Nothing in this crate performs I/O.

pub mod catalog;
pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use error::{CatalogError, ErrorCode, LifecycleError, OrderError};
pub use models::{Category, MenuItem, Order, OrderItem};
pub use order::{ENTRY_STATUS, OrderStatus};
