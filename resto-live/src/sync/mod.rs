//! Live Order View Synchronizer
//!
//! - [`view`]: the pure reducer over snapshot and incremental store events
//! - [`live`]: the async worker driving it from a store subscription

pub mod live;
pub mod view;

// Re-exports
pub use live::{LiveOrders, ViewSnapshot};
pub use view::{Applied, NewOrderAlert, OrderView};
