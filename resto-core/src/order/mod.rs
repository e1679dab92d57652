//! Order status lifecycle
//!
//! - [`status`]: the status vocabulary, entry constant and presentation mapping
//! - [`lifecycle`]: legal transitions and classification
//! - [`views`]: kitchen board, relative time, desk summary

pub mod lifecycle;
pub mod status;
pub mod views;

// Re-exports
pub use lifecycle::{
    Classified, advance, advance_to_next, can_transition, cancel, classify, display_label,
    next_statuses,
};
pub use status::{ALL_STATUSES, ENTRY_STATUS, OrderStatus, PROGRESSION, ParseStatusError};
pub use views::{
    KitchenBoard, KitchenColumn, KitchenTicket, OrderSummary, elapsed_minutes, kitchen_board,
    summarize, time_ago,
};
