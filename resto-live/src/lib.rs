//! Live order desk for the restaurant admin panel
//!
//! # Overview
//!
//! - **Store contract** (`store`): live queries, point updates, catalog reads
//! - **Synchronizer** (`sync`): the live order view kept in step with the store
//! - **Desks** (`desk`): status changes and category edits with persistence
//! - **Config / logging** (`config`, `logger`)
//!
//! # Layout
//!
//! ```text
//! resto-live/src/
//! ├── store/      # OrderStore / CatalogStore traits, MemoryStore
//! ├── sync/       # OrderView reducer, LiveOrders worker
//! ├── desk.rs     # OrderDesk, CatalogDesk
//! ├── config.rs   # LiveConfig (env)
//! ├── error.rs    # LiveError
//! └── logger.rs   # tracing setup
//! ```

pub mod config;
pub mod desk;
pub mod error;
pub mod logger;
pub mod store;
pub mod sync;

// Re-exports
pub use config::LiveConfig;
pub use desk::{CancelConfirmation, CatalogDesk, OrderDesk};
pub use error::{LiveError, LiveResult};
pub use logger::init_logger;
pub use store::{
    CatalogStore, MemoryStore, OrderFilter, OrderQuery, OrderStore, OrderSubscription,
    StoreError, StoreEvent,
};
pub use sync::{LiveOrders, NewOrderAlert, OrderView, ViewSnapshot};
