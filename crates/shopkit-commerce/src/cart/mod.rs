//! Shopping cart module.
//!
//! Contains the cart lines, the in-memory session, its persisted snapshot,
//! change events, and the manager tying them together.

mod config;
mod events;
mod line;
mod manager;
mod session;
mod snapshot;

pub use config::{CartConfig, DEFAULT_STORAGE_KEY, DEFAULT_TTL_SECS};
pub use events::{CartEvent, CartObserver, CartSummary, SubscriptionId};
pub use line::{CartLine, MAX_QUANTITY_PER_LINE};
pub use manager::{CartSessionManager, CartSessionManagerBuilder};
pub use session::{CartSession, CartState, QuantityChange};
pub use snapshot::{SnapshotLoad, SnapshotStore};
