//! Checkout module.
//!
//! Contains the checkout request, the order backend seam and its HTTP
//! implementation, and order types.

mod api;
mod backend;
mod order;
mod request;

pub use api::{ListOrders, OrderApi};
pub use backend::OrderBackend;
pub use order::{OrderItem, OrderStatus, PlacedOrder, UnknownStatus};
pub use request::{CheckoutItem, CheckoutRequest, IdempotencyKey};
