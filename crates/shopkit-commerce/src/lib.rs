//! Cart session management and order API for ShopKit storefronts.
//!
//! This crate holds the client-side commerce logic:
//!
//! - **Cart**: the session cart with merge-on-add, persisted snapshot with
//!   sliding expiration, and change notification
//! - **Catalog**: product and category clients, and the product snapshot
//!   a cart line keeps
//! - **Checkout**: request assembly, the order backend seam, and the HTTP
//!   order API (create, lookup, admin listing and status updates)
//!
//! # Example
//!
//! ```rust,ignore
//! use shopkit_commerce::prelude::*;
//! use shopkit_cache::MemoryStore;
//! use shopkit_data::FetchClient;
//! use std::sync::Arc;
//!
//! let api = OrderApi::new(FetchClient::new().with_base_url("http://localhost:8080/api"));
//! let cart = CartSessionManager::builder(MemoryStore::new(), Arc::new(api)).load();
//!
//! cart.add_item(
//!     ProductSnapshot::new("7", "Rust Programming Book", Money::new(4999, Currency::USD)),
//!     1,
//! )?;
//! println!("Total: {}", cart.total()?.display());
//!
//! let order = cart.checkout().await?;
//! println!("Placed order {}", order.id);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod client;
pub mod clock;
pub mod identity;
pub mod page;

pub use error::{CheckoutError, CommerceError};
pub use ids::*;
pub use money::{Currency, Money};
pub use page::Paged;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CheckoutError, CommerceError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{
        CartConfig, CartEvent, CartLine, CartObserver, CartSessionManager, CartState,
        CartSummary, QuantityChange,
    };

    // Catalog
    pub use crate::catalog::{
        Category, CategoryApi, Product, ProductApi, ProductQuery, ProductSnapshot, ProductSort,
    };

    // Checkout
    pub use crate::checkout::{
        CheckoutRequest, IdempotencyKey, ListOrders, OrderApi, OrderBackend, OrderStatus,
        PlacedOrder,
    };

    pub use crate::client::ApiClient;
    pub use crate::page::Paged;

    pub use crate::clock::{Clock, SystemClock};
    pub use crate::identity::{CustomerIdentity, TokenSource};
}
