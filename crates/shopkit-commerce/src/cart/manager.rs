//! Cart session manager.
//!
//! Owns the in-memory cart for one client session, persists it after every
//! change, and turns it into an order on checkout.

use crate::cart::config::CartConfig;
use crate::cart::events::{CartEvent, CartObserver, CartSummary, Observers, SubscriptionId};
use crate::cart::line::CartLine;
use crate::cart::session::{CartSession, CartState, QuantityChange};
use crate::cart::snapshot::{SnapshotLoad, SnapshotStore};
use crate::catalog::ProductSnapshot;
use crate::checkout::{CheckoutRequest, IdempotencyKey, OrderBackend, PlacedOrder};
use crate::clock::{Clock, SystemClock};
use crate::error::{CheckoutError, CommerceError};
use crate::identity::CustomerIdentity;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use shopkit_cache::KeyValueStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

struct Inner {
    session: CartSession,
    expires_at: Option<i64>,
    /// Key reused by checkout retries until the cart changes.
    pending_key: Option<IdempotencyKey>,
}

/// Builder for [`CartSessionManager`].
pub struct CartSessionManagerBuilder<S> {
    store: S,
    backend: Arc<dyn OrderBackend>,
    config: CartConfig,
    clock: Arc<dyn Clock>,
    identity: Option<Arc<dyn CustomerIdentity>>,
}

impl<S: KeyValueStore> CartSessionManagerBuilder<S> {
    pub fn config(mut self, config: CartConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Source of the customer email sent with checkout.
    pub fn identity(mut self, identity: Arc<dyn CustomerIdentity>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Build the manager and restore any persisted snapshot.
    pub fn load(self) -> CartSessionManager<S> {
        let snapshots = SnapshotStore::new(self.store, &self.config, self.clock);
        let manager = CartSessionManager {
            inner: Mutex::new(Inner {
                session: CartSession::new(self.config.currency),
                expires_at: None,
                pending_key: None,
            }),
            snapshots,
            backend: self.backend,
            identity: self.identity,
            observers: Observers::default(),
            checkout_in_flight: AtomicBool::new(false),
            currency: self.config.currency,
        };
        manager.restore();
        manager
    }
}

/// The shopping cart for the current session.
///
/// All operations take `&self`; share the manager behind an `Arc`. Mutators
/// hold an internal lock only while they run, so they may be called while a
/// checkout is awaiting the backend.
pub struct CartSessionManager<S> {
    inner: Mutex<Inner>,
    snapshots: SnapshotStore<S>,
    backend: Arc<dyn OrderBackend>,
    identity: Option<Arc<dyn CustomerIdentity>>,
    observers: Observers,
    checkout_in_flight: AtomicBool,
    currency: Currency,
}

impl<S: KeyValueStore> CartSessionManager<S> {
    /// Start building a manager over `store` that checks out through `backend`.
    pub fn builder(store: S, backend: Arc<dyn OrderBackend>) -> CartSessionManagerBuilder<S> {
        CartSessionManagerBuilder {
            store,
            backend,
            config: CartConfig::default(),
            clock: Arc::new(SystemClock),
            identity: None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// A non-positive quantity does nothing.
    pub fn add_item(&self, product: ProductSnapshot, quantity: i64) -> Result<(), CommerceError> {
        let product_id = product.id.clone();
        let (event, summary) = {
            let mut inner = self.lock();
            let Some(quantity) = inner.session.add(product, quantity)? else {
                return Ok(());
            };
            tracing::debug!(product_id = %product_id, quantity, "Cart item added");
            self.commit(&mut inner);
            (
                CartEvent::ItemAdded {
                    product_id,
                    quantity,
                },
                summarize(&inner.session),
            )
        };
        self.observers.notify(&event, &summary);
        Ok(())
    }

    /// Replace a line's quantity. Zero or less removes the line; an unknown
    /// product is ignored.
    pub fn set_quantity(&self, product_id: &ProductId, quantity: i64) -> QuantityChange {
        let (change, notification) = {
            let mut inner = self.lock();
            let change = inner.session.set_quantity(product_id, quantity);
            let event = match change {
                QuantityChange::Updated { previous, current } => CartEvent::QuantityChanged {
                    product_id: product_id.clone(),
                    previous,
                    current,
                },
                QuantityChange::Removed => CartEvent::ItemRemoved {
                    product_id: product_id.clone(),
                },
                QuantityChange::Missing => return QuantityChange::Missing,
            };
            tracing::debug!(product_id = %product_id, ?change, "Cart quantity set");
            self.commit(&mut inner);
            (change, (event, summarize(&inner.session)))
        };
        self.observers.notify(&notification.0, &notification.1);
        change
    }

    /// Remove the line for `product_id`. Returns whether one existed.
    pub fn remove_item(&self, product_id: &ProductId) -> bool {
        let summary = {
            let mut inner = self.lock();
            if !inner.session.remove(product_id) {
                return false;
            }
            tracing::debug!(product_id = %product_id, "Cart item removed");
            self.commit(&mut inner);
            summarize(&inner.session)
        };
        self.observers.notify(
            &CartEvent::ItemRemoved {
                product_id: product_id.clone(),
            },
            &summary,
        );
        true
    }

    /// Remove every line and persist the empty cart. Returns whether there
    /// was anything to remove.
    pub fn clear(&self) -> bool {
        let summary = {
            let mut inner = self.lock();
            if inner.session.is_empty() {
                return false;
            }
            inner.session.clear();
            tracing::debug!("Cart cleared");
            self.commit(&mut inner);
            summarize(&inner.session)
        };
        self.observers.notify(&CartEvent::Cleared, &summary);
        true
    }

    /// Build the request [`checkout`](Self::checkout) would send, without
    /// sending it.
    pub fn preview_checkout(&self) -> Result<CheckoutRequest, CheckoutError> {
        self.build_request(&self.lock().session)
    }

    fn build_request(&self, session: &CartSession) -> Result<CheckoutRequest, CheckoutError> {
        if session.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let total = session.total()?;
        let email = self.identity.as_ref().and_then(|i| i.customer_email());
        Ok(CheckoutRequest::from_lines(session.lines(), total, email))
    }

    /// Place an order for the cart's contents.
    ///
    /// On success the cart is emptied. On failure nothing changes and the
    /// error is returned as-is; retrying is up to the caller. A retry of an
    /// unchanged cart sends the same idempotency key as the failed attempt.
    /// Only one checkout may be outstanding at a time.
    pub async fn checkout(&self) -> Result<PlacedOrder, CheckoutError> {
        let _in_flight =
            InFlight::acquire(&self.checkout_in_flight).ok_or(CheckoutError::InProgress)?;

        let (request, key) = {
            let mut inner = self.lock();
            let request = self.build_request(&inner.session)?;
            let key = inner
                .pending_key
                .get_or_insert_with(IdempotencyKey::generate)
                .clone();
            (request, key)
        };
        tracing::debug!(
            items = request.items.len(),
            total = request.total_amount,
            idempotency_key = %key,
            "Submitting checkout"
        );

        let order = match self.backend.place_order(&request, &key).await {
            Ok(order) => order,
            Err(e) => {
                tracing::error!(error = %e, idempotency_key = %key, "Checkout failed");
                return Err(e.into());
            }
        };
        tracing::info!(order_id = %order.id, status = %order.status, "Checkout complete");

        let summary = {
            let mut inner = self.lock();
            inner.session.clear();
            self.commit(&mut inner);
            summarize(&inner.session)
        };
        self.observers.notify(
            &CartEvent::CheckedOut {
                order: order.clone(),
            },
            &summary,
        );
        Ok(order)
    }

    /// Re-read the persisted snapshot, replacing the in-memory cart.
    pub fn reload(&self) {
        self.restore();
    }

    /// Load the snapshot into memory and tell observers what happened.
    fn restore(&self) {
        let loaded = match self.snapshots.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(error = %e, "Cart storage unavailable, starting empty");
                SnapshotLoad::Missing
            }
        };

        let (event, summary) = {
            let mut inner = self.lock();
            inner.pending_key = None;
            let event = match loaded {
                SnapshotLoad::Restored { lines, expires_at } => {
                    let (session, dropped) = CartSession::from_lines(lines, self.currency);
                    if dropped > 0 {
                        tracing::warn!(dropped, "Dropped invalid lines from cart snapshot");
                    }
                    let count = session.lines().len();
                    tracing::debug!(lines = count, expires_at, "Cart restored");
                    inner.session = session;
                    inner.expires_at = Some(expires_at);
                    CartEvent::Restored { lines: count }
                }
                SnapshotLoad::Expired => {
                    tracing::info!("Cart snapshot expired, starting empty");
                    inner.session.clear();
                    inner.expires_at = None;
                    CartEvent::Expired
                }
                SnapshotLoad::Corrupt => {
                    tracing::warn!("Cart snapshot unreadable, starting empty");
                    inner.session.clear();
                    inner.expires_at = None;
                    CartEvent::Expired
                }
                SnapshotLoad::Missing => {
                    inner.session.clear();
                    inner.expires_at = None;
                    CartEvent::Restored { lines: 0 }
                }
            };
            (event, summarize(&inner.session))
        };
        self.observers.notify(&event, &summary);
    }

    /// Record a change: forget the pending checkout key and write the
    /// snapshot. Write failures are logged and otherwise ignored.
    fn commit(&self, inner: &mut Inner) {
        inner.pending_key = None;
        match self.snapshots.persist(inner.session.lines()) {
            Ok(expires_at) => inner.expires_at = Some(expires_at),
            Err(e) => tracing::warn!(error = %e, "Failed to persist cart"),
        }
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().session.lines().to_vec()
    }

    pub fn line(&self, product_id: &ProductId) -> Option<CartLine> {
        self.lock().session.line(product_id).cloned()
    }

    pub fn total(&self) -> Result<Money, CommerceError> {
        self.lock().session.total()
    }

    pub fn item_count(&self) -> i64 {
        self.lock().session.item_count()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().session.is_empty()
    }

    pub fn state(&self) -> CartState {
        self.lock().session.state()
    }

    /// Epoch milliseconds at which the persisted snapshot lapses, if one
    /// has been written or restored.
    pub fn expires_at(&self) -> Option<i64> {
        self.lock().expires_at
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_checkout_in_flight(&self) -> bool {
        self.checkout_in_flight.load(Ordering::Acquire)
    }

    /// Register an observer called after every change.
    pub fn subscribe(&self, observer: Arc<dyn CartObserver>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }
}

fn summarize(session: &CartSession) -> CartSummary {
    CartSummary {
        item_count: session.item_count(),
        line_count: session.lines().len(),
        total: session.total().ok(),
    }
}

/// Holds the checkout flag; clears it when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
