//! Cart change notification.

use crate::checkout::PlacedOrder;
use crate::ids::ProductId;
use crate::money::Money;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// A change to the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    /// Units were added; `quantity` is the line's new quantity.
    ItemAdded { product_id: ProductId, quantity: i64 },
    /// A line's quantity was replaced.
    QuantityChanged {
        product_id: ProductId,
        previous: i64,
        current: i64,
    },
    /// A line was removed.
    ItemRemoved { product_id: ProductId },
    /// Every line was removed.
    Cleared,
    /// A persisted snapshot was loaded.
    Restored { lines: usize },
    /// A persisted snapshot was past its expiration and was discarded.
    Expired,
    /// Checkout succeeded and the cart was emptied.
    CheckedOut { order: PlacedOrder },
}

/// Cart figures as of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    pub item_count: i64,
    pub line_count: usize,
    /// None if the total overflowed.
    pub total: Option<Money>,
}

/// Observer trait for cart events.
pub trait CartObserver: Send + Sync {
    /// Called after the cart changed.
    fn on_cart_event(&self, event: &CartEvent, summary: &CartSummary);
}

impl<F> CartObserver for F
where
    F: Fn(&CartEvent, &CartSummary) + Send + Sync,
{
    fn on_cart_event(&self, event: &CartEvent, summary: &CartSummary) {
        self(event, summary)
    }
}

/// Handle returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The registered observers.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: AtomicU64,
    entries: RwLock<Vec<(SubscriptionId, Arc<dyn CartObserver>)>>,
}

impl Observers {
    pub(crate) fn subscribe(&self, observer: Arc<dyn CartObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let len_before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() < len_before
    }

    /// Call every observer. Observers may subscribe or unsubscribe from
    /// inside the callback.
    pub(crate) fn notify(&self, event: &CartEvent, summary: &CartSummary) {
        let snapshot: Vec<Arc<dyn CartObserver>> = self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in snapshot {
            observer.on_cart_event(event, summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use std::sync::Mutex;

    fn summary() -> CartSummary {
        CartSummary {
            item_count: 0,
            line_count: 0,
            total: Some(Money::zero(Currency::USD)),
        }
    }

    #[test]
    fn test_notify_and_unsubscribe() {
        let observers = Observers::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = observers.subscribe(Arc::new(move |event: &CartEvent, _: &CartSummary| {
            sink.lock().unwrap().push(event.clone());
        }));

        observers.notify(&CartEvent::Cleared, &summary());
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&CartEvent::Expired, &summary());

        assert_eq!(*seen.lock().unwrap(), vec![CartEvent::Cleared]);
    }
}
