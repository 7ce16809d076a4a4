//! Order backend seam.

use crate::checkout::{CheckoutRequest, IdempotencyKey, PlacedOrder};
use async_trait::async_trait;
use shopkit_data::FetchError;
use std::sync::Arc;

/// Something that can turn a checkout request into an order.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Place an order. Repeating a call with the same `key` should not
    /// create a second order on backends that deduplicate.
    async fn place_order(
        &self,
        request: &CheckoutRequest,
        key: &IdempotencyKey,
    ) -> Result<PlacedOrder, FetchError>;
}

#[async_trait]
impl<B: OrderBackend + ?Sized> OrderBackend for Arc<B> {
    async fn place_order(
        &self,
        request: &CheckoutRequest,
        key: &IdempotencyKey,
    ) -> Result<PlacedOrder, FetchError> {
        (**self).place_order(request, key).await
    }
}
