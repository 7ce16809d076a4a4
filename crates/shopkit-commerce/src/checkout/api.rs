//! HTTP order API.

use crate::checkout::{CheckoutRequest, IdempotencyKey, OrderBackend, OrderStatus, PlacedOrder};
use crate::client::ApiClient;
use crate::identity::TokenSource;
use crate::ids::OrderId;
use crate::page::Paged;
use async_trait::async_trait;
use serde::Serialize;
use shopkit_data::{FetchClient, FetchError};
use std::sync::Arc;

const ORDERS_PATH: &str = "/orders";

/// Filters for [`OrderApi::list`]. Unset fields are left to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOrders {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub status: Option<OrderStatus>,
}

#[derive(Serialize)]
struct StatusUpdate {
    status: OrderStatus,
}

/// Client for the `/orders` resource.
///
/// `create` and `get` are customer calls; `list` and `update_status` need
/// an admin token.
#[derive(Clone)]
pub struct OrderApi {
    client: ApiClient,
}

impl OrderApi {
    pub fn new(client: FetchClient) -> Self {
        Self {
            client: ApiClient::new(client),
        }
    }

    /// Attach a bearer token source to every call.
    pub fn with_token_source(mut self, token: Arc<dyn TokenSource>) -> Self {
        self.client = self.client.with_token_source(token);
        self
    }

    /// `POST /orders`.
    pub async fn create(
        &self,
        request: &CheckoutRequest,
        key: &IdempotencyKey,
    ) -> Result<PlacedOrder, FetchError> {
        self.client
            .post(ORDERS_PATH)
            .header(IdempotencyKey::HEADER, key.as_str())
            .json(request)?
            .send_json()
            .await
    }

    /// `GET /orders/{id}`.
    pub async fn get(&self, id: &OrderId) -> Result<PlacedOrder, FetchError> {
        self.client
            .get(format!("{ORDERS_PATH}/{id}"))
            .send_json()
            .await
    }

    /// `GET /orders?page=&size=&status=`.
    pub async fn list(&self, filter: &ListOrders) -> Result<Paged<PlacedOrder>, FetchError> {
        let mut builder = self.client.get(ORDERS_PATH);
        if let Some(page) = filter.page {
            builder = builder.query("page", page);
        }
        if let Some(size) = filter.size {
            builder = builder.query("size", size);
        }
        if let Some(status) = filter.status {
            builder = builder.query("status", status.as_str());
        }
        builder.send_json().await
    }

    /// `PUT /orders/{id}/status`.
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<PlacedOrder, FetchError> {
        self.client
            .put(format!("{ORDERS_PATH}/{id}/status"))
            .json(&StatusUpdate { status })?
            .send_json()
            .await
    }
}

#[async_trait]
impl OrderBackend for OrderApi {
    async fn place_order(
        &self,
        request: &CheckoutRequest,
        key: &IdempotencyKey,
    ) -> Result<PlacedOrder, FetchError> {
        let order = self.create(request, key).await?;
        tracing::debug!(order_id = %order.id, status = %order.status, "Order created");
        Ok(order)
    }
}
