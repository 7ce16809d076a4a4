//! Cart checkout against the HTTP order API, served in-process.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use shopkit_cache::MemoryStore;
use shopkit_commerce::checkout::{ListOrders, OrderApi, OrderStatus};
use shopkit_commerce::identity::TokenSource;
use shopkit_commerce::prelude::*;
use shopkit_data::{FetchClient, FetchError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Default)]
struct Backend {
    orders: Mutex<Vec<Value>>,
    idempotency_keys: Mutex<Vec<String>>,
    tokens: Mutex<Vec<String>>,
}

type Shared = Arc<Backend>;

fn header(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

async fn create_order(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let items = body["items"].as_array().cloned().unwrap_or_default();
    if items.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "order has no items" })),
        );
    }
    backend
        .idempotency_keys
        .lock()
        .unwrap()
        .push(header(&headers, "idempotency-key"));
    backend
        .tokens
        .lock()
        .unwrap()
        .push(header(&headers, "authorization"));

    let mut orders = backend.orders.lock().unwrap();
    let id = orders.len() as i64 + 1;
    let order_items: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "name": item["productName"],
                "quantity": item["quantity"],
                "price": item["price"],
                "discount": item["discount"],
            })
        })
        .collect();
    let order = json!({
        "id": id,
        "status": "PENDING",
        "totalAmount": body["totalAmount"],
        "customerEmail": body.get("customerEmail"),
        "orderDate": "2025-08-19T10:15:30",
        "orderItems": order_items,
    });
    orders.push(order.clone());
    (StatusCode::CREATED, Json(order))
}

async fn get_order(
    State(backend): State<Shared>,
    Path(id): Path<usize>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let orders = backend.orders.lock().unwrap();
    id.checked_sub(1)
        .and_then(|i| orders.get(i))
        .cloned()
        .map(Json)
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Order not found" })),
        ))
}

async fn list_orders(
    State(backend): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let orders = backend.orders.lock().unwrap();
    let filtered: Vec<Value> = orders
        .iter()
        .filter(|o| match params.get("status") {
            Some(status) => o["status"] == status.as_str(),
            None => true,
        })
        .cloned()
        .collect();
    let size: usize = params.get("size").and_then(|s| s.parse().ok()).unwrap_or(20);
    let page: usize = params.get("page").and_then(|s| s.parse().ok()).unwrap_or(0);
    let content: Vec<Value> = filtered.iter().skip(page * size).take(size).cloned().collect();
    Json(json!({
        "content": content,
        "number": page,
        "size": size,
        "totalElements": filtered.len(),
        "totalPages": filtered.len().div_ceil(size),
    }))
}

async fn update_status(
    State(backend): State<Shared>,
    Path(id): Path<usize>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut orders = backend.orders.lock().unwrap();
    let order = id
        .checked_sub(1)
        .and_then(|i| orders.get_mut(i))
        .ok_or(StatusCode::NOT_FOUND)?;
    order["status"] = body["status"].clone();
    Ok(Json(order.clone()))
}

async fn spawn_backend() -> (String, Shared) {
    let backend: Shared = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/orders", post(create_order).get(list_orders))
        .route("/api/orders/:id", get(get_order))
        .route("/api/orders/:id/status", put(update_status))
        .with_state(Arc::clone(&backend));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{}/api", addr), backend)
}

struct FixedToken(&'static str);

impl TokenSource for FixedToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}

fn mug() -> ProductSnapshot {
    ProductSnapshot::new("1", "Mug", Money::new(1000, Currency::USD))
}

#[tokio::test]
async fn test_checkout_places_order_and_clears_cart() {
    let (base, backend) = spawn_backend().await;
    let api = OrderApi::new(FetchClient::new().with_base_url(base))
        .with_token_source(Arc::new(FixedToken("tok-123")));
    let store = MemoryStore::new();
    let cart = CartSessionManager::builder(store.clone(), Arc::new(api)).load();

    cart.add_item(mug(), 1).unwrap();
    cart.add_item(mug(), 2).unwrap();
    assert_eq!(cart.total().unwrap().amount_cents, 3000);

    let order = cart.checkout().await.unwrap();
    assert_eq!(order.id.as_str(), "1");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, 30.0);
    assert_eq!(order.order_items[0].quantity, 3);
    assert!(cart.is_empty());

    let keys = backend.idempotency_keys.lock().unwrap().clone();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("chk_"));
    assert_eq!(backend.tokens.lock().unwrap()[0], "Bearer tok-123");

    // A fresh manager over the same store sees the emptied cart.
    let api = OrderApi::new(FetchClient::new());
    let reopened = CartSessionManager::builder(store, Arc::new(api)).load();
    assert!(reopened.is_empty());
}

#[tokio::test]
async fn test_backend_rejection_carries_message() {
    let (base, _backend) = spawn_backend().await;
    let api = OrderApi::new(FetchClient::new().with_base_url(base));

    // Bypass the cart's own empty check to see the backend's error surface.
    let err = api
        .create(
            &CheckoutRequest {
                items: Vec::new(),
                total_amount: 0.0,
                customer_email: None,
            },
            &IdempotencyKey::generate(),
        )
        .await
        .unwrap_err();
    match err {
        FetchError::HttpError { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "order has no items");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_backend_keeps_cart() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = OrderApi::new(FetchClient::new().with_base_url(format!("http://{}/api", addr)));
    let cart = CartSessionManager::builder(MemoryStore::new(), Arc::new(api)).load();
    cart.add_item(mug(), 2).unwrap();

    let err = cart.checkout().await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Backend(FetchError::RequestError(_))
    ));
    assert!(err.is_retryable());
    assert_eq!(cart.item_count(), 2);
}

#[tokio::test]
async fn test_order_lookup_listing_and_status_update() {
    let (base, _backend) = spawn_backend().await;
    let api = OrderApi::new(FetchClient::new().with_base_url(base));
    let cart = CartSessionManager::builder(MemoryStore::new(), Arc::new(api.clone())).load();

    for _ in 0..3 {
        cart.add_item(mug(), 1).unwrap();
        cart.checkout().await.unwrap();
    }

    let order = api.get(&OrderId::new("2")).await.unwrap();
    assert_eq!(order.id.as_str(), "2");
    assert!(order.order_date.is_some());

    let missing = api.get(&OrderId::new("99")).await.unwrap_err();
    assert!(missing.is_not_found());

    let shipped = api
        .update_status(&OrderId::new("2"), OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let page = api
        .list(&ListOrders {
            page: Some(0),
            size: Some(2),
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 2);
    assert!(page.has_next());

    let pending = api
        .list(&ListOrders {
            status: Some(OrderStatus::Pending),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(pending.total_elements, 2);
    assert!(pending
        .content
        .iter()
        .all(|o| o.status == OrderStatus::Pending));
}
