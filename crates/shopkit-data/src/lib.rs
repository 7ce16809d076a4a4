//! HTTP client utilities for the ShopKit storefront API.
//!
//! Provides a small builder API over `reqwest` with base-URL joining,
//! default headers, bearer auth and backend error-message extraction.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopkit_data::FetchClient;
//!
//! let client = FetchClient::new().with_base_url("http://localhost:8080/api");
//!
//! // Simple GET request
//! let product: Product = client
//!     .get("/products/123")
//!     .send_json()
//!     .await?;
//!
//! // POST with JSON body
//! let created: Order = client
//!     .post("/orders")
//!     .json(&request)?
//!     .send_json()
//!     .await?;
//! ```

mod error;
mod request;
mod response;

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;

/// Default total timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for making outbound requests.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    timeout: Duration,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
            default_headers: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the default total timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a PUT request.
    pub fn put(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Put, url)
    }

    /// Create a PATCH request.
    pub fn patch(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Patch, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let full_url = self.resolve(url.into());

        let mut builder = RequestBuilder::new(method, full_url).timeout(self.timeout);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            http: self.http.clone(),
            builder,
        }
    }

    fn resolve(&self, url: String) -> String {
        match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                let base = base.trim_end_matches('/');
                if url.starts_with('/') {
                    format!("{}{}", base, url)
                } else {
                    format!("{}/{}", base, url)
                }
            }
            _ => url,
        }
    }
}

/// A request builder bound to a client.
#[derive(Debug)]
pub struct ClientRequestBuilder {
    http: reqwest::Client,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Add a bearer token if one is present.
    pub fn maybe_bearer_auth(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.bearer_auth(token),
            None => self,
        }
    }

    /// Override the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.builder = self.builder.timeout(timeout);
        self
    }

    /// Inspect the request about to be sent.
    pub fn request(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request and return the response, whatever its status.
    pub async fn send(self) -> Result<Response, FetchError> {
        let RequestBuilder {
            method,
            url,
            headers,
            query,
            body,
            timeout,
        } = self.builder;

        let mut request = self.http.request(method.to_reqwest(), &url);
        if !query.is_empty() {
            request = request.query(&query);
        }
        for (key, value) in &headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(%method, %url, error = %e, "request failed");
                return Err(e.into());
            }
        };
        let response = Response::from_reqwest(response).await?;
        tracing::debug!(%method, %url, status = response.status, "request completed");
        Ok(response)
    }

    /// Send the request, fail on non-2xx, and decode the JSON body.
    pub async fn send_json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        self.send().await?.error_for_status()?.json()
    }

    /// Send the request and fail on non-2xx, ignoring the body.
    pub async fn send_empty(self) -> Result<(), FetchError> {
        self.send().await?.error_for_status()?;
        Ok(())
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Response};
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use tokio::net::TcpListener;

    async fn spawn_server() -> String {
        async fn echo(headers: HeaderMap, Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            Json(serde_json::json!({ "auth": auth, "body": body }))
        }

        async fn paged(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
            Json(serde_json::json!({ "page": params.get("page"), "size": params.get("size") }))
        }

        async fn rejected() -> (StatusCode, Json<serde_json::Value>) {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "message": "invalid order" })),
            )
        }

        let api = Router::new()
            .route("/echo", post(echo))
            .route("/paged", get(paged))
            .route("/rejected", post(rejected));
        let app = Router::new().nest("/api", api);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}/api", addr)
    }

    #[test]
    fn test_resolve_joins_base_url() {
        let client = FetchClient::new().with_base_url("http://localhost:8080/api/");
        assert_eq!(
            client.get("/orders").request().url(),
            "http://localhost:8080/api/orders"
        );
        assert_eq!(
            client.get("orders/1").request().url(),
            "http://localhost:8080/api/orders/1"
        );
        assert_eq!(
            client.get("https://other.example/x").request().url(),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_default_headers_applied() {
        let client = FetchClient::new().with_default_header("X-Client", "shopkit");
        let req = client.get("http://localhost/x");
        assert_eq!(req.request().header_value("x-client"), Some("shopkit"));
    }

    #[tokio::test]
    async fn test_send_json_roundtrip() {
        let base = spawn_server().await;
        let client = FetchClient::new().with_base_url(base);

        let reply: serde_json::Value = client
            .post("/echo")
            .bearer_auth("secret")
            .json(&serde_json::json!({ "hello": "world" }))
            .unwrap()
            .send_json()
            .await
            .unwrap();

        assert_eq!(reply["auth"], "Bearer secret");
        assert_eq!(reply["body"]["hello"], "world");
    }

    #[tokio::test]
    async fn test_query_parameters_sent() {
        let base = spawn_server().await;
        let client = FetchClient::new().with_base_url(base);

        let reply: serde_json::Value = client
            .get("/paged")
            .query("page", 2)
            .query("size", 10)
            .send_json()
            .await
            .unwrap();

        assert_eq!(reply["page"], "2");
        assert_eq!(reply["size"], "10");
    }

    #[tokio::test]
    async fn test_http_error_carries_backend_message() {
        let base = spawn_server().await;
        let client = FetchClient::new().with_base_url(base);

        let err = client
            .post("/rejected")
            .json(&serde_json::json!({}))
            .unwrap()
            .send_empty()
            .await
            .unwrap_err();

        match err {
            FetchError::HttpError { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "invalid order");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = FetchClient::new();
        let err = client
            .get(format!("http://{}/nothing", addr))
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::RequestError(_)));
    }
}
