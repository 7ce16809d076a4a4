//! HTTP request builder.

use crate::FetchError;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A builder for constructing HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) timeout: Option<Duration>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        let json = serde_json::to_vec(value)?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(json);
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Override the total request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The fully resolved URL (without query string).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters in the order they were added.
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// Look up a header that will be sent.
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_sets_content_type() {
        let builder = RequestBuilder::new(Method::Post, "http://x/orders")
            .json(&serde_json::json!({"a": 1}))
            .unwrap();
        assert_eq!(builder.header_value("content-type"), Some("application/json"));
        assert_eq!(builder.body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
    }

    #[test]
    fn test_bearer_auth() {
        let builder = RequestBuilder::new(Method::Get, "http://x").bearer_auth("tok");
        assert_eq!(builder.header_value("Authorization"), Some("Bearer tok"));
    }

    #[test]
    fn test_query_params_preserve_order() {
        let builder = RequestBuilder::new(Method::Get, "http://x/orders")
            .query("page", 0)
            .query("size", 20);
        assert_eq!(
            builder.query,
            vec![
                ("page".to_string(), "0".to_string()),
                ("size".to_string(), "20".to_string())
            ]
        );
    }

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Put.as_str(), "PUT");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
