//! HTTP response handling.

use crate::FetchError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub(crate) async fn from_reqwest(resp: reqwest::Response) -> Result<Self, FetchError> {
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = resp.bytes().await?.to_vec();
        Ok(Self::new(status, headers, body))
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Get a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    ///
    /// The error message is the `message` (or `error`) field of a JSON error
    /// body when the backend sends one, otherwise the raw body text. HTML
    /// error pages (from a proxy in front of the backend) are not echoed.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(FetchError::HttpError {
            status: self.status,
            message: self.error_message(),
        })
    }

    fn error_message(&self) -> String {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&self.body) {
            let field = value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(|m| m.as_str());
            if let Some(message) = field {
                return message.to_string();
            }
        }
        let is_html = self
            .content_type()
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("text/html"));
        match self.text() {
            Ok(text) if !is_html && !text.trim().is_empty() => text,
            _ => format!("HTTP {}", self.status),
        }
    }
}
