//! Backend client shared by the resource APIs.

use crate::identity::TokenSource;
use shopkit_data::{ClientRequestBuilder, FetchClient};
use std::sync::Arc;

/// A [`FetchClient`] that attaches the session's bearer token, when there
/// is one, to every request it builds.
#[derive(Clone)]
pub struct ApiClient {
    client: FetchClient,
    token: Option<Arc<dyn TokenSource>>,
}

impl ApiClient {
    pub fn new(client: FetchClient) -> Self {
        Self {
            client,
            token: None,
        }
    }

    /// Attach a bearer token source to every call.
    pub fn with_token_source(mut self, token: Arc<dyn TokenSource>) -> Self {
        self.token = Some(token);
        self
    }

    fn authorize(&self, builder: ClientRequestBuilder) -> ClientRequestBuilder {
        let token = self.token.as_ref().and_then(|t| t.bearer_token());
        builder.maybe_bearer_auth(token.as_deref())
    }

    pub fn get(&self, path: impl Into<String>) -> ClientRequestBuilder {
        self.authorize(self.client.get(path))
    }

    pub fn post(&self, path: impl Into<String>) -> ClientRequestBuilder {
        self.authorize(self.client.post(path))
    }

    pub fn put(&self, path: impl Into<String>) -> ClientRequestBuilder {
        self.authorize(self.client.put(path))
    }

    pub fn delete(&self, path: impl Into<String>) -> ClientRequestBuilder {
        self.authorize(self.client.delete(path))
    }
}
