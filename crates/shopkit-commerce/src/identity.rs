//! Capabilities borrowed from the auth layer.

/// Who is shopping, as far as the cart cares.
pub trait CustomerIdentity: Send + Sync {
    /// Contact email of the signed-in customer, if any.
    fn customer_email(&self) -> Option<String>;
}

/// Supplies the bearer token attached to backend calls.
pub trait TokenSource: Send + Sync {
    /// Current bearer token, if signed in.
    fn bearer_token(&self) -> Option<String>;
}

/// A guest: no email, no token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CustomerIdentity for Anonymous {
    fn customer_email(&self) -> Option<String> {
        None
    }
}

impl TokenSource for Anonymous {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// A fixed email, for callers that already know who is checking out.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub String);

impl CustomerIdentity for StaticIdentity {
    fn customer_email(&self) -> Option<String> {
        Some(self.0.clone())
    }
}
