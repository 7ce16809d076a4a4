//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The backend refused the email/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The call needs a signed-in user.
    #[error("not signed in")]
    NotAuthenticated,

    /// The call needs an admin.
    #[error("insufficient permissions")]
    InsufficientPermissions,

    /// Request to the auth endpoint failed.
    #[error("auth request failed: {0}")]
    Fetch(#[from] shopkit_data::FetchError),

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] shopkit_cache::CacheError),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            AuthError::InvalidCredentials | AuthError::NotAuthenticated => true,
            AuthError::Fetch(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(self, AuthError::InsufficientPermissions)
    }
}
