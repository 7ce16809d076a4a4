//! Client-held auth session.

use crate::user::User;
use crate::AuthError;
use serde::{Deserialize, Serialize};
use shopkit_cache::{Cache, KeyValueStore};
use shopkit_commerce::identity::{CustomerIdentity, TokenSource};
use shopkit_data::{FetchClient, FetchError};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key for the signed-in user's profile.
pub const USER_KEY: &str = "user";

const LOGIN_PATH: &str = "/auth/login";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    user: User,
    token: String,
}

#[derive(Default)]
struct State {
    user: Option<User>,
    token: Option<String>,
}

/// The current user's identity and bearer token.
///
/// Login and logout update memory first and storage second. A storage
/// failure is logged and does not undo the in-memory change.
pub struct AuthSession<S> {
    client: FetchClient,
    cache: Cache<S>,
    state: RwLock<State>,
}

impl<S: KeyValueStore> AuthSession<S> {
    /// Create a session and pick up a user persisted by an earlier process.
    pub fn new(client: FetchClient, store: S) -> Self {
        let cache = Cache::new(store);
        let user = match cache.get::<User>(USER_KEY) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Stored user unreadable");
                None
            }
        };
        Self {
            client,
            cache,
            state: RwLock::new(State { user, token: None }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let response: LoginResponse = self
            .client
            .post(LOGIN_PATH)
            .json(&LoginRequest { email, password })?
            .send_json()
            .await
            .map_err(|e| match e {
                FetchError::HttpError { status: 401, .. } => AuthError::InvalidCredentials,
                other => AuthError::Fetch(other),
            })?;

        {
            let mut state = self.write();
            state.user = Some(response.user.clone());
            state.token = Some(response.token.clone());
        }
        if let Err(e) = self.cache.store().set(TOKEN_KEY, &response.token) {
            tracing::warn!(error = %e, "Failed to persist auth token");
        }
        if let Err(e) = self.cache.set(USER_KEY, &response.user) {
            tracing::warn!(error = %e, "Failed to persist user");
        }
        tracing::info!(user = %response.user.username, role = response.user.role.as_str(), "Signed in");
        Ok(response.user)
    }

    /// Forget the user and token, in memory and in storage.
    pub fn logout(&self) {
        {
            let mut state = self.write();
            state.user = None;
            state.token = None;
        }
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.cache.delete(key) {
                tracing::warn!(error = %e, key, "Failed to remove auth entry");
            }
        }
        tracing::debug!("Signed out");
    }

    /// Replace the signed-in user's profile after the backend changed it.
    pub fn set_user(&self, user: User) {
        if let Err(e) = self.cache.set(USER_KEY, &user) {
            tracing::warn!(error = %e, "Failed to persist user");
        }
        self.write().user = Some(user);
    }

    /// The bearer token: the in-memory one, else the persisted one.
    pub fn token(&self) -> Option<String> {
        if let Some(token) = self.read().token.clone() {
            return Some(token);
        }
        match self.cache.store().get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read auth token");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_admin(&self) -> bool {
        self.read().user.as_ref().is_some_and(User::is_admin)
    }

    /// The signed-in user, or `NotAuthenticated`.
    pub fn require_user(&self) -> Result<User, AuthError> {
        if !self.is_authenticated() {
            return Err(AuthError::NotAuthenticated);
        }
        self.user().ok_or(AuthError::NotAuthenticated)
    }

    /// The signed-in user if they are an admin.
    pub fn require_admin(&self) -> Result<User, AuthError> {
        let user = self.require_user()?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }
}

impl<S: KeyValueStore> CustomerIdentity for AuthSession<S> {
    fn customer_email(&self) -> Option<String> {
        self.read().user.as_ref().map(|u| u.email.clone())
    }
}

impl<S: KeyValueStore> TokenSource for AuthSession<S> {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}
