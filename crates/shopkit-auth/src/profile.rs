//! Account profile and addresses.

use crate::user::User;
use serde::{Deserialize, Serialize};
use shopkit_commerce::client::ApiClient;
use shopkit_commerce::identity::TokenSource;
use shopkit_commerce::ids::{AddressId, UserId};
use shopkit_data::{FetchClient, FetchError};
use std::sync::Arc;

const USERS_PATH: &str = "/users";

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Address ID (None for unsaved addresses).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            street: street.into(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
            country: country.into(),
        }
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        [
            self.street.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.postal_code.as_str(),
            self.country.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Profile fields to change. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Client for the `/users` resource.
#[derive(Clone)]
pub struct UserApi {
    client: ApiClient,
}

impl UserApi {
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

    /// `GET /users/{id}`.
    pub async fn get(&self, id: &UserId) -> Result<User, FetchError> {
        self.client
            .get(format!("{USERS_PATH}/{id}"))
            .send_json()
            .await
    }

    /// `GET /users/username/{username}`.
    pub async fn by_username(&self, username: &str) -> Result<User, FetchError> {
        self.client
            .get(format!("{USERS_PATH}/username/{username}"))
            .send_json()
            .await
    }

    /// `PUT /users/{id}` with the fields that change.
    pub async fn update(&self, id: &UserId, update: &ProfileUpdate) -> Result<User, FetchError> {
        let user: User = self
            .client
            .put(format!("{USERS_PATH}/{id}"))
            .json(update)?
            .send_json()
            .await?;
        tracing::debug!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AuthSession, TOKEN_KEY};
    use axum::{
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use shopkit_cache::{KeyValueStore, MemoryStore};
    use std::sync::Mutex;
    use tokio::net::TcpListener;

    type Stored = Arc<Mutex<Value>>;

    async fn by_username(
        State(user): State<Stored>,
        Path(name): Path<String>,
    ) -> Result<Json<Value>, StatusCode> {
        let user = user.lock().unwrap().clone();
        if user["username"] == name.as_str() {
            Ok(Json(user))
        } else {
            Err(StatusCode::NOT_FOUND)
        }
    }

    async fn get_user(State(user): State<Stored>) -> Json<Value> {
        Json(user.lock().unwrap().clone())
    }

    async fn update_user(
        State(user): State<Stored>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Json<Value>, StatusCode> {
        if headers.get("authorization").is_none() {
            return Err(StatusCode::UNAUTHORIZED);
        }
        let mut user = user.lock().unwrap();
        if let (Some(target), Some(fields)) = (user.as_object_mut(), body.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(Json(user.clone()))
    }

    async fn spawn_server() -> String {
        let user: Stored = Arc::new(Mutex::new(json!({
            "id": 7,
            "username": "ada",
            "password": "$2a$10$...",
            "email": "ada@example.com",
            "role": "customer"
        })));
        let app = Router::new()
            .route("/api/users/:id", get(get_user).put(update_user))
            .route("/api/users/username/:name", get(by_username))
            .with_state(user);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}/api", addr)
    }

    fn home() -> Address {
        Address::new("1 Loop Rd", "Springfield", "IL", "62701", "US")
    }

    #[test]
    fn test_one_line_skips_blank_parts() {
        let mut address = home();
        assert_eq!(address.one_line(), "1 Loop Rd, Springfield, IL, 62701, US");
        address.state.clear();
        assert_eq!(address.one_line(), "1 Loop Rd, Springfield, 62701, US");
    }

    #[test]
    fn test_update_sends_only_set_fields() {
        let update = ProfileUpdate {
            phone_number: Some("555-0100".to_string()),
            ..ProfileUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, json!({ "phoneNumber": "555-0100" }));
        assert!(ProfileUpdate::default().is_empty());
        assert!(!update.is_empty());
    }

    #[tokio::test]
    async fn test_profile_lookup_and_address_update() {
        let base = spawn_server().await;
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "jwt-abc").unwrap();
        let session = Arc::new(AuthSession::new(FetchClient::new(), store));
        let api = UserApi::new(FetchClient::new().with_base_url(&base)).with_token_source(session);

        let user = api.by_username("ada").await.unwrap();
        assert_eq!(user.id.as_str(), "7");
        assert!(user.shipping_address.is_none());

        let updated = api
            .update(
                &user.id,
                &ProfileUpdate {
                    shipping_address: Some(home()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.shipping_address, Some(home()));
        assert_eq!(updated.email, "ada@example.com");

        let err = api.by_username("bo").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_without_token_is_unauthorized() {
        let api = UserApi::new(FetchClient::new().with_base_url(spawn_server().await));
        let err = api
            .update(&UserId::new("7"), &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }
}
