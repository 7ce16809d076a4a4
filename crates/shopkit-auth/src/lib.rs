//! Authentication for ShopKit storefront clients.
//!
//! Holds the signed-in user and their bearer token, signs in against the
//! backend, and supplies the customer identity the cart reads at checkout.
//! [`UserApi`] reads and edits the account profile and its addresses.

mod error;
mod profile;
mod session;
mod user;

pub use error::AuthError;
pub use profile::{Address, ProfileUpdate, UserApi};
pub use session::{AuthSession, TOKEN_KEY, USER_KEY};
pub use user::{Role, User};
