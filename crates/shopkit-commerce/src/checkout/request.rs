//! Checkout request assembly.

use crate::cart::CartLine;
use crate::ids::ProductId;
use crate::money::Money;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

/// One line of a checkout request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub discount: f64,
}

impl CheckoutRequest {
    /// Build a request from cart lines and their precomputed total.
    pub fn from_lines(lines: &[CartLine], total: Money, customer_email: Option<String>) -> Self {
        let items = lines
            .iter()
            .map(|line| CheckoutItem {
                product_id: line.product.id.clone(),
                product_name: line.product.name.clone(),
                quantity: line.quantity,
                price: line.product.unit_price.to_decimal(),
                discount: line.product.discount.to_decimal(),
            })
            .collect();
        Self {
            items,
            total_amount: total.to_decimal(),
            customer_email,
        }
    }
}

/// Per-attempt token sent as the `Idempotency-Key` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Header carrying the key.
    pub const HEADER: &'static str = "Idempotency-Key";

    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 18];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(format!("chk_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
