//! Product types.

use crate::catalog::{Category, ProductSnapshot};
use crate::ids::{CategoryId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// Prices are decimal amounts in the store currency, as the backend sends
/// them. [`snapshot`](Self::snapshot) converts to the cart's integer money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    /// Per-unit discount.
    #[serde(default)]
    pub discount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Check if stock is at or below `threshold`.
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock_quantity <= threshold
    }

    /// The cart's copy of this product, priced in `currency`.
    pub fn snapshot(&self, currency: Currency) -> ProductSnapshot {
        ProductSnapshot::new(
            self.id.clone(),
            self.name.clone(),
            Money::from_decimal(self.price, currency),
        )
        .with_discount(Money::from_decimal(self.discount, currency))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CategoryRef {
    id: CategoryId,
}

/// Fields sent when creating or updating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<CategoryRef>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: f64, stock_quantity: i64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            discount: 0.0,
            image_url: None,
            stock_quantity,
            category: None,
        }
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// File the product under an existing category.
    pub fn in_category(mut self, id: impl Into<CategoryId>) -> Self {
        self.category = Some(CategoryRef { id: id.into() });
        self
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            discount: product.discount,
            image_url: product.image_url.clone(),
            stock_quantity: product.stock_quantity,
            category: product.category.as_ref().map(|c| CategoryRef { id: c.id.clone() }),
        }
    }
}
