//! Product data as the cart sees it.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The slice of a catalog product copied into a cart line.
///
/// The cart never fetches products; callers hand it a snapshot taken from
/// whatever catalog view they are showing, usually via
/// [`Product::snapshot`](crate::catalog::Product::snapshot). `discount` is
/// forwarded to the order backend and does not change the cart total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub discount: Money,
}

impl ProductSnapshot {
    /// Snapshot with no discount.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            discount: Money::zero(unit_price.currency),
        }
    }

    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount = discount;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_snapshot_wire_shape() {
        let p = ProductSnapshot::new("12", "Mug", Money::new(1250, Currency::USD))
            .with_discount(Money::new(100, Currency::USD));
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["id"], "12");
        assert_eq!(json["unitPrice"]["amount_cents"], 1250);
        assert_eq!(json["discount"]["amount_cents"], 100);
    }
}
