//! Cart line type.

use crate::catalog::ProductSnapshot;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: ProductSnapshot,
    pub quantity: i64,
}

impl CartLine {
    pub(crate) fn new(product: ProductSnapshot, quantity: i64) -> Self {
        Self {
            product,
            quantity: clamp_quantity(quantity),
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price times quantity. None on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.product.unit_price.try_multiply(self.quantity)
    }
}

/// Cap a positive quantity at [`MAX_QUANTITY_PER_LINE`].
pub(crate) fn clamp_quantity(quantity: i64) -> i64 {
    quantity.min(MAX_QUANTITY_PER_LINE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_line_total() {
        let line = CartLine::new(
            ProductSnapshot::new("a", "A", Money::new(1000, Currency::USD)),
            3,
        );
        assert_eq!(line.line_total().unwrap().amount_cents, 3000);
    }

    #[test]
    fn test_line_quantity_capped() {
        let line = CartLine::new(
            ProductSnapshot::new("a", "A", Money::new(1, Currency::USD)),
            50_000,
        );
        assert_eq!(line.quantity, MAX_QUANTITY_PER_LINE);
    }
}
