//! In-memory cart state.

use crate::cart::line::{clamp_quantity, CartLine};
use crate::catalog::ProductSnapshot;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Whether the cart holds anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartState {
    Empty,
    NonEmpty,
}

/// Result of [`CartSession::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now has `current` units; it had `previous`.
    Updated { previous: i64, current: i64 },
    /// The line was deleted.
    Removed,
    /// No line for that product.
    Missing,
}

/// An ordered list of cart lines, one per product.
///
/// Lines keep insertion order. No two lines share a product id and every
/// line has a quantity of at least one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSession {
    lines: Vec<CartLine>,
    currency: Currency,
}

impl CartSession {
    /// Create an empty session priced in `currency`.
    pub fn new(currency: Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    /// Rebuild a session from persisted lines.
    ///
    /// Lines with a non-positive quantity, a repeated product id or a
    /// foreign currency are dropped. Returns the session and the number of
    /// lines dropped.
    pub fn from_lines(lines: Vec<CartLine>, currency: Currency) -> (Self, usize) {
        let total = lines.len();
        let mut seen = HashSet::new();
        let kept: Vec<CartLine> = lines
            .into_iter()
            .filter(|line| line.quantity > 0)
            .filter(|line| line.product.unit_price.currency == currency)
            .filter(|line| seen.insert(line.product.id.clone()))
            .map(|line| CartLine::new(line.product, line.quantity))
            .collect();
        let dropped = total - kept.len();
        (
            Self {
                lines: kept,
                currency,
            },
            dropped,
        )
    }

    /// Add `quantity` units of `product`.
    ///
    /// Merges into an existing line for the same product. A non-positive
    /// quantity changes nothing and returns `Ok(None)`; otherwise returns the
    /// line's new quantity, capped at the per-line maximum.
    pub fn add(
        &mut self,
        product: ProductSnapshot,
        quantity: i64,
    ) -> Result<Option<i64>, CommerceError> {
        if product.unit_price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.unit_price.currency.code().to_string(),
            });
        }
        if quantity <= 0 {
            return Ok(None);
        }

        if let Some(existing) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            existing.quantity = clamp_quantity(existing.quantity.saturating_add(quantity));
            // Later snapshots carry the current name, price and discount.
            existing.product = product;
            return Ok(Some(existing.quantity));
        }

        let line = CartLine::new(product, quantity);
        let added = line.quantity;
        self.lines.push(line);
        Ok(Some(added))
    }

    /// Replace a line's quantity. Zero or less removes it.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> QuantityChange {
        if quantity <= 0 {
            return if self.remove(product_id) {
                QuantityChange::Removed
            } else {
                QuantityChange::Missing
            };
        }

        match self.lines.iter_mut().find(|l| &l.product.id == product_id) {
            Some(line) => {
                let previous = line.quantity;
                line.quantity = clamp_quantity(quantity);
                QuantityChange::Updated {
                    previous,
                    current: line.quantity,
                }
            }
            None => QuantityChange::Missing,
        }
    }

    /// Remove the line for `product_id`. Returns whether one existed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.product.id != product_id);
        self.lines.len() < len_before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product.id == product_id)
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Sum of unit price times quantity over all lines.
    pub fn total(&self) -> Result<Money, CommerceError> {
        self.lines.iter().try_fold(Money::zero(self.currency), |acc, line| {
            line.line_total()
                .and_then(|t| acc.try_add(&t))
                .ok_or(CommerceError::Overflow)
        })
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn state(&self) -> CartState {
        if self.lines.is_empty() {
            CartState::Empty
        } else {
            CartState::NonEmpty
        }
    }
}

impl Default for CartSession {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::MAX_QUANTITY_PER_LINE;

    fn product(id: &str, cents: i64) -> ProductSnapshot {
        ProductSnapshot::new(id, format!("Product {id}"), Money::new(cents, Currency::USD))
    }

    #[test]
    fn test_add_item() {
        let mut cart = CartSession::new(Currency::USD);
        assert_eq!(cart.add(product("a", 1000), 2).unwrap(), Some(2));
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.state(), CartState::NonEmpty);
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = CartSession::new(Currency::USD);
        cart.add(product("a", 1000), 1).unwrap();
        cart.add(product("a", 1000), 2).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_item_count_over_distinct_products() {
        let mut cart = CartSession::new(Currency::USD);
        let quantities = [1, 4, 2, 7];
        for (i, qty) in quantities.iter().enumerate() {
            cart.add(product(&i.to_string(), 100), *qty).unwrap();
        }
        assert_eq!(cart.item_count(), quantities.iter().sum::<i64>());
    }

    #[test]
    fn test_add_non_positive_is_noop() {
        let mut cart = CartSession::new(Currency::USD);
        assert_eq!(cart.add(product("a", 1000), 0).unwrap(), None);
        assert_eq!(cart.add(product("a", 1000), -3).unwrap(), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_currency_mismatch() {
        let mut cart = CartSession::new(Currency::USD);
        let eur = ProductSnapshot::new("a", "A", Money::new(100, Currency::EUR));
        assert!(matches!(
            cart.add(eur, 1),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_saturates_at_max() {
        let mut cart = CartSession::new(Currency::USD);
        cart.add(product("a", 1), MAX_QUANTITY_PER_LINE - 1).unwrap();
        assert_eq!(
            cart.add(product("a", 1), 5).unwrap(),
            Some(MAX_QUANTITY_PER_LINE)
        );
        cart.add(product("a", 1), i64::MAX).unwrap();
        assert_eq!(cart.item_count(), MAX_QUANTITY_PER_LINE);
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = CartSession::new(Currency::USD);
        cart.add(product("a", 1000), 1).unwrap();

        assert_eq!(
            cart.set_quantity(&ProductId::new("a"), 5),
            QuantityChange::Updated {
                previous: 1,
                current: 5
            }
        );
        assert_eq!(cart.item_count(), 5);
        assert_eq!(
            cart.set_quantity(&ProductId::new("zzz"), 5),
            QuantityChange::Missing
        );
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = CartSession::new(Currency::USD);
        cart.add(product("a", 1000), 1).unwrap();
        assert_eq!(
            cart.set_quantity(&ProductId::new("a"), 0),
            QuantityChange::Removed
        );
        assert_eq!(cart.state(), CartState::Empty);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = CartSession::new(Currency::USD);
        cart.add(product("a", 1000), 1).unwrap();
        assert!(cart.remove(&ProductId::new("a")));
        assert!(!cart.remove(&ProductId::new("a")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total() {
        let mut cart = CartSession::new(Currency::USD);
        cart.add(product("a", 1000), 2).unwrap();
        cart.add(
            product("b", 2000).with_discount(Money::new(500, Currency::USD)),
            1,
        )
        .unwrap();
        // 2*1000 + 1*2000, discounts do not reduce the total
        assert_eq!(cart.total().unwrap().amount_cents, 4000);
    }

    #[test]
    fn test_total_overflow() {
        let mut cart = CartSession::new(Currency::USD);
        cart.add(product("a", i64::MAX / 2), 3).unwrap();
        assert!(matches!(cart.total(), Err(CommerceError::Overflow)));
    }

    #[test]
    fn test_from_lines_normalizes() {
        let lines = vec![
            CartLine {
                product: product("a", 100),
                quantity: 2,
            },
            CartLine {
                product: product("b", 100),
                quantity: 0,
            },
            CartLine {
                product: product("a", 100),
                quantity: 9,
            },
            CartLine {
                product: product("c", 100),
                quantity: 100_000,
            },
        ];
        let (cart, dropped) = CartSession::from_lines(lines, Currency::USD);
        assert_eq!(dropped, 2);
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.line(&ProductId::new("a")).unwrap().quantity, 2);
        assert_eq!(
            cart.line(&ProductId::new("c")).unwrap().quantity,
            MAX_QUANTITY_PER_LINE
        );
    }
}
