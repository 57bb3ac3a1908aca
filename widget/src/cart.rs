//! The cart: selected quantities per ticket tier.
//!
//! Each tier moves through `Absent → 1 → n → … → 1 → Absent`. A line never
//! holds quantity 0; decrementing the last ticket removes the line. There is
//! no difference between a tier that was removed and one never added.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::catalog::TierType;

/// A tier reference paired with its selected quantity (always ≥ 1)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Tier this line refers to
    #[serde(rename = "type")]
    pub tier_type: TierType,
    /// Number of tickets, never zero
    pub quantity: u32,
}

/// Transition caused by a cart mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was created with quantity 1
    Added,
    /// An existing line grew to the given quantity
    Incremented(u32),
    /// An existing line shrank to the given quantity
    Decremented(u32),
    /// The line was removed
    Removed,
    /// Nothing changed (decrement of an absent tier)
    Unchanged,
}

impl CartChange {
    /// Whether the cart was modified
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// A serialized cart that breaks the cart invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// A line holds quantity 0
    #[error("Cart line '{0}' has quantity 0")]
    ZeroQuantity(TierType),

    /// Two lines share a tier
    #[error("Cart has more than one line for '{0}'")]
    DuplicateLine(TierType),
}

#[derive(Deserialize)]
struct CartDocument {
    lines: Vec<CartLine>,
}

impl TryFrom<CartDocument> for Cart {
    type Error = CartError;

    fn try_from(doc: CartDocument) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(doc.lines.len());
        for line in &doc.lines {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(line.tier_type.clone()));
            }
            if !seen.insert(&line.tier_type) {
                return Err(CartError::DuplicateLine(line.tier_type.clone()));
            }
        }
        Ok(Self { lines: doc.lines })
    }
}

/// Selected (tier, quantity) pairs, at most one line per tier, in insertion order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CartDocument")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one ticket of `tier_type`
    ///
    /// Creates the line if it is absent. There is no upper bound.
    pub fn increment(&mut self, tier_type: &TierType) -> CartChange {
        if let Some(line) = self.line_mut(tier_type) {
            line.quantity = line.quantity.saturating_add(1);
            CartChange::Incremented(line.quantity)
        } else {
            self.lines.push(CartLine {
                tier_type: tier_type.clone(),
                quantity: 1,
            });
            CartChange::Added
        }
    }

    /// Remove one ticket of `tier_type`
    ///
    /// Absent tiers are ignored; a line at quantity 1 is removed.
    pub fn decrement(&mut self, tier_type: &TierType) -> CartChange {
        let Some(index) = self.lines.iter().position(|l| &l.tier_type == tier_type) else {
            return CartChange::Unchanged;
        };

        if self.lines[index].quantity <= 1 {
            self.lines.remove(index);
            CartChange::Removed
        } else {
            self.lines[index].quantity -= 1;
            CartChange::Decremented(self.lines[index].quantity)
        }
    }

    /// Empty the cart
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Current lines, in the order their tiers were first added
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity selected for `tier_type`, 0 if absent
    #[must_use]
    pub fn quantity_of(&self, tier_type: &TierType) -> u32 {
        self.lines
            .iter()
            .find(|l| &l.tier_type == tier_type)
            .map_or(0, |l| l.quantity)
    }

    /// True iff no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct tiers
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Tickets across all tiers
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    fn line_mut(&mut self, tier_type: &TierType) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| &l.tier_type == tier_type)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    fn vip() -> TierType {
        TierType::new("vip")
    }

    #[test]
    fn increments_aggregate_into_one_line() {
        let mut cart = Cart::new();
        assert_eq!(cart.increment(&vip()), CartChange::Added);
        assert_eq!(cart.increment(&vip()), CartChange::Incremented(2));

        assert_eq!(
            cart.lines(),
            &[CartLine {
                tier_type: vip(),
                quantity: 2
            }]
        );
    }

    #[test]
    fn decrement_at_one_removes_the_line() {
        let mut cart = Cart::new();
        cart.increment(&vip());

        assert_eq!(cart.decrement(&vip()), CartChange::Removed);
        assert!(cart.is_empty());
        assert_eq!(cart.quantity_of(&vip()), 0);
    }

    #[test]
    fn decrement_above_one_keeps_the_line() {
        let mut cart = Cart::new();
        cart.increment(&vip());
        cart.increment(&vip());
        cart.increment(&vip());

        assert_eq!(cart.decrement(&vip()), CartChange::Decremented(2));
        assert_eq!(cart.quantity_of(&vip()), 2);
    }

    #[test]
    fn decrement_of_unknown_tier_is_ignored() {
        let mut cart = Cart::new();
        cart.increment(&vip());
        let before = cart.clone();

        let change = cart.decrement(&TierType::new("nonexistent"));

        assert_eq!(change, CartChange::Unchanged);
        assert!(!change.is_change());
        assert_eq!(cart, before);
    }

    #[test]
    fn lines_keep_insertion_order() {
        let mut cart = Cart::new();
        for tier in ["ga", "vip", "ga", "balcony"] {
            cart.increment(&TierType::new(tier));
        }

        let order: Vec<&str> = cart.lines().iter().map(|l| l.tier_type.as_str()).collect();
        assert_eq!(order, vec!["ga", "vip", "balcony"]);
        assert_eq!(cart.len(), 3);
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn re_adding_after_removal_appends_at_the_end() {
        let mut cart = Cart::new();
        cart.increment(&TierType::new("ga"));
        cart.increment(&vip());
        cart.decrement(&TierType::new("ga"));
        cart.increment(&TierType::new("ga"));

        let order: Vec<&str> = cart.lines().iter().map(|l| l.tier_type.as_str()).collect();
        assert_eq!(order, vec!["vip", "ga"]);
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::new();
        cart.increment(&vip());
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn deserializing_rejects_zero_and_duplicate_lines() {
        let broken = serde_json::from_str::<Cart>(
            r#"{"lines":[{"type":"vip","quantity":0},{"type":"vip","quantity":2}]}"#,
        );
        assert!(broken.unwrap_err().to_string().contains("quantity 0"));

        let duplicated = serde_json::from_str::<Cart>(
            r#"{"lines":[{"type":"vip","quantity":1},{"type":"vip","quantity":2}]}"#,
        );
        assert!(duplicated.unwrap_err().to_string().contains("more than one line"));
    }

    #[test]
    fn serialized_cart_reads_back() {
        let mut cart = Cart::new();
        cart.increment(&TierType::new("ga"));
        cart.increment(&vip());
        cart.increment(&vip());

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, cart);
        assert_eq!(restored.quantity_of(&vip()), 2);
    }
}
