//! Total price of a cart against a catalog, in integer cents.
//!
//! A line whose tier is missing from the catalog (a stale reference) prices at
//! zero and is logged. The form reducer refuses to create such lines in the
//! first place, so this only matters for carts built outside of it.

use serde::Serialize;

use crate::cart::{Cart, CartLine};
use crate::catalog::{EventCatalog, Money, TierType};

/// One cart line with its price resolved
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    /// Tier of the line
    #[serde(rename = "type")]
    pub tier_type: TierType,
    /// Tickets selected
    pub quantity: u32,
    /// Catalog unit price, `None` for a stale reference
    pub unit_cost: Option<Money>,
    /// `quantity × unit_cost`, zero for a stale reference
    pub subtotal: Money,
}

/// Cost of a single line; zero when the tier is not in the catalog
#[must_use]
pub fn line_cost(line: &CartLine, catalog: &EventCatalog) -> Money {
    catalog
        .tier(&line.tier_type)
        .map_or(Money::ZERO, |tier| tier.cost.times(line.quantity))
}

/// Sum of `quantity × cost` over all lines
#[must_use]
pub fn total_cost(cart: &Cart, catalog: &EventCatalog) -> Money {
    cart.lines()
        .iter()
        .map(|line| {
            if !catalog.contains_tier(&line.tier_type) {
                tracing::warn!(
                    tier = %line.tier_type,
                    event = catalog.id(),
                    "Cart line references a tier missing from the catalog, pricing it at zero"
                );
            }
            line_cost(line, catalog)
        })
        .sum()
}

/// Per-tier breakdown of the cart, in cart order
#[must_use]
pub fn price_breakdown(cart: &Cart, catalog: &EventCatalog) -> Vec<PricedLine> {
    cart.lines()
        .iter()
        .map(|line| {
            let unit_cost = catalog.tier(&line.tier_type).map(|tier| tier.cost);
            PricedLine {
                tier_type: line.tier_type.clone(),
                quantity: line.quantity,
                unit_cost,
                subtotal: unit_cost.map_or(Money::ZERO, |cost| cost.times(line.quantity)),
            }
        })
        .collect()
}

/// Tiers in the cart that the catalog does not know
#[must_use]
pub fn stale_lines<'a>(cart: &'a Cart, catalog: &EventCatalog) -> Vec<&'a TierType> {
    cart.lines()
        .iter()
        .map(|line| &line.tier_type)
        .filter(|tier_type| !catalog.contains_tier(tier_type))
        .collect()
}
