//! Order assembly.
//!
//! An [`Order`] is built once per successful submission and never changes
//! afterwards. Lines carry only tier type and quantity; prices are derived
//! again from the catalog whenever they are needed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cart::{Cart, CartLine};
use crate::catalog::{EventCatalog, Money, TierType};
use crate::customer::CustomerInfo;
use crate::format::format_event_date;

/// Event details captured when the order was assembled
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    /// Event identifier
    pub id: String,
    /// Event name
    pub name: String,
    /// Event date, serialized as epoch milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    /// Human readable event date
    pub formatted_date: String,
    /// Venue
    pub location: String,
}

impl EventSnapshot {
    /// Capture the identifying fields of `catalog`
    #[must_use]
    pub fn of(catalog: &EventCatalog) -> Self {
        Self {
            id: catalog.id().to_string(),
            name: catalog.name().to_string(),
            date: catalog.date(),
            formatted_date: format_event_date(catalog.date()),
            location: catalog.location().to_string(),
        }
    }
}

/// Ordered quantity of one tier
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    /// Tier ordered
    #[serde(rename = "type")]
    pub tier_type: TierType,
    /// Tickets ordered
    pub quantity: u32,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            tier_type: line.tier_type.clone(),
            quantity: line.quantity,
        }
    }
}

/// The finalized, immutable record handed to the submission sink
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    customer: CustomerInfo,
    event: EventSnapshot,
    #[serde(rename = "ticketsByType")]
    lines: Vec<OrderLine>,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Customer and payment details as submitted
    #[must_use]
    pub const fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    /// Event captured at assembly time
    #[must_use]
    pub const fn event(&self) -> &EventSnapshot {
        &self.event
    }

    /// Ordered tiers, in cart order
    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// When the order was assembled
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Tickets across all lines
    #[must_use]
    pub fn ticket_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Re-derive the order total from a catalog; unknown tiers price at zero
    #[must_use]
    pub fn total_cost(&self, catalog: &EventCatalog) -> Money {
        self.lines
            .iter()
            .map(|line| {
                catalog
                    .tier(&line.tier_type)
                    .map_or(Money::ZERO, |tier| tier.cost.times(line.quantity))
            })
            .sum()
    }

    /// The submission payload as JSON
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization errors.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Build the order for a validated submission
///
/// Performs no validation: callers must have obtained
/// [`ValidationResult::Valid`](crate::validation::ValidationResult::Valid) first.
#[must_use]
pub fn assemble(
    cart: &Cart,
    customer: &CustomerInfo,
    catalog: &EventCatalog,
    now: DateTime<Utc>,
) -> Order {
    Order {
        customer: customer.clone(),
        event: EventSnapshot::of(catalog),
        lines: cart.lines().iter().map(OrderLine::from).collect(),
        created_at: now,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::catalog::TicketTier;
    use crate::customer::{CustomerField, PaymentField};
    use ticket_widget_testing::test_instant;

    fn catalog() -> EventCatalog {
        EventCatalog::builder("evt-7", "Harbor Lights")
            .date(test_instant() + chrono::Duration::days(30))
            .location("Pier 4")
            .tier(TicketTier::new("ga", "General Admission", "", Money::from_cents(2000)))
            .tier(TicketTier::new("vip", "VIP", "", Money::from_cents(5000)))
            .build()
            .expect("valid catalog")
    }

    fn customer() -> CustomerInfo {
        let mut customer = CustomerInfo::default();
        customer.set(CustomerField::FirstName.into(), "Grace");
        customer.set(CustomerField::LastName.into(), "Hopper");
        customer.set(CustomerField::Address.into(), "1 Navy Way");
        customer.set(PaymentField::CardNumber.into(), "5500 0000 0000 0004");
        customer.set(PaymentField::Expiry.into(), "01/28");
        customer.set(PaymentField::Cvv.into(), "321");
        customer
    }

    #[test]
    fn lines_carry_type_and_quantity_only() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.increment(&TierType::new("ga"));
        }

        let order = assemble(&cart, &customer(), &catalog(), test_instant());

        assert_eq!(
            order.lines(),
            &[OrderLine {
                tier_type: TierType::new("ga"),
                quantity: 3
            }]
        );
        assert_eq!(order.event().id, "evt-7");
        assert_eq!(order.event().location, "Pier 4");
        assert_eq!(order.created_at(), test_instant());
        assert_eq!(order.ticket_count(), 3);
        assert_eq!(order.total_cost(&catalog()), Money::from_cents(6000));
    }

    #[test]
    fn later_cart_changes_do_not_touch_the_order() {
        let mut cart = Cart::new();
        cart.increment(&TierType::new("vip"));
        let order = assemble(&cart, &customer(), &catalog(), test_instant());

        cart.increment(&TierType::new("vip"));
        cart.increment(&TierType::new("ga"));

        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.lines()[0].quantity, 1);
    }

    #[test]
    fn payload_matches_submission_shape() {
        let mut cart = Cart::new();
        cart.increment(&TierType::new("vip"));
        cart.increment(&TierType::new("ga"));
        let order = assemble(&cart, &customer(), &catalog(), test_instant());

        let json: serde_json::Value =
            serde_json::from_str(&order.to_json().unwrap()).unwrap();

        assert_eq!(json["customer"]["lastName"], "Hopper");
        assert_eq!(json["customer"]["paymentMethod"]["creditCard"], "5500 0000 0000 0004");
        assert_eq!(json["event"]["id"], "evt-7");
        assert_eq!(json["event"]["date"], catalog().date().timestamp_millis());
        assert_eq!(json["event"]["formattedDate"], "Friday, January 31, 2025 at 12:00 AM");
        assert_eq!(json["ticketsByType"][0]["type"], "vip");
        assert_eq!(json["ticketsByType"][1]["quantity"], 1);
        assert!(json["ticketsByType"][0].get("cost").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
