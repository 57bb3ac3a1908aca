//! Presentation helpers. Pricing and validation never depend on these.

use chrono::{DateTime, Utc};

use crate::catalog::Money;

/// Render an amount of cents as dollars, e.g. `$120.00`
#[must_use]
pub fn format_currency(amount: Money) -> String {
    let cents = amount.cents();
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

/// Render an event date the way the widget shows it,
/// e.g. `Saturday, March 15, 2025 at 08:00 PM` (UTC)
#[must_use]
pub fn format_event_date(date: DateTime<Utc>) -> String {
    date.format("%A, %B %-d, %Y at %I:%M %p").to_string()
}
