//! Event catalog: the read-only description of an event and its ticket tiers.
//!
//! The catalog is supplied by the hosting application and never mutated by the
//! widget. It may be shared between sessions behind an `Arc`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use thiserror::Error;

use crate::format::format_currency;
use crate::sanitize::{HtmlSanitizer, SafeHtml};

/// Key of a ticket tier, unique within a catalog (e.g. `"vip"`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierType(String);

impl TierType {
    /// Creates a new `TierType`
    #[must_use]
    pub fn new(tier_type: impl Into<String>) -> Self {
        Self(tier_type.into())
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TierType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TierType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Money amount in minor currency units (cents)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Creates a new money amount from cents
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the value in cents
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Multiplies by a quantity with overflow checking
    #[must_use]
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    /// Adds two amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Price of `quantity` units at this unit price, clamped at the `i64` bounds
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }
}

// Saturates at the `i64` bounds
impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_currency(*self))
    }
}

/// A purchasable category of ticket with a fixed price
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTier {
    /// Unique key within the catalog
    #[serde(rename = "type")]
    pub tier_type: TierType,
    /// Display name
    pub name: String,
    /// Plain-text description
    pub description: String,
    /// Unit price
    pub cost: Money,
}

impl TicketTier {
    /// Creates a new tier
    #[must_use]
    pub fn new(
        tier_type: impl Into<TierType>,
        name: impl Into<String>,
        description: impl Into<String>,
        cost: Money,
    ) -> Self {
        Self {
            tier_type: tier_type.into(),
            name: name.into(),
            description: description.into(),
            cost,
        }
    }
}

/// Errors raised while loading or building a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The document is not valid catalog JSON
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Two tiers share a type key
    #[error("Duplicate ticket tier '{0}'")]
    DuplicateTier(TierType),

    /// A tier has an empty type key
    #[error("Ticket tier '{name}' has an empty type")]
    EmptyTierType {
        /// Display name of the offending tier
        name: String,
    },

    /// A tier has a negative price
    #[error("Ticket tier '{tier}' has negative cost {cost}")]
    NegativeCost {
        /// The offending tier
        tier: TierType,
        /// Its cost in cents
        cost: i64,
    },
}

/// Wire shape of a catalog, as the host application sends it
#[derive(Deserialize)]
struct CatalogDocument {
    id: String,
    name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    date: DateTime<Utc>,
    location: String,
    #[serde(rename = "description_blurb", default)]
    description_html: String,
    #[serde(rename = "imgUrl", default)]
    image_url: String,
    #[serde(rename = "ticketTypes")]
    tiers: Vec<TicketTier>,
}

/// Immutable description of an event and its ticket tiers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDocument")]
pub struct EventCatalog {
    id: String,
    name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    date: DateTime<Utc>,
    location: String,
    #[serde(rename = "description_blurb")]
    description_html: String,
    #[serde(rename = "imgUrl")]
    image_url: String,
    #[serde(rename = "ticketTypes")]
    tiers: Vec<TicketTier>,
}

impl TryFrom<CatalogDocument> for EventCatalog {
    type Error = CatalogError;

    fn try_from(doc: CatalogDocument) -> Result<Self, Self::Error> {
        validate_tiers(&doc.tiers)?;
        Ok(Self {
            id: doc.id,
            name: doc.name,
            date: doc.date,
            location: doc.location,
            description_html: doc.description_html,
            image_url: doc.image_url,
            tiers: doc.tiers,
        })
    }
}

fn validate_tiers(tiers: &[TicketTier]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(tiers.len());
    for tier in tiers {
        if tier.tier_type.as_str().trim().is_empty() {
            return Err(CatalogError::EmptyTierType {
                name: tier.name.clone(),
            });
        }
        if tier.cost.cents() < 0 {
            return Err(CatalogError::NegativeCost {
                tier: tier.tier_type.clone(),
                cost: tier.cost.cents(),
            });
        }
        if !seen.insert(&tier.tier_type) {
            return Err(CatalogError::DuplicateTier(tier.tier_type.clone()));
        }
    }
    Ok(())
}

impl EventCatalog {
    /// Start building a catalog in code
    #[must_use]
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> CatalogBuilder {
        CatalogBuilder {
            id: id.into(),
            name: name.into(),
            date: DateTime::<Utc>::UNIX_EPOCH,
            location: String::new(),
            description_html: String::new(),
            image_url: String::new(),
            tiers: Vec::new(),
        }
    }

    /// Parse a catalog from the host application's JSON
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] for malformed documents, and the
    /// matching variant when a tier breaks a catalog invariant.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        Self::try_from(doc)
    }

    /// Event identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Event name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// When the event takes place
    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Venue
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Event image
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// The event blurb, passed through `sanitizer`
    ///
    /// The raw markup is never exposed.
    pub fn description<S: HtmlSanitizer + ?Sized>(&self, sanitizer: &S) -> SafeHtml {
        sanitizer.sanitize(&self.description_html)
    }

    /// Tiers in catalog order
    #[must_use]
    pub fn tiers(&self) -> &[TicketTier] {
        &self.tiers
    }

    /// Look up a tier by type
    #[must_use]
    pub fn tier(&self, tier_type: &TierType) -> Option<&TicketTier> {
        self.tiers.iter().find(|tier| &tier.tier_type == tier_type)
    }

    /// Whether the catalog offers `tier_type`
    #[must_use]
    pub fn contains_tier(&self, tier_type: &TierType) -> bool {
        self.tier(tier_type).is_some()
    }
}

/// Builder for [`EventCatalog`]
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    id: String,
    name: String,
    date: DateTime<Utc>,
    location: String,
    description_html: String,
    image_url: String,
    tiers: Vec<TicketTier>,
}

impl CatalogBuilder {
    /// Set the event date
    #[must_use]
    pub const fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Set the venue
    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the (untrusted) HTML blurb
    #[must_use]
    pub fn description_html(mut self, html: impl Into<String>) -> Self {
        self.description_html = html.into();
        self
    }

    /// Set the image URL
    #[must_use]
    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Append a tier
    #[must_use]
    pub fn tier(mut self, tier: TicketTier) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Finish the catalog
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when a tier breaks a catalog invariant.
    pub fn build(self) -> Result<EventCatalog, CatalogError> {
        validate_tiers(&self.tiers)?;
        Ok(EventCatalog {
            id: self.id,
            name: self.name,
            date: self.date,
            location: self.location,
            description_html: self.description_html,
            image_url: self.image_url,
            tiers: self.tiers,
        })
    }
}
