//! # Ticket Widget
//!
//! Order form for a single event: pick ticket tiers, fill in customer and
//! payment details, submit an order.
//!
//! The host supplies an [`EventCatalog`] (usually parsed from JSON), a
//! [`SubmissionSink`] and a clock, then drives a [`TicketForm`] with UI events.
//!
//! ```
//! use std::sync::Arc;
//! use ticket_widget::{
//!     EventCatalog, FormEnvironment, Money, RecordingSink, TicketForm, TicketTier, WidgetConfig,
//! };
//! use ticket_widget_core::environment::SystemClock;
//!
//! let catalog = EventCatalog::builder("evt-1", "Harbor Lights")
//!     .tier(TicketTier::new("vip", "VIP", "Front rows", Money::from_cents(5000)))
//!     .tier(TicketTier::new("ga", "General Admission", "", Money::from_cents(2000)))
//!     .build()?;
//!
//! let env = FormEnvironment::new(
//!     Arc::new(catalog),
//!     Arc::new(SystemClock),
//!     Arc::new(RecordingSink::new()),
//! );
//! let mut form = TicketForm::new(env, &WidgetConfig::default());
//!
//! form.increment("vip")?;
//! form.increment("vip")?;
//! form.increment("ga")?;
//! assert_eq!(form.total_cost().to_string(), "$120.00");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cart;
pub mod catalog;
pub mod config;
pub mod customer;
pub mod form;
pub mod format;
pub mod order;
pub mod pricing;
pub mod sanitize;
pub mod sink;
pub mod validation;

pub use cart::{Cart, CartChange, CartError, CartLine};
pub use catalog::{CatalogBuilder, CatalogError, EventCatalog, Money, TicketTier, TierType};
pub use config::WidgetConfig;
pub use customer::{CustomerField, CustomerInfo, FormField, PaymentDetails, PaymentField};
pub use form::{FormAction, FormEnvironment, FormReducer, FormState, FormStore, TicketForm};
pub use order::{EventSnapshot, Order, OrderLine, assemble};
pub use sanitize::{EscapingSanitizer, HtmlSanitizer, SafeHtml};
pub use sink::{LoggingSink, RecordingSink, SubmissionOutcome, SubmissionSink};
pub use validation::{ValidationError, ValidationResult, validate};
