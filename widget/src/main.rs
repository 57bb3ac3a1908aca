//! Ticket widget demo binary
//!
//! Loads a catalog, runs a scripted form session and hands the order to a
//! logging sink.

use std::sync::Arc;

use anyhow::Context;
use ticket_widget::{
    CustomerField, EscapingSanitizer, EventCatalog, FormEnvironment, LoggingSink, PaymentField,
    TicketForm, ValidationResult, WidgetConfig, format::format_event_date,
};
use ticket_widget_core::environment::SystemClock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_CATALOG: &str = include_str!("../demo/catalog.json");

fn load_catalog(config: &WidgetConfig) -> anyhow::Result<EventCatalog> {
    match &config.catalog_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            EventCatalog::from_json(&json)
                .with_context(|| format!("parsing catalog {}", path.display()))
        },
        None => EventCatalog::from_json(DEMO_CATALOG).context("parsing built-in demo catalog"),
    }
}

fn main() -> anyhow::Result<()> {
    let config = WidgetConfig::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = load_catalog(&config)?;
    tracing::info!(event = catalog.id(), tiers = catalog.tiers().len(), "Catalog loaded");

    println!("=== {} ===", catalog.name());
    println!("{}", format_event_date(catalog.date()));
    println!("{}", catalog.location());
    println!("{}\n", catalog.description(&EscapingSanitizer));
    for tier in catalog.tiers() {
        println!("  [{}] {} - {} ({})", tier.tier_type, tier.name, tier.cost, tier.description);
    }

    let env = FormEnvironment::new(Arc::new(catalog), Arc::new(SystemClock), Arc::new(LoggingSink));
    let mut form = TicketForm::new(env, &config);

    let mut picks = form
        .catalog()
        .tiers()
        .iter()
        .map(|t| t.tier_type.clone())
        .collect::<Vec<_>>()
        .into_iter();
    if let Some(first) = picks.next() {
        form.increment(first.clone())?;
        form.increment(first)?;
    }
    if let Some(second) = picks.next() {
        form.increment(second.clone())?;
        form.increment(second.clone())?;
        form.decrement(second)?;
    }

    println!("\nCart:");
    for line in form.price_breakdown() {
        println!("  {} x {} = {}", line.quantity, line.tier_type, line.subtotal);
    }
    println!("Total: {}", form.total_cost());

    println!("\n>>> Submitting without customer details");
    if let ValidationResult::Invalid(errors) = form.submit()? {
        for error in errors {
            println!("  - {error}");
        }
    }

    form.set_field(CustomerField::FirstName, "Ada")?;
    form.set_field(CustomerField::LastName, "Lovelace")?;
    form.set_field(CustomerField::Address, "12 St James's Square, London")?;
    form.set_field(PaymentField::CardNumber, "4111 1111 1111 1111")?;
    form.set_field(PaymentField::Expiry, "12/27")?;
    form.set_field(PaymentField::Cvv, "123")?;

    println!("\n>>> Submitting with customer details");
    let result = form.submit()?;
    println!(
        "Valid: {}, orders handed off: {}, outcome: {:?}",
        result.is_valid(),
        form.submissions(),
        form.last_outcome()
    );

    Ok(())
}
