//! End-to-end form sessions through the store.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use ticket_widget::{
    CustomerField, EventCatalog, FormAction, FormEnvironment, FormReducer, FormState, FormStore,
    Money, PaymentField, RecordingSink, SubmissionOutcome, TicketForm, TierType, ValidationError,
    WidgetConfig,
};
use ticket_widget_runtime::Store;
use ticket_widget_testing::{FixedClock, SteppingClock, test_instant};

const CATALOG: &str = r#"{
    "id": "evt-42",
    "name": "Harbor Lights Live",
    "date": 1742068800000,
    "location": "Pier 4",
    "description_blurb": "<p>Live</p>",
    "imgUrl": "https://example.com/img.jpg",
    "ticketTypes": [
        { "type": "vip", "name": "VIP", "description": "Front rows", "cost": 5000 },
        { "type": "ga", "name": "General Admission", "description": "Standing", "cost": 2000 }
    ]
}"#;

fn catalog() -> Arc<EventCatalog> {
    Arc::new(EventCatalog::from_json(CATALOG).expect("fixture catalog parses"))
}

fn form_with(sink: &Arc<RecordingSink>) -> TicketForm {
    let env = FormEnvironment::new(catalog(), Arc::new(FixedClock::new(test_instant())), sink.clone());
    TicketForm::new(env, &WidgetConfig::default())
}

fn fill_customer(form: &mut TicketForm) {
    form.set_field(CustomerField::FirstName, "Ada").unwrap();
    form.set_field(CustomerField::LastName, "Lovelace").unwrap();
    form.set_field(CustomerField::Address, "12 St James's Square").unwrap();
    form.set_field(PaymentField::CardNumber, "4111 1111 1111 1111").unwrap();
    form.set_field(PaymentField::Expiry, "12/27").unwrap();
    form.set_field(PaymentField::Cvv, "123").unwrap();
}

#[test]
fn running_total_follows_the_cart() {
    let sink = Arc::new(RecordingSink::new());
    let mut form = form_with(&sink);

    form.increment("vip").unwrap();
    form.increment("vip").unwrap();
    form.increment("ga").unwrap();
    assert_eq!(form.total_cost(), Money::from_cents(12_000));
    assert_eq!(form.total_cost().to_string(), "$120.00");

    form.decrement("vip").unwrap();
    assert_eq!(form.total_cost(), Money::from_cents(7_000));

    form.decrement("ga").unwrap();
    form.decrement("ga").unwrap();
    assert_eq!(form.lines().len(), 1);
    assert_eq!(form.quantity_of(&TierType::new("ga")), 0);

    form.clear_cart().unwrap();
    assert!(form.is_empty());
    assert_eq!(form.total_cost(), Money::ZERO);
}

#[test]
fn empty_cart_blocks_submission() {
    let sink = Arc::new(RecordingSink::new());
    let mut form = form_with(&sink);
    fill_customer(&mut form);

    let result = form.submit().unwrap();

    assert_eq!(result.errors(), &[ValidationError::NoTicketsSelected]);
    assert!(sink.is_empty());
    assert_eq!(form.submissions(), 0);
}

#[test]
fn missing_fields_block_submission() {
    let sink = Arc::new(RecordingSink::new());
    let mut form = form_with(&sink);
    form.increment("ga").unwrap();
    form.set_field(CustomerField::FirstName, "Ada").unwrap();

    let result = form.submit().unwrap();

    assert!(!result.is_valid());
    assert!(
        result
            .errors()
            .contains(&ValidationError::MissingCustomerField(CustomerField::LastName))
    );
    assert!(sink.is_empty());
}

#[test]
fn valid_submission_hands_off_exactly_one_order() {
    let sink = Arc::new(RecordingSink::new());
    let mut form = form_with(&sink);
    form.increment("vip").unwrap();
    form.increment("ga").unwrap();
    form.increment("ga").unwrap();
    fill_customer(&mut form);

    assert!(form.submit().unwrap().is_valid());

    let orders = sink.orders();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.event().id, "evt-42");
    assert_eq!(order.customer().first_name, "Ada");
    assert_eq!(order.created_at(), test_instant());
    assert_eq!(order.ticket_count(), 3);
    assert_eq!(order.total_cost(&catalog()), form.total_cost());
    assert_eq!(form.last_outcome(), Some(SubmissionOutcome::Accepted));
}

#[test]
fn form_keeps_its_state_after_submission() {
    let sink = Arc::new(RecordingSink::new());
    let mut form = form_with(&sink);
    form.increment("vip").unwrap();
    fill_customer(&mut form);

    form.submit().unwrap();
    form.submit().unwrap();

    assert_eq!(sink.len(), 2);
    assert_eq!(form.submissions(), 2);
    assert_eq!(form.quantity_of(&TierType::new("vip")), 1);
}

#[test]
fn rejected_submission_is_reported() {
    let sink = Arc::new(RecordingSink::rejecting("payments offline"));
    let mut form = form_with(&sink);
    form.increment("ga").unwrap();
    fill_customer(&mut form);

    assert!(form.submit().unwrap().is_valid());

    assert_eq!(sink.len(), 1);
    assert_eq!(
        form.last_outcome(),
        Some(SubmissionOutcome::Rejected {
            reason: "payments offline".to_string()
        })
    );
}

#[test]
fn each_order_gets_the_clock_time_of_its_submission() {
    let sink = Arc::new(RecordingSink::new());
    let clock = SteppingClock::new(test_instant(), chrono::Duration::minutes(5));
    let env = FormEnvironment::new(catalog(), Arc::new(clock), sink.clone());
    let mut form = TicketForm::new(env, &WidgetConfig::default());
    form.increment("ga").unwrap();
    fill_customer(&mut form);

    form.submit().unwrap();
    form.submit().unwrap();

    let orders = sink.orders();
    assert_eq!(orders[0].created_at(), test_instant());
    assert_eq!(
        orders[1].created_at(),
        test_instant() + chrono::Duration::minutes(5)
    );
}

#[test]
fn observers_see_every_action_with_the_new_state() {
    let sink = Arc::new(RecordingSink::new());
    let mut form = form_with(&sink);
    let seen: Rc<RefCell<Vec<(String, u32)>>> = Rc::default();

    let log = Rc::clone(&seen);
    let id = form.subscribe(move |action, state| {
        let name = match action {
            FormAction::Increment { .. } => "increment",
            FormAction::Decrement { .. } => "decrement",
            FormAction::SetField { .. } => "set_field",
            FormAction::ClearCart => "clear",
            FormAction::Submit => "submit",
            FormAction::SubmissionCompleted { .. } => "completed",
        };
        let tickets = u32::try_from(state.cart.total_quantity()).unwrap_or(u32::MAX);
        log.borrow_mut().push((name.to_string(), tickets));
    });

    form.increment("vip").unwrap();
    form.increment("vip").unwrap();
    form.decrement("vip").unwrap();
    fill_customer(&mut form);
    form.submit().unwrap();

    {
        let seen = seen.borrow();
        let names: Vec<&str> = seen.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            [
                "increment",
                "increment",
                "decrement",
                "set_field",
                "set_field",
                "set_field",
                "set_field",
                "set_field",
                "set_field",
                "submit",
                "completed",
            ]
        );
        assert_eq!(seen[0].1, 1);
        assert_eq!(seen[1].1, 2);
        assert_eq!(seen[2].1, 1);
    }

    assert!(form.unsubscribe(id));
    form.increment("ga").unwrap();
    assert_eq!(seen.borrow().len(), 11);
}

#[test]
fn unknown_tier_policy_comes_from_config() {
    let sink = Arc::new(RecordingSink::new());
    let lenient = WidgetConfig {
        reject_unknown_tiers: false,
        ..WidgetConfig::default()
    };
    let env = FormEnvironment::new(catalog(), Arc::new(FixedClock::new(test_instant())), sink.clone());
    let mut form = TicketForm::new(env, &lenient);

    form.increment("balcony").unwrap();
    form.increment("vip").unwrap();

    assert_eq!(form.quantity_of(&TierType::new("balcony")), 1);
    // tiers the catalog does not know add nothing to the total
    assert_eq!(form.total_cost(), Money::from_cents(5_000));

    let mut strict = form_with(&sink);
    strict.increment("balcony").unwrap();
    assert!(strict.is_empty());
}

#[test]
fn raw_store_drives_the_same_reducer() {
    let sink = Arc::new(RecordingSink::new());
    let env = FormEnvironment::new(catalog(), Arc::new(FixedClock::new(test_instant())), sink.clone());
    let mut store: FormStore = Store::new(FormState::default(), FormReducer, env);

    store.send(FormAction::increment("ga")).unwrap();
    store.send(FormAction::Submit).unwrap();

    let state = store.into_state();
    assert_eq!(state.errors.len(), 6);
    assert!(sink.is_empty());
}

#[test]
fn zero_feedback_limit_still_completes_the_submission() {
    let sink = Arc::new(RecordingSink::new());
    let config = WidgetConfig {
        max_feedback_actions: 0,
        ..WidgetConfig::default()
    };
    let env = FormEnvironment::new(catalog(), Arc::new(FixedClock::new(test_instant())), sink.clone());
    let mut form = TicketForm::new(env, &config);
    form.increment("ga").unwrap();
    fill_customer(&mut form);

    assert!(form.submit().unwrap().is_valid());

    assert_eq!(sink.len(), 1);
    assert_eq!(form.submissions(), 1);
    assert_eq!(form.last_outcome(), Some(SubmissionOutcome::Accepted));
}

#[test]
fn line_snapshots_are_stable_between_mutations() {
    let sink = Arc::new(RecordingSink::new());
    let mut form = form_with(&sink);
    form.increment("vip").unwrap();
    form.increment("ga").unwrap();

    let first = form.lines();
    let second = form.lines();
    assert_eq!(first, second);
    assert_eq!(form.total_cost(), form.total_cost());

    form.increment("ga").unwrap();
    assert_ne!(form.lines(), first);
}
