//! The form session: cart and customer fields driven by a reducer.
//!
//! UI events become [`FormAction`]s. The reducer mutates [`FormState`]
//! synchronously; observers registered on the store are notified after every
//! action. A valid `Submit` assembles the order and hands it to the sink
//! through a single `Run` effect.

use std::fmt;
use std::sync::Arc;

use ticket_widget_core::environment::Clock;
use ticket_widget_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use ticket_widget_runtime::{Store, StoreError, SubscriptionId};

use crate::cart::{Cart, CartChange, CartLine};
use crate::catalog::{EventCatalog, Money, TierType};
use crate::config::WidgetConfig;
use crate::customer::{CustomerInfo, FormField};
use crate::order::assemble;
use crate::pricing::{self, PricedLine};
use crate::sink::{SubmissionOutcome, SubmissionSink};
use crate::validation::{ValidationError, ValidationResult, validate};

/// State owned by one form session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    /// Selected tickets
    pub cart: Cart,
    /// Customer and payment fields
    pub customer: CustomerInfo,
    /// Problems found by the last submit attempt
    pub errors: Vec<ValidationError>,
    /// Orders handed to the sink
    pub submissions: u32,
    /// What the sink answered last time
    pub last_outcome: Option<SubmissionOutcome>,
}

/// Everything the form reacts to
#[derive(Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Add one ticket of a tier
    Increment {
        /// Tier to add
        tier_type: TierType,
    },
    /// Remove one ticket of a tier
    Decrement {
        /// Tier to remove
        tier_type: TierType,
    },
    /// Edit a customer or payment field
    SetField {
        /// Field being edited
        field: FormField,
        /// New value
        value: String,
    },
    /// Remove every ticket
    ClearCart,
    /// Validate and, if valid, submit the order
    Submit,
    /// The sink answered (fed back by the submit effect)
    SubmissionCompleted {
        /// Sink response
        outcome: SubmissionOutcome,
    },
}

impl FormAction {
    /// `Increment` for `tier_type`
    #[must_use]
    pub fn increment(tier_type: impl Into<TierType>) -> Self {
        Self::Increment {
            tier_type: tier_type.into(),
        }
    }

    /// `Decrement` for `tier_type`
    #[must_use]
    pub fn decrement(tier_type: impl Into<TierType>) -> Self {
        Self::Decrement {
            tier_type: tier_type.into(),
        }
    }

    /// `SetField` for `field`
    #[must_use]
    pub fn set_field(field: impl Into<FormField>, value: impl Into<String>) -> Self {
        Self::SetField {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether the action can change the cart
    #[must_use]
    pub const fn touches_cart(&self) -> bool {
        matches!(
            self,
            Self::Increment { .. } | Self::Decrement { .. } | Self::ClearCart
        )
    }
}

// Payment values must not reach the logs through `?action`
impl fmt::Debug for FormAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increment { tier_type } => {
                f.debug_struct("Increment").field("tier_type", tier_type).finish()
            },
            Self::Decrement { tier_type } => {
                f.debug_struct("Decrement").field("tier_type", tier_type).finish()
            },
            Self::SetField { field, value } => {
                let shown: &dyn fmt::Debug = match field {
                    FormField::Payment(_) => &"***",
                    FormField::Customer(_) => value,
                };
                f.debug_struct("SetField")
                    .field("field", field)
                    .field("value", shown)
                    .finish()
            },
            Self::ClearCart => f.write_str("ClearCart"),
            Self::Submit => f.write_str("Submit"),
            Self::SubmissionCompleted { outcome } => f
                .debug_struct("SubmissionCompleted")
                .field("outcome", outcome)
                .finish(),
        }
    }
}

/// Injected collaborators of a form session
#[derive(Clone)]
pub struct FormEnvironment {
    /// Catalog being sold, shared read-only
    pub catalog: Arc<EventCatalog>,
    /// Source of `createdAt`
    pub clock: Arc<dyn Clock>,
    /// Where assembled orders go
    pub sink: Arc<dyn SubmissionSink>,
    /// Refuse `Increment` for tiers the catalog does not offer
    pub reject_unknown_tiers: bool,
}

impl FormEnvironment {
    /// Creates a new form environment
    pub fn new(
        catalog: Arc<EventCatalog>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn SubmissionSink>,
    ) -> Self {
        Self {
            catalog,
            clock,
            sink,
            reject_unknown_tiers: true,
        }
    }

    /// Set the unknown-tier policy
    #[must_use]
    pub const fn with_reject_unknown_tiers(mut self, reject: bool) -> Self {
        self.reject_unknown_tiers = reject;
        self
    }
}

/// Reducer implementing the form's business rules
#[derive(Clone, Copy, Debug, Default)]
pub struct FormReducer;

impl FormReducer {
    fn log_cart_change(tier_type: &TierType, change: CartChange) {
        if change.is_change() {
            tracing::debug!(tier = %tier_type, ?change, "Cart changed");
        } else {
            tracing::trace!(tier = %tier_type, "Decrement of absent tier ignored");
        }
    }

    fn submit(state: &mut FormState, env: &FormEnvironment) -> SmallVec<[Effect<FormAction>; 4]> {
        match validate(&state.cart, &state.customer) {
            ValidationResult::Invalid(errors) => {
                tracing::warn!(?errors, "Submission blocked by validation");
                state.errors = errors;
                smallvec![Effect::None]
            },
            ValidationResult::Valid => {
                state.errors.clear();
                let order = assemble(&state.cart, &state.customer, &env.catalog, env.clock.now());
                let sink = Arc::clone(&env.sink);
                smallvec![Effect::run(move || {
                    Some(FormAction::SubmissionCompleted {
                        outcome: sink.submit(order),
                    })
                })]
            },
        }
    }
}

impl Reducer for FormReducer {
    type State = FormState;
    type Action = FormAction;
    type Environment = FormEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            FormAction::Increment { tier_type } => {
                if env.reject_unknown_tiers && !env.catalog.contains_tier(&tier_type) {
                    tracing::warn!(
                        tier = %tier_type,
                        event = env.catalog.id(),
                        "Refusing to add a tier the catalog does not offer"
                    );
                    return smallvec![Effect::None];
                }
                let change = state.cart.increment(&tier_type);
                Self::log_cart_change(&tier_type, change);
            },
            FormAction::Decrement { tier_type } => {
                let change = state.cart.decrement(&tier_type);
                Self::log_cart_change(&tier_type, change);
            },
            FormAction::SetField { field, value } => {
                state.customer.set(field, value);
            },
            FormAction::ClearCart => {
                state.cart.clear();
                tracing::debug!("Cart cleared");
            },
            FormAction::Submit => return Self::submit(state, env),
            FormAction::SubmissionCompleted { outcome } => {
                state.submissions += 1;
                match &outcome {
                    SubmissionOutcome::Accepted => {
                        tracing::info!(submissions = state.submissions, "Order handed off");
                    },
                    SubmissionOutcome::Rejected { reason } => {
                        tracing::warn!(%reason, "Submission sink rejected the order");
                    },
                }
                state.last_outcome = Some(outcome);
            },
        }

        smallvec![Effect::None]
    }
}

/// Store running a form session
pub type FormStore = Store<FormState, FormAction, FormEnvironment, FormReducer>;

/// Observer that logs the cart after every cart action
pub fn cart_logger() -> impl FnMut(&FormAction, &FormState) + 'static {
    |action, state| {
        if action.touches_cart() {
            tracing::debug!(lines = ?state.cart.lines(), "Updated order items");
        }
    }
}

/// A ticket form bound to one catalog: the host-facing API of the widget
pub struct TicketForm {
    store: FormStore,
}

impl TicketForm {
    /// Start an empty session
    #[must_use]
    pub fn new(env: FormEnvironment, config: &WidgetConfig) -> Self {
        let env = env.with_reject_unknown_tiers(config.reject_unknown_tiers);
        let mut store =
            Store::with_config(FormState::default(), FormReducer, env, config.store_config());
        store.subscribe(cart_logger());
        Self { store }
    }

    /// Add one ticket of `tier_type`
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the runtime.
    pub fn increment(&mut self, tier_type: impl Into<TierType>) -> Result<(), StoreError> {
        self.store.send(FormAction::increment(tier_type))
    }

    /// Remove one ticket of `tier_type`; absent tiers are ignored
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the runtime.
    pub fn decrement(&mut self, tier_type: impl Into<TierType>) -> Result<(), StoreError> {
        self.store.send(FormAction::decrement(tier_type))
    }

    /// Edit a customer or payment field
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the runtime.
    pub fn set_field(
        &mut self,
        field: impl Into<FormField>,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.store.send(FormAction::set_field(field, value))
    }

    /// Remove every ticket
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the runtime.
    pub fn clear_cart(&mut self) -> Result<(), StoreError> {
        self.store.send(FormAction::ClearCart)
    }

    /// Validate and submit
    ///
    /// `Valid` means the order was handed to the sink; see
    /// [`TicketForm::last_outcome`] for its answer.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the runtime.
    pub fn submit(&mut self) -> Result<ValidationResult, StoreError> {
        self.store.send(FormAction::Submit)?;
        Ok(self.store.state(|s| {
            if s.errors.is_empty() {
                ValidationResult::Valid
            } else {
                ValidationResult::Invalid(s.errors.clone())
            }
        }))
    }

    /// Snapshot of the cart lines
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.store.state(|s| s.cart.lines().to_vec())
    }

    /// Quantity selected for `tier_type`
    #[must_use]
    pub fn quantity_of(&self, tier_type: &TierType) -> u32 {
        self.store.state(|s| s.cart.quantity_of(tier_type))
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.state(|s| s.cart.is_empty())
    }

    /// Running total
    #[must_use]
    pub fn total_cost(&self) -> Money {
        let catalog = &self.store.environment().catalog;
        self.store.state(|s| pricing::total_cost(&s.cart, catalog))
    }

    /// Per-tier breakdown of the running total
    #[must_use]
    pub fn price_breakdown(&self) -> Vec<PricedLine> {
        let catalog = &self.store.environment().catalog;
        self.store.state(|s| pricing::price_breakdown(&s.cart, catalog))
    }

    /// Current customer fields
    #[must_use]
    pub fn customer(&self) -> CustomerInfo {
        self.store.state(|s| s.customer.clone())
    }

    /// Orders handed to the sink so far
    #[must_use]
    pub fn submissions(&self) -> u32 {
        self.store.state(|s| s.submissions)
    }

    /// The sink's last answer
    #[must_use]
    pub fn last_outcome(&self) -> Option<SubmissionOutcome> {
        self.store.state(|s| s.last_outcome.clone())
    }

    /// Catalog this form sells
    #[must_use]
    pub fn catalog(&self) -> &EventCatalog {
        &self.store.environment().catalog
    }

    /// Register a change observer
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&FormAction, &FormState) + 'static,
    {
        self.store.subscribe(observer)
    }

    /// Remove a change observer
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}
