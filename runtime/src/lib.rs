//! # Ticket Widget Runtime
//!
//! Runtime implementation for the ticket widget.
//!
//! This crate provides the [`Store`] that coordinates reducer execution and
//! effect handling for a single form session.
//!
//! ## Core Components
//!
//! - **Store**: owns the state, runs the reducer, executes effects
//! - **Observers**: callbacks notified synchronously after every mutation
//! - **Feedback loop**: actions produced by effects are reduced before `send` returns
//!
//! There is exactly one writer: `send` takes `&mut self`, so reads through
//! [`Store::state`] always see the most recent mutation.
//!
//! ## Example
//!
//! ```ignore
//! use ticket_widget_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! store.subscribe(|action, state| tracing::debug!(?action, "state changed"));
//! store.send(Action::DoSomething)?;
//!
//! let value = store.state(|s| s.some_field);
//! ```

use std::collections::VecDeque;
use ticket_widget_core::{effect::Effect, reducer::Reducer};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept feeding actions back past the configured limit
        ///
        /// Usually a reducer cycle: an action whose effects dispatch the same
        /// action again. Actions reduced before the limit was hit stay applied.
        #[error("Effect feedback exceeded {limit} actions in a single send")]
        FeedbackLimitExceeded {
            /// The configured limit
            limit: usize,
        },
    }
}

pub use error::StoreError;

/// Store configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of actions effects may feed back during one `send`
    pub max_feedback_actions: usize,
}

impl StoreConfig {
    /// Default feedback limit
    pub const DEFAULT_MAX_FEEDBACK_ACTIONS: usize = 64;

    /// Override the feedback limit
    #[must_use]
    pub const fn with_max_feedback_actions(mut self, limit: usize) -> Self {
        self.max_feedback_actions = limit;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_feedback_actions: Self::DEFAULT_MAX_FEEDBACK_ACTIONS,
        }
    }
}

/// Handle returned by [`Store::subscribe`], used to remove the observer again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Observer callback: receives the action that was just reduced and the new state
pub type Observer<A, S> = Box<dyn FnMut(&A, &S)>;

/// Store module - the runtime coordinator
pub mod store {
    use super::{Effect, Observer, Reducer, StoreConfig, StoreError, SubscriptionId, VecDeque};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (exclusively owned, mutated only through `send`)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    /// 5. Observers (synchronous change notification)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        config: StoreConfig,
        observers: Vec<(SubscriptionId, Observer<A, S>)>,
        next_subscription: u64,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: Clone + std::fmt::Debug,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new store with an explicit configuration
        #[must_use]
        pub const fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                config,
                observers: Vec::new(),
                next_subscription: 0,
            }
        }

        /// Send an action to the store
        ///
        /// The action is reduced, observers are notified with the new state,
        /// and the returned effects are executed in order. Actions fed back by
        /// effects go through the same cycle before this method returns.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::FeedbackLimitExceeded`] when effects feed back
        /// more actions than [`StoreConfig::max_feedback_actions`].
        #[tracing::instrument(skip_all, name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<(), StoreError> {
            let mut queue = VecDeque::from([action]);
            let mut fed_back = 0_usize;

            while let Some(action) = queue.pop_front() {
                tracing::trace!(?action, "Processing action");
                metrics::counter!("store.actions.total").increment(1);

                let observed = action.clone();
                let effects = self.reducer.reduce(&mut self.state, action, &self.environment);

                for (_, observer) in &mut self.observers {
                    observer(&observed, &self.state);
                }

                let before = queue.len();
                for effect in effects {
                    Self::execute_effect(effect, &mut queue);
                }
                fed_back += queue.len() - before;

                if fed_back > self.config.max_feedback_actions {
                    tracing::error!(
                        limit = self.config.max_feedback_actions,
                        "Effect feedback limit exceeded, dropping {} queued actions",
                        queue.len()
                    );
                    return Err(StoreError::FeedbackLimitExceeded {
                        limit: self.config.max_feedback_actions,
                    });
                }
            }

            Ok(())
        }

        fn execute_effect(effect: Effect<A>, queue: &mut VecDeque<A>) {
            match effect {
                Effect::None => {},
                Effect::Sequential(effects) => {
                    for effect in effects {
                        Self::execute_effect(effect, queue);
                    }
                },
                Effect::Dispatch(action) => {
                    metrics::counter!("store.effects.total").increment(1);
                    queue.push_back(*action);
                },
                Effect::Run(job) => {
                    metrics::counter!("store.effects.total").increment(1);
                    if let Some(action) = job() {
                        queue.push_back(action);
                    }
                },
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let lines = store.state(|s| s.cart.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Register an observer notified after every reduced action
        pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
        where
            F: FnMut(&A, &S) + 'static,
        {
            let id = SubscriptionId(self.next_subscription);
            self.next_subscription += 1;
            self.observers.push((id, Box::new(observer)));
            id
        }

        /// Remove an observer; returns `false` if it was not registered
        pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
            let before = self.observers.len();
            self.observers.retain(|(existing, _)| *existing != id);
            self.observers.len() != before
        }

        /// Consume the store and return its state
        pub fn into_state(self) -> S {
            self.state
        }
    }
}

pub use store::Store;
