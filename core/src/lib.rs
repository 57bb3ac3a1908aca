//! # Ticket Widget Core
//!
//! Core traits and types for the ticket widget.
//!
//! The widget is built as a small state machine driven by the Reducer pattern:
//!
//! - **State**: the data owned by one form session (cart, customer fields)
//! - **Action**: every input the session reacts to (clicks, keystrokes, submit)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of work to do after the state changed
//! - **Environment**: injected collaborators (clock, submission sink, catalog)
//!
//! Everything here is synchronous. Effects are executed by the runtime in
//! program order, in the same control flow as the action that produced them.
//!
//! ## Example
//!
//! ```
//! use ticket_widget_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Default)]
//! struct Tally {
//!     clicks: u32,
//! }
//!
//! enum TallyAction {
//!     Click,
//! }
//!
//! struct TallyReducer;
//!
//! impl Reducer for TallyReducer {
//!     type State = Tally;
//!     type Action = TallyAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Tally,
//!         action: TallyAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<TallyAction>; 4]> {
//!         match action {
//!             TallyAction::Click => state.clicks += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut tally = Tally::default();
//! TallyReducer.reduce(&mut tally, TallyAction::Click, &());
//! assert_eq!(tally.clicks, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - the core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They hold all business rules and are deterministic and testable without a
/// runtime.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Implementations update `state` in place and return descriptions of
        /// follow-up work. They never perform I/O themselves.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values returned from reducers. The runtime executes them after
/// the state mutation has been observed.
pub mod effect {
    /// Deferred synchronous computation carried by [`Effect::Run`].
    pub type Job<Action> = Box<dyn FnOnce() -> Option<Action>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),

        /// Feed an action straight back into the reducer
        Dispatch(Box<Action>),

        /// Run a synchronous computation outside the reducer
        ///
        /// If it returns `Some`, the action is fed back into the reducer.
        Run(Job<Action>),
    }

    // Manual Debug implementation since closures don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Dispatch(action) => f.debug_tuple("Effect::Dispatch").field(action).finish(),
                Effect::Run(_) => write!(f, "Effect::Run(<job>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Feed `action` back into the reducer
        #[must_use]
        pub fn dispatch(action: Action) -> Effect<Action> {
            Effect::Dispatch(Box::new(action))
        }

        /// Wrap a synchronous job
        #[must_use]
        pub fn run<F>(job: F) -> Effect<Action>
        where
            F: FnOnce() -> Option<Action> + 'static,
        {
            Effect::Run(Box::new(job))
        }

        /// Returns `true` for [`Effect::None`] and for sequences made only of no-ops
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_none),
                Effect::Dispatch(_) | Effect::Run(_) => false,
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// External collaborators are abstracted behind traits and injected via the
/// Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use ticket_widget_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
