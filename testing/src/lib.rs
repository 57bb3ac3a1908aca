//! # Ticket Widget Testing
//!
//! Testing utilities and helpers for the ticket widget.
//!
//! This crate provides:
//! - Deterministic clocks for timestamped records
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Assertion helpers for effect lists
//!
//! ## Example
//!
//! ```ignore
//! use ticket_widget_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(FormReducer)
//!     .with_env(environment(test_clock()))
//!     .given_state(FormState::default())
//!     .when_action(FormAction::increment("vip"))
//!     .then_state(|state| assert_eq!(state.cart.quantity_of(&"vip".into()), 1))
//!     .run();
//! ```

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;
use ticket_widget_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, Mutex, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ticket_widget_testing::mocks::FixedClock;
    /// use ticket_widget_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step every time it is read
    ///
    /// Useful when a test needs distinct, ordered timestamps.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Start at `start`, advancing by `step` after each read
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self
                .next
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let current = *next;
            *next = current + self.step;
            current
        }
    }

    /// The instant every test clock starts at: 2025-01-01 00:00:00 UTC
    #[must_use]
    pub fn test_instant() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(1_735_689_600)
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_instant())
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock, test_clock, test_instant};
