//! Submission sink: the seam where an assembled order leaves the widget.
//!
//! No transport is defined. [`LoggingSink`] records the hand-off in the log,
//! [`RecordingSink`] keeps the orders in memory.

use std::sync::{Arc, Mutex, PoisonError};

use crate::order::Order;

/// What the sink did with an order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The sink took ownership of the order
    Accepted,
    /// The sink refused the order
    Rejected {
        /// Why
        reason: String,
    },
}

impl SubmissionOutcome {
    /// Whether the order was accepted
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Receives assembled orders, exactly once per validated submission
pub trait SubmissionSink: Send + Sync {
    /// Take ownership of `order`
    ///
    /// Runs synchronously on the caller's control flow.
    fn submit(&self, order: Order) -> SubmissionOutcome;
}

impl<T: SubmissionSink + ?Sized> SubmissionSink for Arc<T> {
    fn submit(&self, order: Order) -> SubmissionOutcome {
        (**self).submit(order)
    }
}

/// Sink that only logs a redacted summary of the order
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSink;

impl SubmissionSink for LoggingSink {
    fn submit(&self, order: Order) -> SubmissionOutcome {
        tracing::info!(
            event = %order.event().id,
            customer = %order.customer().display_name(),
            card = %order.customer().payment.masked_card_number(),
            tickets = order.ticket_count(),
            lines = ?order.lines(),
            created_at = %order.created_at(),
            "Order submitted"
        );
        SubmissionOutcome::Accepted
    }
}

/// Sink that keeps every order it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    orders: Mutex<Vec<Order>>,
    reject_with: Option<String>,
}

impl RecordingSink {
    /// Creates an accepting sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that records orders but answers `Rejected { reason }`
    #[must_use]
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            orders: Mutex::default(),
            reject_with: Some(reason.into()),
        }
    }

    /// Orders received so far
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of orders received
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no order was received
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SubmissionSink for RecordingSink {
    fn submit(&self, order: Order) -> SubmissionOutcome {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(order);
        match &self.reject_with {
            None => SubmissionOutcome::Accepted,
            Some(reason) => SubmissionOutcome::Rejected {
                reason: reason.clone(),
            },
        }
    }
}
