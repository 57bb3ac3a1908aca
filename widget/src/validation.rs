//! Submission gate: cart non-empty, customer and payment fields present.
//!
//! Every check runs, so the caller can report all problems at once. Only
//! presence is checked; card number, expiry and CVV formats are not. Customer
//! fields are trimmed first, payment fields only need to be non-empty.

use thiserror::Error;

use crate::cart::Cart;
use crate::customer::{CustomerField, CustomerInfo, FormField, PaymentField};

/// A user-correctable problem that blocks submission
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The cart is empty
    #[error("Please select at least one ticket")]
    NoTicketsSelected,

    /// A customer field is blank
    #[error("Please fill in {0}")]
    MissingCustomerField(CustomerField),

    /// A payment field is blank
    #[error("Please fill in payment detail {0}")]
    MissingPaymentField(PaymentField),
}

impl ValidationError {
    /// The field to highlight, if the error is about a field
    #[must_use]
    pub const fn field(self) -> Option<FormField> {
        match self {
            Self::NoTicketsSelected => None,
            Self::MissingCustomerField(field) => Some(FormField::Customer(field)),
            Self::MissingPaymentField(field) => Some(FormField::Payment(field)),
        }
    }
}

/// Outcome of [`validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Ready to submit
    Valid,
    /// Blocked; reasons in check order
    Invalid(Vec<ValidationError>),
}

impl ValidationResult {
    /// Whether submission may proceed
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Reasons, empty when valid
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Convert into a `Result`
    ///
    /// # Errors
    ///
    /// Returns the reasons when invalid.
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(errors) => Err(errors),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check `cart` and `customer` for submission
#[must_use]
pub fn validate(cart: &Cart, customer: &CustomerInfo) -> ValidationResult {
    let mut errors = Vec::new();

    if cart.is_empty() {
        errors.push(ValidationError::NoTicketsSelected);
    }

    errors.extend(
        CustomerField::ALL
            .into_iter()
            .filter(|field| is_blank(customer.get(FormField::Customer(*field))))
            .map(ValidationError::MissingCustomerField),
    );

    errors.extend(
        PaymentField::ALL
            .into_iter()
            .filter(|field| customer.get(FormField::Payment(*field)).is_empty())
            .map(ValidationError::MissingPaymentField),
    );

    if errors.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(errors)
    }
}
