//! Customer and payment fields collected by the form.
//!
//! All values are free text. Payment details are kept as entered and only
//! checked for presence; `Debug` output masks them so they cannot leak into
//! logs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name and address fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CustomerField {
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Postal address
    Address,
}

/// Payment card fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaymentField {
    /// Card number
    CardNumber,
    /// Expiry, as typed (`MM/YY`)
    Expiry,
    /// Card verification value
    Cvv,
}

/// Any field of the form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    /// A customer field
    Customer(CustomerField),
    /// A payment field
    Payment(PaymentField),
}

impl CustomerField {
    /// All customer fields, in form order
    pub const ALL: [Self; 3] = [Self::FirstName, Self::LastName, Self::Address];

    /// Input name used by the form
    #[must_use]
    pub const fn input_name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Address => "address",
        }
    }
}

impl PaymentField {
    /// All payment fields, in form order
    pub const ALL: [Self; 3] = [Self::CardNumber, Self::Expiry, Self::Cvv];

    /// Input name used by the form
    #[must_use]
    pub const fn input_name(self) -> &'static str {
        match self {
            Self::CardNumber => "creditCardNumber",
            Self::Expiry => "expiryDate",
            Self::Cvv => "cvv",
        }
    }
}

impl FormField {
    /// Input name used by the form
    #[must_use]
    pub const fn input_name(self) -> &'static str {
        match self {
            Self::Customer(field) => field.input_name(),
            Self::Payment(field) => field.input_name(),
        }
    }
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_name())
    }
}

impl fmt::Display for PaymentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_name())
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_name())
    }
}

impl From<CustomerField> for FormField {
    fn from(field: CustomerField) -> Self {
        Self::Customer(field)
    }
}

impl From<PaymentField> for FormField {
    fn from(field: PaymentField) -> Self {
        Self::Payment(field)
    }
}

/// Unknown input name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown form field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        CustomerField::ALL
            .into_iter()
            .map(Self::Customer)
            .chain(PaymentField::ALL.into_iter().map(Self::Payment))
            .find(|field| field.input_name() == name)
            .ok_or_else(|| UnknownField(name.to_string()))
    }
}

/// Payment card details, as typed
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Card number
    #[serde(rename = "creditCard")]
    pub card_number: String,
    /// Expiry date (`MM/YY`)
    #[serde(rename = "expiryDate")]
    pub expiry: String,
    /// Card verification value
    pub cvv: String,
}

impl PaymentDetails {
    /// Card number with everything but the last four digits hidden
    #[must_use]
    pub fn masked_card_number(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(char::is_ascii_digit).collect();
        if digits.len() <= 4 {
            return "*".repeat(digits.len());
        }
        let tail: String = digits[digits.len() - 4..].iter().collect();
        format!("{}{tail}", "*".repeat(digits.len() - 4))
    }
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_number", &self.masked_card_number())
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .finish()
    }
}

/// Customer information owned by one form session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Postal address
    pub address: String,
    /// Payment card
    #[serde(rename = "paymentMethod")]
    pub payment: PaymentDetails,
}

impl CustomerInfo {
    /// Current value of `field`
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Customer(CustomerField::FirstName) => &self.first_name,
            FormField::Customer(CustomerField::LastName) => &self.last_name,
            FormField::Customer(CustomerField::Address) => &self.address,
            FormField::Payment(PaymentField::CardNumber) => &self.payment.card_number,
            FormField::Payment(PaymentField::Expiry) => &self.payment.expiry,
            FormField::Payment(PaymentField::Cvv) => &self.payment.cvv,
        }
    }

    /// Replace the value of `field`
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Customer(CustomerField::FirstName) => &mut self.first_name,
            FormField::Customer(CustomerField::LastName) => &mut self.last_name,
            FormField::Customer(CustomerField::Address) => &mut self.address,
            FormField::Payment(PaymentField::CardNumber) => &mut self.payment.card_number,
            FormField::Payment(PaymentField::Expiry) => &mut self.payment.expiry,
            FormField::Payment(PaymentField::Cvv) => &mut self.payment.cvv,
        };
        *slot = value.into();
    }

    /// Full name for display and logs
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn parses_form_input_names() {
        assert_eq!(
            "firstName".parse::<FormField>(),
            Ok(FormField::Customer(CustomerField::FirstName))
        );
        assert_eq!(
            "creditCardNumber".parse::<FormField>(),
            Ok(FormField::Payment(PaymentField::CardNumber))
        );
        assert_eq!(
            "email".parse::<FormField>(),
            Err(UnknownField("email".to_string()))
        );
    }

    #[test]
    fn set_and_get_every_field() {
        let mut customer = CustomerInfo::default();
        for (i, field) in CustomerField::ALL
            .into_iter()
            .map(FormField::from)
            .chain(PaymentField::ALL.into_iter().map(FormField::from))
            .enumerate()
        {
            customer.set(field, format!("value-{i}"));
            assert_eq!(customer.get(field), format!("value-{i}"));
        }
        assert_eq!(customer.payment.cvv, "value-5");
    }

    #[test]
    fn debug_masks_payment_details() {
        let mut customer = CustomerInfo::default();
        customer.set(PaymentField::CardNumber.into(), "4111 1111 1111 1234");
        customer.set(PaymentField::Cvv.into(), "987");

        let debug = format!("{customer:?}");
        assert!(debug.contains("************1234"));
        assert!(!debug.contains("4111"));
        assert!(!debug.contains("987"));
    }

    #[test]
    fn serializes_with_payment_method() {
        let mut customer = CustomerInfo::default();
        customer.set(CustomerField::FirstName.into(), "Ada");
        customer.set(PaymentField::Expiry.into(), "12/27");

        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["paymentMethod"]["expiryDate"], "12/27");
    }
}
