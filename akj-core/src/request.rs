//! Payment request built from user input.

use std::str::FromStr;

use akj_sdk::objects::{CreatePaymentLinkRequest, CustomerDetails};
use rust_decimal::Decimal;

use crate::error::ValidationError;

/// A validated request for one payment attempt.
///
/// Fields are private so an invalid request cannot be constructed; every
/// constructor runs the same checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    amount: Decimal,
    customer_name: String,
    customer_contact: String,
    scheme_registration_no: String,
    scheme_group_code: String,
}

impl PaymentRequest {
    /// Validate and build a request.
    ///
    /// Checks run in order: amount, contact, then the required text fields.
    /// The contact is stored in its normalized 10-digit form.
    pub fn new(
        amount: Decimal,
        customer_name: &str,
        customer_contact: &str,
        scheme_registration_no: &str,
        scheme_group_code: &str,
    ) -> Result<Self, ValidationError> {
        validate_amount(amount)?;
        let customer_contact = normalize_contact(customer_contact)?;
        Ok(Self {
            amount,
            customer_name: required("customer name", customer_name)?,
            customer_contact,
            scheme_registration_no: required("scheme registration number", scheme_registration_no)?,
            scheme_group_code: required("scheme group code", scheme_group_code)?,
        })
    }

    /// Build a request from the raw amount text the user typed.
    pub fn from_input(
        amount: &str,
        customer_name: &str,
        customer_contact: &str,
        scheme_registration_no: &str,
        scheme_group_code: &str,
    ) -> Result<Self, ValidationError> {
        Self::new(
            parse_amount(amount)?,
            customer_name,
            customer_contact,
            scheme_registration_no,
            scheme_group_code,
        )
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_contact(&self) -> &str {
        &self.customer_contact
    }

    pub fn scheme_registration_no(&self) -> &str {
        &self.scheme_registration_no
    }

    pub fn scheme_group_code(&self) -> &str {
        &self.scheme_group_code
    }

    /// The body sent to `create-payment-link`.
    pub fn to_wire(&self) -> CreatePaymentLinkRequest {
        CreatePaymentLinkRequest {
            amount: self.amount,
            customer: CustomerDetails {
                name: self.customer_name.clone(),
                contact: self.customer_contact.clone(),
                registration_no: self.scheme_registration_no.clone(),
                group_code: self.scheme_group_code.clone(),
            },
        }
    }
}

/// Parse a user-entered currency amount.
pub fn parse_amount(input: &str) -> Result<Decimal, ValidationError> {
    let trimmed = input.trim();
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))?;
    validate_amount(amount)?;
    Ok(amount)
}

fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    if amount.normalize().scale() > 2 {
        return Err(ValidationError::TooManyDecimals);
    }
    Ok(())
}

/// Normalize an Indian mobile number to its 10-digit form.
///
/// Spaces and dashes are ignored. A `+91` prefix, a bare `91` prefix on a
/// 12-digit number, or a single leading `0` on an 11-digit number is
/// stripped. The remaining number must be 10 digits starting with 6-9.
pub fn normalize_contact(input: &str) -> Result<String, ValidationError> {
    let compact: String = input
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    let local = if let Some(rest) = compact.strip_prefix("+91") {
        rest
    } else if compact.len() == 12 && compact.starts_with("91") {
        &compact[2..]
    } else if compact.len() == 11 && compact.starts_with('0') {
        &compact[1..]
    } else {
        compact.as_str()
    };

    let valid = local.len() == 10
        && local.bytes().all(|b| b.is_ascii_digit())
        && matches!(local.as_bytes().first(), Some(b'6'..=b'9'));

    if valid {
        Ok(local.to_string())
    } else {
        Err(ValidationError::MalformedContact(input.to_string()))
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(amount: &str) -> Result<PaymentRequest, ValidationError> {
        PaymentRequest::from_input(amount, "Meena", "98765 43210", "R-77", "GS01")
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert_eq!(valid("0"), Err(ValidationError::NonPositiveAmount));
        assert_eq!(valid("-10"), Err(ValidationError::NonPositiveAmount));
    }

    #[test]
    fn test_amount_parsing() {
        assert!(matches!(valid("abc"), Err(ValidationError::InvalidAmount(_))));
        assert_eq!(valid("10.005"), Err(ValidationError::TooManyDecimals));
        let req = valid(" 1500.50 ").unwrap();
        assert_eq!(req.amount(), Decimal::new(150050, 2));
    }

    #[test]
    fn test_contact_normalization() {
        assert_eq!(normalize_contact("+91 98765-43210").unwrap(), "9876543210");
        assert_eq!(normalize_contact("919876543210").unwrap(), "9876543210");
        assert_eq!(normalize_contact("09876543210").unwrap(), "9876543210");
        assert!(normalize_contact("12345").is_err());
        assert!(normalize_contact("5876543210").is_err());
        assert!(normalize_contact("98765a3210").is_err());
    }

    #[test]
    fn test_missing_scheme_identifiers() {
        assert_eq!(
            PaymentRequest::from_input("100", "Meena", "9876543210", " ", "GS01"),
            Err(ValidationError::MissingField("scheme registration number"))
        );
        assert_eq!(
            PaymentRequest::from_input("100", "Meena", "9876543210", "R-77", ""),
            Err(ValidationError::MissingField("scheme group code"))
        );
        assert_eq!(
            PaymentRequest::from_input("100", "", "9876543210", "R-77", "GS01"),
            Err(ValidationError::MissingField("customer name"))
        );
    }

    #[test]
    fn test_wire_body() {
        let wire = valid("250").unwrap().to_wire();
        assert_eq!(wire.customer.contact, "9876543210");
        assert_eq!(wire.customer.registration_no, "R-77");
        assert_eq!(wire.customer.group_code, "GS01");
    }
}
