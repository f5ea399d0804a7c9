//! Error taxonomy for a payment attempt.
//!
//! Every failure here is scoped to one attempt; none is fatal to the
//! process. [`PaymentError::remedy`] tells the caller what to offer the
//! user next.

use akj_sdk::client::ClientError;
use akj_sdk::objects::OrderId;
use thiserror::Error;

/// Bad user input, detected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount is not a number: {0:?}")]
    InvalidAmount(String),
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("amount has more than two decimal places")]
    TooManyDecimals,
    #[error("contact is not a valid mobile number: {0:?}")]
    MalformedContact(String),
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Errors that can end a payment attempt.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Rejected locally before contacting the backend.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The backend could not be reached in time.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with something we cannot interpret.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The provider reported the payment as failed or cancelled.
    #[error("payment {order_id} failed: {reason}")]
    TerminalFailure { order_id: OrderId, reason: String },

    /// No terminal answer arrived before the session timeout.
    #[error("payment {order_id} not confirmed in time")]
    Timeout { order_id: OrderId },

    /// The user abandoned the checkout.
    #[error("payment {order_id} cancelled by user")]
    Cancelled { order_id: OrderId },
}

/// What the caller should offer after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remedy {
    /// Show the error with a retry affordance; retrying restarts from link creation.
    Retry,
    /// The server may still settle the payment; ask the user to check their history.
    CheckManually,
    /// Close the checkout and inform the user.
    Dismiss,
}

impl PaymentError {
    pub fn remedy(&self) -> Remedy {
        match self {
            PaymentError::Validation(_) | PaymentError::Network(_) | PaymentError::Protocol(_) => {
                Remedy::Retry
            }
            PaymentError::Timeout { .. } => Remedy::CheckManually,
            PaymentError::TerminalFailure { .. } | PaymentError::Cancelled { .. } => {
                Remedy::Dismiss
            }
        }
    }
}

impl From<ClientError> for PaymentError {
    fn from(err: ClientError) -> Self {
        if err.is_transport() {
            PaymentError::Network(err.to_string())
        } else {
            PaymentError::Protocol(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akj_sdk::objects::LinkShapeError;

    #[test]
    fn test_remedy_policy() {
        let order_id = OrderId::new("abc123").unwrap();
        assert_eq!(
            PaymentError::from(ValidationError::NonPositiveAmount).remedy(),
            Remedy::Retry
        );
        assert_eq!(
            PaymentError::Protocol("bad".into()).remedy(),
            Remedy::Retry
        );
        assert_eq!(
            PaymentError::Timeout {
                order_id: order_id.clone()
            }
            .remedy(),
            Remedy::CheckManually
        );
        assert_eq!(
            PaymentError::TerminalFailure {
                order_id,
                reason: "failed".into()
            }
            .remedy(),
            Remedy::Dismiss
        );
    }

    #[test]
    fn test_client_error_classification() {
        let shape = PaymentError::from(ClientError::Shape(LinkShapeError::Empty));
        assert!(matches!(shape, PaymentError::Protocol(_)));

        let outage = PaymentError::from(ClientError::Api {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: String::new(),
        });
        assert!(matches!(outage, PaymentError::Network(_)));
    }
}
