//! Payment Initiator: turns a validated request into a payment link.

use akj_sdk::objects::PaymentLink;
use tracing::{info, warn};

use crate::error::PaymentError;
use crate::gateway::PaymentGateway;
use crate::request::PaymentRequest;

/// Create the hosted checkout link for `request`.
///
/// Issues exactly one outbound request and never retries; the caller
/// re-invokes on failure. The returned link always has both a checkout URL
/// and an order id.
pub async fn create_payment_link<G: PaymentGateway + ?Sized>(
    gateway: &G,
    request: &PaymentRequest,
) -> Result<PaymentLink, PaymentError> {
    match gateway.create_payment_link(&request.to_wire()).await {
        Ok(link) => {
            info!(
                order_id = %link.order_id,
                amount = %request.amount(),
                "Payment link created"
            );
            Ok(link)
        }
        Err(e) => {
            warn!(error = %e, "Failed to create payment link");
            Err(e.into())
        }
    }
}
