//! Seam between the payment flow and the backend.

use akj_sdk::client::{ClientError, PaymentClient};
use akj_sdk::objects::{CreatePaymentLinkRequest, OrderId, PaymentLink, VerifyPaymentResponse};
use async_trait::async_trait;

/// Backend operations the payment flow depends on.
///
/// Implemented by [`PaymentClient`] for real traffic; tests substitute
/// scripted gateways.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout link. Called once per attempt, never retried.
    async fn create_payment_link(
        &self,
        request: &CreatePaymentLinkRequest,
    ) -> Result<PaymentLink, ClientError>;

    /// Fetch the provider status of an order.
    async fn verify_payment(&self, order_id: &OrderId)
    -> Result<VerifyPaymentResponse, ClientError>;
}

#[async_trait]
impl PaymentGateway for PaymentClient {
    async fn create_payment_link(
        &self,
        request: &CreatePaymentLinkRequest,
    ) -> Result<PaymentLink, ClientError> {
        PaymentClient::create_payment_link(self, request).await
    }

    async fn verify_payment(
        &self,
        order_id: &OrderId,
    ) -> Result<VerifyPaymentResponse, ClientError> {
        PaymentClient::verify_payment(self, order_id).await
    }
}
