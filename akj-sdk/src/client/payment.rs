//! Payment API client (app → AKJ backend).

use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use super::ClientError;
use crate::objects::{
    CreatePaymentLinkRequest, OrderId, PaymentLink, PaymentLinkResponse, VerifyPaymentResponse,
};

/// Typed HTTP client for the backend's **payment API**.
///
/// Each endpoint carries its own per-request timeout: creating a link is
/// allowed to take longer than a single verification poll.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    http: Client,
    base_url: Url,
    create_link_timeout: Duration,
    verify_timeout: Duration,
}

impl PaymentClient {
    /// Default bound on `create-payment-link`.
    pub const CREATE_LINK_TIMEOUT: Duration = Duration::from_secs(30);
    /// Default bound on a single `verify` poll.
    pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a new `PaymentClient`.
    ///
    /// * `base_url` – root URL of the backend (e.g. `https://akj.brightechsoftware.com`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
            create_link_timeout: Self::CREATE_LINK_TIMEOUT,
            verify_timeout: Self::VERIFY_TIMEOUT,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Override the per-request timeouts.
    pub fn with_timeouts(mut self, create_link: Duration, verify: Duration) -> Self {
        self.create_link_timeout = create_link;
        self.verify_timeout = verify;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /api/payment/create-payment-link` – create a hosted checkout
    /// link for one payment attempt.
    ///
    /// The response must carry both `payment_link` and `order_id`; anything
    /// less is reported as [`ClientError::Shape`].
    pub async fn create_payment_link(
        &self,
        request: &CreatePaymentLinkRequest,
    ) -> Result<PaymentLink, ClientError> {
        let url = self.base_url.join("/api/payment/create-payment-link")?;

        let resp = self
            .http
            .post(url)
            .timeout(self.create_link_timeout)
            .json(request)
            .send()
            .await?;

        let raw: PaymentLinkResponse = parse_response(resp).await?;
        let link = PaymentLink::try_from(raw)?;
        debug!(order_id = %link.order_id, "Payment link created");
        Ok(link)
    }

    /// `GET /api/payment/verify?orderId={order_id}` – fetch the provider
    /// status of an order.
    pub async fn verify_payment(
        &self,
        order_id: &OrderId,
    ) -> Result<VerifyPaymentResponse, ClientError> {
        let url = self.base_url.join(&format!(
            "/api/payment/verify?orderId={}",
            urlencoding::encode(order_id.as_str())
        ))?;

        let resp = self
            .http
            .get(url)
            .timeout(self.verify_timeout)
            .send()
            .await?;

        parse_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
