//! `POST /api/payment/create-payment-link` request and response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use super::OrderId;

/// Request body for creating a hosted-checkout payment link.
///
/// `amount` goes over the wire as a JSON number, which is what the backend
/// expects; the customer block carries the scheme identifiers in the
/// backend's upper-case field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentLinkRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub customer: CustomerDetails,
}

/// Customer identity and scheme enrolment attached to a payment link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub contact: String,
    #[serde(rename = "REGNO")]
    pub registration_no: String,
    #[serde(rename = "GROUPCODE")]
    pub group_code: String,
}

/// Raw response of the create-link endpoint.
///
/// Both fields are optional here because the backend does not guarantee
/// them; [`PaymentLink::try_from`] is the only way to obtain a usable link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentLinkResponse {
    #[serde(default)]
    pub payment_link: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
}

/// A fully populated payment link: hosted checkout URL plus order id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLink {
    pub checkout_url: Url,
    pub order_id: OrderId,
}

/// Reasons a create-link response cannot become a [`PaymentLink`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkShapeError {
    #[error("response carries neither payment_link nor order_id")]
    Empty,
    #[error("response is missing payment_link")]
    MissingCheckoutUrl,
    #[error("response is missing order_id")]
    MissingOrderId,
    #[error("payment_link is not an absolute http(s) url: {0}")]
    InvalidCheckoutUrl(String),
}

impl TryFrom<PaymentLinkResponse> for PaymentLink {
    type Error = LinkShapeError;

    fn try_from(resp: PaymentLinkResponse) -> Result<Self, Self::Error> {
        let link = resp.payment_link.filter(|s| !s.trim().is_empty());
        let order_id = resp.order_id.as_deref().and_then(OrderId::new);

        let (link, order_id) = match (link, order_id) {
            (Some(link), Some(order_id)) => (link, order_id),
            (None, None) => return Err(LinkShapeError::Empty),
            (None, Some(_)) => return Err(LinkShapeError::MissingCheckoutUrl),
            (Some(_), None) => return Err(LinkShapeError::MissingOrderId),
        };

        let checkout_url = Url::parse(link.trim())
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| LinkShapeError::InvalidCheckoutUrl(link.clone()))?;

        Ok(Self {
            checkout_url,
            order_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_request_wire_format() {
        let req = CreatePaymentLinkRequest {
            amount: Decimal::from_str("1500.50").unwrap(),
            customer: CustomerDetails {
                name: "Lakshmi".to_string(),
                contact: "9876543210".to_string(),
                registration_no: "R-1001".to_string(),
                group_code: "GS12".to_string(),
            },
        };
        let json: serde_json::Value = serde_json::to_value(&req).unwrap();
        assert_eq!(json["amount"], serde_json::json!(1500.5));
        assert_eq!(json["customer"]["REGNO"], "R-1001");
        assert_eq!(json["customer"]["GROUPCODE"], "GS12");
        assert_eq!(json["customer"]["contact"], "9876543210");
    }

    #[test]
    fn test_complete_response_converts() {
        let resp: PaymentLinkResponse = serde_json::from_str(
            r#"{"payment_link":"https://rzp.io/i/abc","order_id":"abc123","extra":1}"#,
        )
        .unwrap();
        let link = PaymentLink::try_from(resp).unwrap();
        assert_eq!(link.order_id.as_str(), "abc123");
        assert_eq!(link.checkout_url.as_str(), "https://rzp.io/i/abc");
    }

    #[test]
    fn test_partial_responses_rejected() {
        let only_link = PaymentLinkResponse {
            payment_link: Some("https://rzp.io/i/abc".to_string()),
            order_id: None,
        };
        assert_eq!(
            PaymentLink::try_from(only_link),
            Err(LinkShapeError::MissingOrderId)
        );

        let only_order = PaymentLinkResponse {
            payment_link: Some("  ".to_string()),
            order_id: Some("abc123".to_string()),
        };
        assert_eq!(
            PaymentLink::try_from(only_order),
            Err(LinkShapeError::MissingCheckoutUrl)
        );

        assert_eq!(
            PaymentLink::try_from(PaymentLinkResponse::default()),
            Err(LinkShapeError::Empty)
        );
    }

    #[test]
    fn test_non_http_link_rejected() {
        let resp = PaymentLinkResponse {
            payment_link: Some("javascript:alert(1)".to_string()),
            order_id: Some("abc123".to_string()),
        };
        assert!(matches!(
            PaymentLink::try_from(resp),
            Err(LinkShapeError::InvalidCheckoutUrl(_))
        ));
    }
}
