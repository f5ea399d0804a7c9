//! `GET /api/payment/verify` response types.

use serde::{Deserialize, Serialize};

/// Provider-side status of a payment attempt.
///
/// Statuses the client does not act on (`created`, `attempted`, …) fold
/// into [`VerificationStatus::Pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Paid,
    Failed,
    Cancelled,
    #[serde(other)]
    Pending,
}

impl VerificationStatus {
    /// Whether this status ends a verification session.
    pub fn is_terminal(self) -> bool {
        !matches!(self, VerificationStatus::Pending)
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationStatus::Pending => write!(f, "pending"),
            VerificationStatus::Paid => write!(f, "paid"),
            VerificationStatus::Failed => write!(f, "failed"),
            VerificationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One verification poll result.
///
/// Provider fields other than `razorpay_status` and `success` are kept in
/// `raw` untouched, including any bare `status` the provider sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    #[serde(rename = "razorpay_status")]
    pub status: VerificationStatus,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(flatten)]
    pub raw: serde_json::Map<String, serde_json::Value>,
}

impl VerifyPaymentResponse {
    pub fn pending() -> Self {
        Self::with_status(VerificationStatus::Pending)
    }

    pub fn with_status(status: VerificationStatus) -> Self {
        Self {
            status,
            success: Some(status == VerificationStatus::Paid),
            raw: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paid_response() {
        let resp: VerifyPaymentResponse = serde_json::from_str(
            r#"{"razorpay_status":"paid","success":true,"payment_id":"pay_123"}"#,
        )
        .unwrap();
        assert_eq!(resp.status, VerificationStatus::Paid);
        assert_eq!(resp.success, Some(true));
        assert_eq!(resp.raw["payment_id"], "pay_123");
    }

    #[test]
    fn test_unknown_status_is_pending() {
        let resp: VerifyPaymentResponse =
            serde_json::from_str(r#"{"razorpay_status":"attempted","success":false}"#).unwrap();
        assert_eq!(resp.status, VerificationStatus::Pending);
        assert!(!resp.status.is_terminal());
    }

    #[test]
    fn test_missing_status_is_an_error() {
        assert!(serde_json::from_str::<VerifyPaymentResponse>(r#"{"success":true}"#).is_err());
    }

    #[test]
    fn test_provider_status_kept_in_raw() {
        let resp: VerifyPaymentResponse = serde_json::from_str(
            r#"{"razorpay_status":"paid","status":"captured","success":true}"#,
        )
        .unwrap();
        assert_eq!(resp.status, VerificationStatus::Paid);
        assert_eq!(resp.success, Some(true));
        assert_eq!(resp.raw["status"], "captured");
    }

    #[test]
    fn test_bare_status_is_not_the_verdict() {
        assert!(serde_json::from_str::<VerifyPaymentResponse>(r#"{"status":"paid"}"#).is_err());
    }

    #[test]
    fn test_status_wire_names() {
        for (wire, status) in [
            ("\"paid\"", VerificationStatus::Paid),
            ("\"failed\"", VerificationStatus::Failed),
            ("\"cancelled\"", VerificationStatus::Cancelled),
            ("\"created\"", VerificationStatus::Pending),
        ] {
            assert_eq!(serde_json::from_str::<VerificationStatus>(wire).unwrap(), status);
        }
        assert_eq!(
            serde_json::to_string(&VerificationStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
