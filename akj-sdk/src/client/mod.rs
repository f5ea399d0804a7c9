//! HTTP client for the payment endpoints.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod payment;

pub use payment::PaymentClient;

use reqwest::StatusCode;

use crate::objects::LinkShapeError;

/// Errors produced by the SDK HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response body parsed but does not have the expected shape.
    #[error("unexpected response: {0}")]
    Shape(#[from] LinkShapeError),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Whether the failure is a transport problem (worth retrying later)
    /// rather than a malformed exchange.
    ///
    /// Server-side 5xx, 408 and 429 count as transport problems.
    pub fn is_transport(&self) -> bool {
        match self {
            ClientError::Http(_) => true,
            ClientError::Api { status, .. } => {
                status.is_server_error()
                    || *status == StatusCode::REQUEST_TIMEOUT
                    || *status == StatusCode::TOO_MANY_REQUESTS
            }
            ClientError::Json(_) | ClientError::Shape(_) | ClientError::Url(_) => false,
        }
    }

    /// Whether the failure was a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Http(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        let server = ClientError::Api {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        let throttled = ClientError::Api {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        let rejected = ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            body: "bad amount".to_string(),
        };
        assert!(server.is_transport());
        assert!(throttled.is_transport());
        assert!(!rejected.is_transport());
        assert!(!ClientError::Shape(LinkShapeError::Empty).is_transport());
    }
}
