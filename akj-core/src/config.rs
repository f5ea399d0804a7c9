//! Runtime configuration of the payment flow.
//!
//! Loading and validating the on-disk format is the binary's job; this is
//! the validated shape shared with library users.

use std::time::Duration;

use akj_sdk::client::PaymentClient;
use url::Url;

use crate::poller::PollSchedule;

/// Validated flow configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    /// Root URL of the payment backend.
    pub base_url: Url,
    /// Bound on the create-link call.
    pub create_link_timeout: Duration,
    /// Bound on each verify call.
    pub verify_timeout: Duration,
    /// Poll cadence and overall session deadline.
    pub schedule: PollSchedule,
}

impl FlowConfig {
    /// Configuration pointing at `base_url` with the default timings.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            create_link_timeout: PaymentClient::CREATE_LINK_TIMEOUT,
            verify_timeout: PaymentClient::VERIFY_TIMEOUT,
            schedule: PollSchedule::default(),
        }
    }

    /// Build the HTTP client for this configuration.
    pub fn payment_client(&self) -> Result<PaymentClient, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("akj-pay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(PaymentClient::new(self.base_url.clone())
            .with_http_client(http)
            .with_timeouts(self.create_link_timeout, self.verify_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FlowConfig::new(Url::parse(akj_sdk::DEFAULT_BASE_URL).unwrap());
        assert_eq!(config.create_link_timeout, Duration::from_secs(30));
        assert_eq!(config.verify_timeout, Duration::from_secs(10));
        assert_eq!(config.schedule.interval, Duration::from_secs(5));
        assert_eq!(config.schedule.session_timeout, Duration::from_secs(300));

        let client = config.payment_client().unwrap();
        assert_eq!(client.base_url().as_str(), "https://akj.brightechsoftware.com/");
    }
}
