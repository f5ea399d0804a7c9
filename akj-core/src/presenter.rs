//! Checkout Presenter.
//!
//! Relays what happens on the hosted checkout page to the flow runner. It
//! owns no timers and never decides a payment succeeded: only a verify
//! response can do that.

use akj_sdk::objects::PaymentLink;
use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use url::Url;

use crate::events::{CheckoutSignal, CheckoutSignalSender};

pub const CANCEL_TITLE: &str = "Cancel Payment";
pub const CANCEL_MESSAGE: &str = "Are you sure you want to cancel this payment?";

/// Two-choice confirmation shown before tearing down a checkout.
#[async_trait]
pub trait CancelPrompt: Send {
    /// Returns `true` when the user confirms the cancellation.
    async fn confirm_cancel(&mut self, title: &str, message: &str) -> bool;
}

/// Classification of a URL the checkout navigated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationVerdict {
    /// Nothing recognisable.
    Continue,
    /// Looks like a success page. Logged only; the poller decides.
    ReportedSuccess,
    /// Failure or cancellation page; the flow has been told to stop.
    Failure,
    /// The presenter is closed.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelDecision {
    /// User confirmed; polling is torn down and the presenter closed.
    Cancelled,
    /// User chose to keep paying.
    Kept,
    /// Nothing open to cancel.
    NotOpen,
}

/// Classify a navigated URL by substring. Failure markers win over success
/// markers.
pub fn classify_navigation(url: &str) -> NavigationVerdict {
    let url = url.to_ascii_lowercase();
    if url.contains("failure") || url.contains("cancelled") {
        NavigationVerdict::Failure
    } else if url.contains("success") || url.contains("completed") {
        NavigationVerdict::ReportedSuccess
    } else {
        NavigationVerdict::Continue
    }
}

pub struct CheckoutPresenter {
    signals: CheckoutSignalSender,
    checkout_url: Option<Url>,
}

impl CheckoutPresenter {
    pub fn new(signals: CheckoutSignalSender) -> Self {
        Self {
            signals,
            checkout_url: None,
        }
    }

    /// Show the checkout for `link`; returns the URL to load.
    pub fn open(&mut self, link: &PaymentLink) -> &Url {
        info!(order_id = %link.order_id, "Presenting checkout");
        self.checkout_url.insert(link.checkout_url.clone())
    }

    pub fn is_open(&self) -> bool {
        self.checkout_url.is_some()
    }

    pub fn close(&mut self) {
        if self.checkout_url.take().is_some() {
            debug!("Checkout closed");
        }
    }

    /// Observe a navigation inside the checkout.
    pub async fn on_navigation(&mut self, url: &str) -> NavigationVerdict {
        if !self.is_open() {
            return NavigationVerdict::Ignored;
        }
        let verdict = classify_navigation(url);
        match verdict {
            NavigationVerdict::Failure => {
                info!(url, "Checkout reached a failure page");
                self.relay(CheckoutSignal::RedirectFailure {
                    url: url.to_string(),
                })
                .await;
                self.close();
            }
            NavigationVerdict::ReportedSuccess => {
                info!(url, "Checkout reports success, awaiting verification");
            }
            NavigationVerdict::Continue | NavigationVerdict::Ignored => {
                debug!(url, "Checkout navigated");
            }
        }
        verdict
    }

    /// Observe a load/render error of the checkout page.
    pub async fn on_load_error(&mut self, description: impl Into<String>) {
        if !self.is_open() {
            return;
        }
        let description = description.into();
        warn!(%description, "Checkout failed to load");
        self.relay(CheckoutSignal::LoadFailed { description }).await;
    }

    /// Ask the user to confirm, then tear down polling and close.
    ///
    /// Returns only after the flow runner acknowledged the teardown (or has
    /// already finished).
    pub async fn request_cancel<P: CancelPrompt + ?Sized>(
        &mut self,
        prompt: &mut P,
    ) -> CancelDecision {
        if !self.is_open() {
            return CancelDecision::NotOpen;
        }
        if !prompt.confirm_cancel(CANCEL_TITLE, CANCEL_MESSAGE).await {
            debug!("Cancellation declined");
            return CancelDecision::Kept;
        }

        let (ack_tx, ack_rx) = oneshot::channel();
        if self
            .signals
            .send(CheckoutSignal::CancelRequested { ack: ack_tx })
            .await
            .is_ok()
        {
            // Err means the runner finished without acknowledging, which also
            // leaves nothing to tear down.
            let _ = ack_rx.await;
        }
        info!("Checkout cancelled by user");
        self.close();
        CancelDecision::Cancelled
    }

    async fn relay(&self, signal: CheckoutSignal) {
        if self.signals.send(signal).await.is_err() {
            debug!("Flow runner already finished, dropping checkout signal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::checkout_signal_channel;
    use akj_sdk::objects::OrderId;

    struct Answer(bool);

    #[async_trait]
    impl CancelPrompt for Answer {
        async fn confirm_cancel(&mut self, title: &str, _message: &str) -> bool {
            assert_eq!(title, CANCEL_TITLE);
            self.0
        }
    }

    fn link() -> PaymentLink {
        PaymentLink {
            checkout_url: Url::parse("https://rzp.io/i/abc").unwrap(),
            order_id: OrderId::new("abc123").unwrap(),
        }
    }

    #[test]
    fn test_classify_navigation() {
        assert_eq!(
            classify_navigation("https://pay.example/status/FAILURE"),
            NavigationVerdict::Failure
        );
        assert_eq!(
            classify_navigation("https://pay.example/payment-cancelled"),
            NavigationVerdict::Failure
        );
        assert_eq!(
            classify_navigation("https://pay.example/success?then=failure"),
            NavigationVerdict::Failure
        );
        assert_eq!(
            classify_navigation("https://pay.example/completed"),
            NavigationVerdict::ReportedSuccess
        );
        assert_eq!(
            classify_navigation("https://rzp.io/i/abc"),
            NavigationVerdict::Continue
        );
    }

    #[tokio::test]
    async fn test_failure_redirect_signals_and_closes() {
        let (tx, mut rx) = checkout_signal_channel();
        let mut presenter = CheckoutPresenter::new(tx);
        presenter.open(&link());

        let verdict = presenter.on_navigation("https://rzp.io/payment/failure").await;
        assert_eq!(verdict, NavigationVerdict::Failure);
        assert!(!presenter.is_open());
        assert!(matches!(
            rx.recv().await,
            Some(CheckoutSignal::RedirectFailure { url }) if url.ends_with("/failure")
        ));

        let after = presenter.on_navigation("https://rzp.io/payment/failure").await;
        assert_eq!(after, NavigationVerdict::Ignored);
    }

    #[tokio::test]
    async fn test_success_redirect_is_informational() {
        let (tx, mut rx) = checkout_signal_channel();
        let mut presenter = CheckoutPresenter::new(tx);
        presenter.open(&link());

        let verdict = presenter.on_navigation("https://rzp.io/payment/success").await;
        assert_eq!(verdict, NavigationVerdict::ReportedSuccess);
        assert!(presenter.is_open());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_load_error_forwarded() {
        let (tx, mut rx) = checkout_signal_channel();
        let mut presenter = CheckoutPresenter::new(tx);
        presenter.open(&link());

        presenter.on_load_error("net::ERR_NAME_NOT_RESOLVED").await;
        assert!(presenter.is_open());
        assert!(matches!(
            rx.recv().await,
            Some(CheckoutSignal::LoadFailed { description }) if description.contains("ERR_NAME")
        ));
    }

    #[tokio::test]
    async fn test_declined_cancel_keeps_checkout() {
        let (tx, mut rx) = checkout_signal_channel();
        let mut presenter = CheckoutPresenter::new(tx);
        presenter.open(&link());

        let decision = presenter.request_cancel(&mut Answer(false)).await;
        assert_eq!(decision, CancelDecision::Kept);
        assert!(presenter.is_open());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_confirmed_cancel_waits_for_ack() {
        let (tx, mut rx) = checkout_signal_channel();
        let mut presenter = CheckoutPresenter::new(tx);
        presenter.open(&link());

        let runner = tokio::spawn(async move {
            match rx.recv().await {
                Some(CheckoutSignal::CancelRequested { ack }) => {
                    let _ = ack.send(());
                    true
                }
                _ => false,
            }
        });

        let decision = presenter.request_cancel(&mut Answer(true)).await;
        assert_eq!(decision, CancelDecision::Cancelled);
        assert!(!presenter.is_open());
        assert!(runner.await.unwrap());
    }

    #[tokio::test]
    async fn test_cancel_when_closed() {
        let (tx, _rx) = checkout_signal_channel();
        let mut presenter = CheckoutPresenter::new(tx);
        let decision = presenter.request_cancel(&mut Answer(true)).await;
        assert_eq!(decision, CancelDecision::NotOpen);
    }
}
