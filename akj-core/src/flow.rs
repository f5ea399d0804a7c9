//! Payment flow runner.
//!
//! Wires the three collaborators together:
//!
//! 1. [`PaymentFlow::initiate`] creates the payment link (Initiator).
//! 2. The caller opens a [`CheckoutPresenter`](crate::presenter::CheckoutPresenter)
//!    on the link and keeps the sender side of a checkout signal channel.
//! 3. [`PaymentFlow::verify`] polls the verify endpoint on the tokio clock
//!    until the poller reports an outcome.
//!
//! Timer fires, verify results and checkout signals are consumed by one
//! `select!` loop, so the poller is only ever touched from one place at a
//! time. Verify calls run in spawned tasks and are not aborted on
//! cancellation; their late results are dropped by the poller.

use std::sync::Arc;

use akj_sdk::client::ClientError;
use akj_sdk::objects::{OrderId, PaymentLink, VerifyPaymentResponse};
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::error::PaymentError;
use crate::events::{CheckoutSignal, CheckoutSignalReceiver, DEFAULT_CHANNEL_BUFFER};
use crate::gateway::PaymentGateway;
use crate::initiator;
use crate::poller::{
    FailureReason, PollOutcome, PollSchedule, PollerStep, TokioTimers, VerificationPoller,
};
use crate::request::PaymentRequest;

/// Final result of one checkout.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Paid(PaidPayment),
    Failed {
        order_id: OrderId,
        reason: FailureReason,
    },
    /// No answer in time. The server may still settle the payment.
    TimedOut {
        order_id: OrderId,
    },
    Cancelled {
        order_id: OrderId,
    },
}

/// A confirmed payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaidPayment {
    pub order_id: OrderId,
    pub amount: Decimal,
    pub verification: VerifyPaymentResponse,
}

impl PaymentOutcome {
    fn from_poll(outcome: PollOutcome, amount: Decimal) -> Self {
        match outcome {
            PollOutcome::Paid {
                order_id,
                verification,
            } => PaymentOutcome::Paid(PaidPayment {
                order_id,
                amount,
                verification,
            }),
            PollOutcome::Failed { order_id, reason } => PaymentOutcome::Failed { order_id, reason },
            PollOutcome::TimedOut { order_id } => PaymentOutcome::TimedOut { order_id },
            PollOutcome::Cancelled { order_id } => PaymentOutcome::Cancelled { order_id },
        }
    }

    pub fn order_id(&self) -> &OrderId {
        match self {
            PaymentOutcome::Paid(paid) => &paid.order_id,
            PaymentOutcome::Failed { order_id, .. }
            | PaymentOutcome::TimedOut { order_id }
            | PaymentOutcome::Cancelled { order_id } => order_id,
        }
    }

    pub fn into_result(self) -> Result<PaidPayment, PaymentError> {
        match self {
            PaymentOutcome::Paid(paid) => Ok(paid),
            PaymentOutcome::Failed { order_id, reason } => Err(PaymentError::TerminalFailure {
                order_id,
                reason: reason.to_string(),
            }),
            PaymentOutcome::TimedOut { order_id } => Err(PaymentError::Timeout { order_id }),
            PaymentOutcome::Cancelled { order_id } => Err(PaymentError::Cancelled { order_id }),
        }
    }
}

type VerifyResult = (OrderId, Result<VerifyPaymentResponse, ClientError>);

pub struct PaymentFlow<G> {
    gateway: Arc<G>,
    schedule: PollSchedule,
}

impl<G> Clone for PaymentFlow<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            schedule: self.schedule,
        }
    }
}

impl<G: PaymentGateway + 'static> PaymentFlow<G> {
    pub fn new(gateway: G, schedule: PollSchedule) -> Self {
        Self {
            gateway: Arc::new(gateway),
            schedule,
        }
    }

    pub fn schedule(&self) -> PollSchedule {
        self.schedule
    }

    /// Create the payment link for `request`. Not retried.
    pub async fn initiate(&self, request: &PaymentRequest) -> Result<PaymentLink, PaymentError> {
        initiator::create_payment_link(self.gateway.as_ref(), request).await
    }

    /// Poll until the payment for `link` reaches a terminal outcome.
    ///
    /// `signals` is the receiving end of the channel the checkout presenter
    /// sends to. Dropping the presenter does not stop polling.
    pub async fn verify(
        &self,
        link: &PaymentLink,
        amount: Decimal,
        signals: CheckoutSignalReceiver,
    ) -> PaymentOutcome {
        let span = info_span!(
            "payment_verification",
            attempt_id = %Uuid::now_v7(),
            order_id = %link.order_id,
        );
        self.run_verification(link.order_id.clone(), amount, signals)
            .instrument(span)
            .await
    }

    async fn run_verification(
        &self,
        order_id: OrderId,
        amount: Decimal,
        mut signals: CheckoutSignalReceiver,
    ) -> PaymentOutcome {
        let (timers, mut fired_rx) = TokioTimers::channel();
        let mut poller = VerificationPoller::new(timers, self.schedule);
        let (result_tx, mut result_rx) = mpsc::channel::<VerifyResult>(DEFAULT_CHANNEL_BUFFER);
        let mut pending_ack = None;

        poller.start(order_id);

        let outcome = loop {
            let outcome = tokio::select! {
                biased;

                // User actions take priority over timers.
                Some(signal) = signals.recv() => match signal {
                    CheckoutSignal::CancelRequested { ack } => {
                        let outcome = poller.cancel();
                        pending_ack = Some(ack);
                        outcome
                    }
                    CheckoutSignal::RedirectFailure { url } => poller.fail_from_checkout(&url),
                    CheckoutSignal::LoadFailed { description } => {
                        warn!(%description, "Checkout load failed, still polling");
                        None
                    }
                },

                Some((order_id, result)) = result_rx.recv() => {
                    poller.handle_verification(&order_id, result)
                }

                Some(fired) = fired_rx.recv() => match poller.handle_fired(fired) {
                    PollerStep::Verify(order_id) => {
                        self.spawn_verify(order_id, result_tx.clone());
                        None
                    }
                    PollerStep::Finished(outcome) => Some(outcome),
                    PollerStep::Idle => None,
                },

                // The poller owns the timer sender and we own the result
                // sender, so this only triggers if the timers went away.
                else => {
                    warn!("Verification channels closed unexpectedly");
                    poller.cancel()
                }
            };

            if let Some(outcome) = outcome {
                break outcome;
            }
        };

        drop(poller);
        if let Some(ack) = pending_ack {
            let _ = ack.send(());
        }

        info!(order_id = %outcome.order_id(), "Payment verification finished");
        PaymentOutcome::from_poll(outcome, amount)
    }

    fn spawn_verify(&self, order_id: OrderId, result_tx: mpsc::Sender<VerifyResult>) {
        let gateway = Arc::clone(&self.gateway);
        tokio::spawn(
            async move {
                let result = gateway.verify_payment(&order_id).await;
                if result_tx.send((order_id, result)).await.is_err() {
                    debug!("Verification finished before verify call returned");
                }
            }
            .in_current_span(),
        );
    }
}
