//! Verification Poller.
//!
//! After the checkout is shown, the poller asks the backend for the order's
//! status on a fixed interval until a terminal answer arrives, the user
//! cancels, or the overall session timeout elapses.
//!
//! The poller is a synchronous state machine. It never performs I/O itself:
//! timer fires are fed in through [`VerificationPoller::handle_fired`], which
//! may answer [`PollerStep::Verify`]; the caller performs that call and
//! feeds the result back through [`VerificationPoller::handle_verification`].
//! This keeps every callback strictly sequential and lets tests drive it on a
//! [`ManualTimers`] clock.
//!
//! ```text
//! Idle --start--> Polling --paid--------------> Succeeded
//!                    |  ---failed/cancelled---> Failed
//!                    |  ---checkout failure---> Failed
//!                    |  ---session timeout----> TimedOut
//!                    '  ---cancel()-----------> Cancelled
//! ```
//!
//! A poller owns at most one [`PollingSession`]. Leaving `Polling` for any
//! reason clears both of its timer handles, and dropping the poller does the
//! same.

mod manual;
mod timers;
mod tokio_timers;

pub use manual::{ManualHandle, ManualTimers, TimerLedger};
pub use timers::{TimerFired, TimerHandle, TimerId, TimerKind, Timers};
pub use tokio_timers::{TokioTimerHandle, TokioTimers};

use std::time::Duration;

use akj_sdk::client::ClientError;
use akj_sdk::objects::{OrderId, VerificationStatus, VerifyPaymentResponse};
use tracing::{debug, info, warn};

/// Poll cadence and overall deadline for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval: Duration,
    pub session_timeout: Duration,
}

impl PollSchedule {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(5 * 60);
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            session_timeout: Self::DEFAULT_SESSION_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollerState {
    Idle,
    Polling,
    Succeeded,
    Failed,
    TimedOut,
    Cancelled,
}

impl PollerState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PollerState::Idle | PollerState::Polling)
    }
}

/// Why a session ended in [`PollerState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The verify endpoint reported `failed` or `cancelled`.
    Provider(VerificationStatus),
    /// The checkout page navigated to a failure URL.
    CheckoutRedirect(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Provider(status) => write!(f, "provider reported {status}"),
            FailureReason::CheckoutRedirect(url) => write!(f, "checkout redirected to {url}"),
        }
    }
}

/// Terminal result of a session. Reported exactly once per session.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Paid {
        order_id: OrderId,
        verification: VerifyPaymentResponse,
    },
    Failed {
        order_id: OrderId,
        reason: FailureReason,
    },
    TimedOut {
        order_id: OrderId,
    },
    Cancelled {
        order_id: OrderId,
    },
}

impl PollOutcome {
    pub fn order_id(&self) -> &OrderId {
        match self {
            PollOutcome::Paid { order_id, .. }
            | PollOutcome::Failed { order_id, .. }
            | PollOutcome::TimedOut { order_id }
            | PollOutcome::Cancelled { order_id } => order_id,
        }
    }
}

/// What the caller must do after a timer fire.
#[derive(Debug, Clone, PartialEq)]
pub enum PollerStep {
    /// Nothing to do.
    Idle,
    /// Issue one verify call for this order and report it back.
    Verify(OrderId),
    /// The session just ended.
    Finished(PollOutcome),
}

/// The single live session of a poller.
#[derive(Debug)]
pub struct PollingSession<H> {
    order_id: OrderId,
    interval: H,
    timeout: H,
    started_at: time::OffsetDateTime,
}

impl<H> PollingSession<H> {
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn started_at(&self) -> time::OffsetDateTime {
        self.started_at
    }
}

pub struct VerificationPoller<T: Timers> {
    timers: T,
    schedule: PollSchedule,
    state: PollerState,
    session: Option<PollingSession<T::Handle>>,
    polls: u32,
    in_flight: bool,
}

impl<T: Timers> VerificationPoller<T> {
    pub fn new(timers: T, schedule: PollSchedule) -> Self {
        Self {
            timers,
            schedule,
            state: PollerState::Idle,
            session: None,
            polls: 0,
            in_flight: false,
        }
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    /// Verify calls issued in the current (or last) session.
    pub fn polls_issued(&self) -> u32 {
        self.polls
    }

    pub fn session(&self) -> Option<&PollingSession<T::Handle>> {
        self.session.as_ref()
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    /// Begin polling `order_id`, tearing down any previous session first.
    pub fn start(&mut self, order_id: OrderId) {
        if let Some(previous) = self.teardown() {
            info!(
                previous_order_id = %previous,
                order_id = %order_id,
                "Replacing active verification session"
            );
        }

        let timeout = self.timers.set_timeout(self.schedule.session_timeout);
        let interval = self.timers.set_interval(self.schedule.interval);
        let started_at = time::OffsetDateTime::now_utc();

        info!(
            order_id = %order_id,
            interval = ?self.schedule.interval,
            session_timeout = ?self.schedule.session_timeout,
            "Verification polling started"
        );

        self.session = Some(PollingSession {
            order_id,
            interval,
            timeout,
            started_at,
        });
        self.state = PollerState::Polling;
        self.polls = 0;
        self.in_flight = false;
    }

    /// Route a timer fire. Fires of handles this poller no longer owns are
    /// ignored.
    pub fn handle_fired(&mut self, fired: TimerFired) -> PollerStep {
        let Some(session) = &self.session else {
            debug!(timer = %fired.id, "Ignoring timer fire without active session");
            return PollerStep::Idle;
        };

        if fired.id == session.interval.id() {
            if self.in_flight {
                warn!(
                    order_id = %session.order_id,
                    polls = self.polls,
                    "Previous verify call still in flight, skipping tick"
                );
                return PollerStep::Idle;
            }
            self.in_flight = true;
            self.polls += 1;
            debug!(order_id = %session.order_id, polls = self.polls, "Poll tick");
            PollerStep::Verify(session.order_id.clone())
        } else if fired.id == session.timeout.id() {
            match self.finish(PollerState::TimedOut) {
                Some(order_id) => PollerStep::Finished(PollOutcome::TimedOut { order_id }),
                None => PollerStep::Idle,
            }
        } else {
            debug!(timer = %fired.id, "Ignoring stale timer fire");
            PollerStep::Idle
        }
    }

    /// Apply the result of a verify call issued for `order_id`.
    ///
    /// Transport and parse errors are swallowed: polling continues until a
    /// terminal status or the session timeout. Results for another order, or
    /// arriving after the session ended, are dropped.
    pub fn handle_verification(
        &mut self,
        order_id: &OrderId,
        result: Result<VerifyPaymentResponse, ClientError>,
    ) -> Option<PollOutcome> {
        match &self.session {
            Some(session) if session.order_id == *order_id => {}
            _ => {
                debug!(order_id = %order_id, "Dropping verify result for inactive session");
                return None;
            }
        }
        self.in_flight = false;

        let verification = match result {
            Ok(verification) => verification,
            Err(e) => {
                warn!(order_id = %order_id, error = %e, "Verify call failed, will retry on next tick");
                return None;
            }
        };

        match verification.status {
            VerificationStatus::Paid => {
                let order_id = self.finish(PollerState::Succeeded)?;
                Some(PollOutcome::Paid {
                    order_id,
                    verification,
                })
            }
            status @ (VerificationStatus::Failed | VerificationStatus::Cancelled) => {
                let order_id = self.finish(PollerState::Failed)?;
                Some(PollOutcome::Failed {
                    order_id,
                    reason: FailureReason::Provider(status),
                })
            }
            VerificationStatus::Pending => {
                debug!(order_id = %order_id, polls = self.polls, "Payment still pending");
                None
            }
        }
    }

    /// User-initiated stop. Both timers are cleared before this returns.
    pub fn cancel(&mut self) -> Option<PollOutcome> {
        let order_id = self.finish(PollerState::Cancelled)?;
        Some(PollOutcome::Cancelled { order_id })
    }

    /// End the session because the checkout navigated to a failure page.
    pub fn fail_from_checkout(&mut self, url: &str) -> Option<PollOutcome> {
        let order_id = self.finish(PollerState::Failed)?;
        Some(PollOutcome::Failed {
            order_id,
            reason: FailureReason::CheckoutRedirect(url.to_string()),
        })
    }

    /// Move from `Polling` to `terminal`, returning the session's order id.
    /// Does nothing outside `Polling`.
    fn finish(&mut self, terminal: PollerState) -> Option<OrderId> {
        if self.state != PollerState::Polling {
            return None;
        }
        let order_id = self.teardown()?;
        self.state = terminal;
        info!(order_id = %order_id, state = ?terminal, polls = self.polls, "Verification session ended");
        Some(order_id)
    }

    fn teardown(&mut self) -> Option<OrderId> {
        let session = self.session.take()?;
        self.timers.clear(session.interval);
        self.timers.clear(session.timeout);
        self.in_flight = false;
        Some(session.order_id)
    }
}

impl<T: Timers> Drop for VerificationPoller<T> {
    fn drop(&mut self) {
        if let Some(order_id) = self.teardown() {
            debug!(order_id = %order_id, "Verification session torn down on drop");
        }
    }
}
