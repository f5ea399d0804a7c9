//! Timer abstraction used by the verification poller.
//!
//! A poller only ever holds one interval and one timeout. Handles are moved
//! into [`Timers::clear`], so a handle cannot be cleared twice.

use std::time::Duration;

/// Identity of an armed timer, carried by every fire notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Recurring poll tick.
    Interval,
    /// One-shot overall session deadline.
    Timeout,
}

/// Notification that a timer elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub id: TimerId,
    pub kind: TimerKind,
}

pub trait TimerHandle {
    fn id(&self) -> TimerId;
}

/// Scheduling backend for the poller.
///
/// Fire notifications are delivered out of band (a channel for
/// [`TokioTimers`](super::TokioTimers), an explicit pump for
/// [`ManualTimers`](super::ManualTimers)); the poller matches them against
/// the ids of the handles it still owns and drops the rest.
pub trait Timers {
    type Handle: TimerHandle;

    /// Arm a recurring timer whose first fire is one `period` from now.
    fn set_interval(&mut self, period: Duration) -> Self::Handle;

    /// Arm a one-shot timer.
    fn set_timeout(&mut self, delay: Duration) -> Self::Handle;

    /// Disarm a timer. Clearing an already-elapsed timeout is a no-op.
    fn clear(&mut self, handle: Self::Handle);
}
