//! Simulated clock for driving the poller deterministically.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::timers::{TimerFired, TimerHandle, TimerId, TimerKind, Timers};

/// Counts handles handed out and cleared, shared with the test that owns
/// the [`ManualTimers`] so it survives the poller being dropped.
#[derive(Debug, Default)]
pub struct TimerLedger {
    issued: AtomicU64,
    cleared: AtomicU64,
}

impl TimerLedger {
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn cleared(&self) -> u64 {
        self.cleared.load(Ordering::SeqCst)
    }

    /// Handles issued but not yet cleared.
    pub fn live(&self) -> u64 {
        self.issued() - self.cleared()
    }
}

#[derive(Debug)]
pub struct ManualHandle {
    id: TimerId,
}

impl TimerHandle for ManualHandle {
    fn id(&self) -> TimerId {
        self.id
    }
}

#[derive(Debug)]
struct Scheduled {
    id: TimerId,
    kind: TimerKind,
    due: Duration,
    period: Option<Duration>,
}

/// [`Timers`] backed by a virtual clock that only moves when told to.
///
/// Fires are produced one at a time by [`fire_next`](Self::fire_next), in
/// due order with ties broken by creation order, so a handler that clears a
/// timer prevents any later fire of it.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now: Duration,
    next_id: u64,
    scheduled: Vec<Scheduled>,
    ledger: Arc<TimerLedger>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed virtual time since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn ledger(&self) -> Arc<TimerLedger> {
        Arc::clone(&self.ledger)
    }

    /// Number of timers that can still fire.
    pub fn armed(&self) -> usize {
        self.scheduled.len()
    }

    /// Pop the earliest fire due at or before `until`, moving the clock to
    /// it. When nothing is due the clock moves to `until` and `None` is
    /// returned.
    pub fn fire_next(&mut self, until: Duration) -> Option<TimerFired> {
        let next = self
            .scheduled
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= until)
            .min_by_key(|(_, s)| (s.due, s.id))
            .map(|(idx, _)| idx);

        let Some(idx) = next else {
            self.now = self.now.max(until);
            return None;
        };

        let entry = &mut self.scheduled[idx];
        self.now = entry.due;
        let fired = TimerFired {
            id: entry.id,
            kind: entry.kind,
        };
        let period = entry.period;
        match period {
            Some(period) => entry.due += period,
            None => {
                self.scheduled.swap_remove(idx);
            }
        }
        Some(fired)
    }

    fn arm(&mut self, kind: TimerKind, delay: Duration, period: Option<Duration>) -> ManualHandle {
        self.next_id += 1;
        let id = TimerId::from_raw(self.next_id);
        self.scheduled.push(Scheduled {
            id,
            kind,
            due: self.now + delay,
            period,
        });
        self.ledger.issued.fetch_add(1, Ordering::SeqCst);
        ManualHandle { id }
    }
}

impl Timers for ManualTimers {
    type Handle = ManualHandle;

    fn set_interval(&mut self, period: Duration) -> ManualHandle {
        self.arm(TimerKind::Interval, period, Some(period))
    }

    fn set_timeout(&mut self, delay: Duration) -> ManualHandle {
        self.arm(TimerKind::Timeout, delay, None)
    }

    fn clear(&mut self, handle: ManualHandle) {
        self.scheduled.retain(|s| s.id != handle.id);
        self.ledger.cleared.fetch_add(1, Ordering::SeqCst);
    }
}
