//! [`Timers`] on the tokio clock.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::timers::{TimerFired, TimerHandle, TimerId, TimerKind, Timers};
use crate::events::{TimerFiredReceiver, TimerFiredSender, timer_fired_channel};

/// Each armed timer is a spawned task that sends [`TimerFired`] into a
/// channel; clearing aborts the task.
///
/// A fire already queued in the channel when its timer is cleared is still
/// delivered, which is why the poller matches fires against live handles.
#[derive(Debug)]
pub struct TokioTimers {
    next_id: u64,
    fired_tx: TimerFiredSender,
}

#[derive(Debug)]
pub struct TokioTimerHandle {
    id: TimerId,
    task: JoinHandle<()>,
}

impl TimerHandle for TokioTimerHandle {
    fn id(&self) -> TimerId {
        self.id
    }
}

impl TokioTimers {
    /// Create the timers together with the receiver their fires arrive on.
    pub fn channel() -> (Self, TimerFiredReceiver) {
        let (fired_tx, fired_rx) = timer_fired_channel();
        (
            Self {
                next_id: 0,
                fired_tx,
            },
            fired_rx,
        )
    }

    fn next_id(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId::from_raw(self.next_id)
    }
}

impl Timers for TokioTimers {
    type Handle = TokioTimerHandle;

    fn set_interval(&mut self, period: Duration) -> TokioTimerHandle {
        let id = self.next_id();
        let tx: mpsc::Sender<TimerFired> = self.fired_tx.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let fired = TimerFired {
                    id,
                    kind: TimerKind::Interval,
                };
                if tx.send(fired).await.is_err() {
                    return;
                }
            }
        });
        TokioTimerHandle { id, task }
    }

    fn set_timeout(&mut self, delay: Duration) -> TokioTimerHandle {
        let id = self.next_id();
        let tx = self.fired_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx
                .send(TimerFired {
                    id,
                    kind: TimerKind::Timeout,
                })
                .await;
        });
        TokioTimerHandle { id, task }
    }

    fn clear(&mut self, handle: TokioTimerHandle) {
        handle.task.abort();
    }
}
