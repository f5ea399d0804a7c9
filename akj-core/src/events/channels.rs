//! Event channel factories and handles.

use super::types::CheckoutSignal;
use crate::poller::TimerFired;
use tokio::sync::mpsc;

/// Default buffer size for event channels.
pub const DEFAULT_CHANNEL_BUFFER: usize = 64;

/// Sender handle for CheckoutSignal events.
pub type CheckoutSignalSender = mpsc::Sender<CheckoutSignal>;
/// Receiver handle for CheckoutSignal events.
pub type CheckoutSignalReceiver = mpsc::Receiver<CheckoutSignal>;

/// Sender handle for TimerFired events.
pub type TimerFiredSender = mpsc::Sender<TimerFired>;
/// Receiver handle for TimerFired events.
pub type TimerFiredReceiver = mpsc::Receiver<TimerFired>;

/// Create a new CheckoutSignal channel.
///
/// The sender goes to the [`CheckoutPresenter`](crate::presenter::CheckoutPresenter),
/// the receiver to [`PaymentFlow::verify`](crate::flow::PaymentFlow::verify).
pub fn checkout_signal_channel() -> (CheckoutSignalSender, CheckoutSignalReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

/// Create a new TimerFired channel.
pub fn timer_fired_channel() -> (TimerFiredSender, TimerFiredReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
