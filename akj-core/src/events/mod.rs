//! Messages exchanged between the checkout presenter, the timers and the
//! flow runner.
//!
//! # Event Flow
//!
//! 1. `TimerFired` (interval / timeout) -> flow runner -> `VerificationPoller`
//! 2. `CheckoutSignal` (presenter) -> flow runner -> `VerificationPoller`
//!
//! The runner consumes both streams in one task, so poller callbacks never
//! overlap.

pub mod channels;
pub mod types;

pub use channels::{
    CheckoutSignalReceiver, CheckoutSignalSender, DEFAULT_CHANNEL_BUFFER, TimerFiredReceiver,
    TimerFiredSender, checkout_signal_channel, timer_fired_channel,
};
pub use types::CheckoutSignal;
