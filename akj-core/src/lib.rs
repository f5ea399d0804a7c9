#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod error;
pub mod events;
pub mod flow;
pub mod gateway;
pub mod initiator;
pub mod poller;
pub mod presenter;
pub mod request;
pub mod session;

pub use error::{PaymentError, Remedy, ValidationError};
pub use flow::{PaidPayment, PaymentFlow, PaymentOutcome};
pub use request::PaymentRequest;
