//! Event type definitions.

use tokio::sync::oneshot;

/// Events relayed by the checkout presenter to the flow runner.
#[derive(Debug)]
pub enum CheckoutSignal {
    /// The checkout page failed to load. Informational; polling continues.
    LoadFailed { description: String },
    /// The checkout navigated to a failure or cancellation URL.
    RedirectFailure { url: String },
    /// The user confirmed cancellation. `ack` fires once the polling
    /// session has been torn down.
    CancelRequested { ack: oneshot::Sender<()> },
}
