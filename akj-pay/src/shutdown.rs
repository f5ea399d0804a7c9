//! Signal handling.

/// Completes when the user interrupts the process (SIGINT / Ctrl+C).
///
/// An interrupt is treated as a cancellation request, which still goes
/// through the confirmation prompt.
pub async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received SIGINT, requesting cancellation");
}
