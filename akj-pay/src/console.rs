//! Terminal stand-in for the embedded checkout view.
//!
//! The user completes the payment in a browser and reports back through
//! stdin:
//!
//! - a pasted URL is treated as a navigation inside the checkout;
//! - `error <description>` reports that the page failed to load;
//! - `cancel` (or Ctrl+C) asks to abandon the payment.

use akj_core::PaymentOutcome;
use akj_core::presenter::{CancelDecision, CancelPrompt, CheckoutPresenter, NavigationVerdict};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::task::JoinHandle;

use crate::shutdown::interrupt_signal;

type StdinLines = Lines<BufReader<Stdin>>;

enum ConsoleEvent {
    Finished(PaymentOutcome),
    Interrupted,
    Line(Option<String>),
}

/// Yes/no prompt answered on stdin.
struct LinePrompt<'a> {
    lines: &'a mut StdinLines,
}

#[async_trait]
impl CancelPrompt for LinePrompt<'_> {
    async fn confirm_cancel(&mut self, title: &str, message: &str) -> bool {
        println!("{title}: {message} [y/N]");
        match self.lines.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

/// Relay stdin to `presenter` until `verification` finishes.
pub async fn drive_checkout(
    presenter: &mut CheckoutPresenter,
    mut verification: JoinHandle<PaymentOutcome>,
) -> anyhow::Result<PaymentOutcome> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        let event = tokio::select! {
            outcome = &mut verification => ConsoleEvent::Finished(outcome?),
            _ = interrupt_signal() => ConsoleEvent::Interrupted,
            line = lines.next_line(), if stdin_open => ConsoleEvent::Line(line?),
        };

        match event {
            ConsoleEvent::Finished(outcome) => {
                presenter.close();
                return Ok(outcome);
            }
            ConsoleEvent::Interrupted => {
                cancel(presenter, &mut lines).await;
            }
            ConsoleEvent::Line(None) => {
                tracing::debug!("stdin closed, waiting for verification");
                stdin_open = false;
            }
            ConsoleEvent::Line(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("cancel") {
                    cancel(presenter, &mut lines).await;
                } else if let Some(description) = line.strip_prefix("error ") {
                    presenter.on_load_error(description.trim()).await;
                } else {
                    match presenter.on_navigation(line).await {
                        NavigationVerdict::ReportedSuccess => {
                            println!("Checkout reports success, confirming with the server...");
                        }
                        NavigationVerdict::Failure => {
                            println!("Checkout reports the payment failed.");
                        }
                        NavigationVerdict::Continue | NavigationVerdict::Ignored => {}
                    }
                }
            }
        }
    }
}

async fn cancel(presenter: &mut CheckoutPresenter, lines: &mut StdinLines) {
    let mut prompt = LinePrompt { lines };
    match presenter.request_cancel(&mut prompt).await {
        CancelDecision::Kept => println!("Continuing to wait for the payment."),
        CancelDecision::Cancelled | CancelDecision::NotOpen => {}
    }
}
