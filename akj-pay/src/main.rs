//! akj-pay
//!
//! Pays a savings-scheme instalment from the terminal: creates the payment
//! link, shows the hosted checkout URL and waits for the backend to confirm
//! the payment.

mod config;
mod console;
mod shutdown;

use akj_core::events::checkout_signal_channel;
use akj_core::presenter::CheckoutPresenter;
use akj_core::session::{JsonFileStore, SessionContext};
use akj_core::{PaymentError, PaymentFlow, PaymentRequest, Remedy};
use anyhow::Context;
use clap::Parser;
use config::ConfigLoader;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// akj-pay - Pay a jewellery savings-scheme instalment
#[derive(Parser, Debug)]
#[command(name = "akj-pay")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./akj-pay.toml")]
    config: PathBuf,

    /// Override the backend base URL
    #[arg(long, env = "AKJ_BASE_URL")]
    base_url: Option<Url>,

    /// Amount to pay, in rupees
    #[arg(short, long)]
    amount: String,

    /// Scheme registration number
    #[arg(long)]
    regno: String,

    /// Scheme group code
    #[arg(long)]
    group_code: String,

    /// Customer name (defaults to the signed-in user)
    #[arg(long)]
    name: Option<String>,

    /// Customer mobile number (defaults to the signed-in user)
    #[arg(long)]
    contact: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting akj-pay v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let loaded = ConfigLoader::new(&args.config, args.base_url.clone())
        .load()
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?;

    // Load the signed-in session
    let mut store = JsonFileStore::open(&loaded.session_path)
        .with_context(|| format!("failed to open session store {:?}", loaded.session_path))?;
    let session = SessionContext::load(&mut store)?;
    let customer = session.customer();

    let name = args
        .name
        .as_deref()
        .or(customer.as_ref().map(|c| c.name))
        .context("no customer name given and no signed-in user")?;
    let contact = args
        .contact
        .as_deref()
        .or(customer.as_ref().map(|c| c.contact))
        .context("no contact number given and no signed-in user")?;

    let request = match PaymentRequest::from_input(
        &args.amount,
        name,
        contact,
        &args.regno,
        &args.group_code,
    ) {
        Ok(request) => request,
        Err(e) => return Ok(report_failure(&e.into())),
    };

    let client = loaded.flow.payment_client()?;
    let flow = PaymentFlow::new(client, loaded.flow.schedule);

    // Initiator
    let link = match flow.initiate(&request).await {
        Ok(link) => link,
        Err(e) => return Ok(report_failure(&e)),
    };

    // Presenter
    let (signal_tx, signal_rx) = checkout_signal_channel();
    let mut presenter = CheckoutPresenter::new(signal_tx);
    let checkout_url = presenter.open(&link).clone();
    println!("Pay ₹{} at: {}", request.amount(), checkout_url);
    println!("Paste redirect URLs here, or type `cancel` to abandon the payment.");

    // Poller
    let verification = {
        let flow = flow.clone();
        let link = link.clone();
        let amount = request.amount();
        tokio::spawn(async move { flow.verify(&link, amount, signal_rx).await })
    };

    let outcome = console::drive_checkout(&mut presenter, verification).await?;
    match outcome.into_result() {
        Ok(paid) => {
            println!(
                "Payment of ₹{} confirmed (order {}).",
                paid.amount, paid.order_id
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_failure(&e)),
    }
}

/// Print a failed attempt with the follow-up the user should take.
fn report_failure(err: &PaymentError) -> ExitCode {
    tracing::warn!(error = %err, "Payment attempt ended without confirmation");
    match err.remedy() {
        Remedy::Retry => {
            eprintln!("{err}. Please try again.");
            ExitCode::from(1)
        }
        Remedy::CheckManually => {
            eprintln!(
                "{err}. The payment may still complete; check your payment history before paying again."
            );
            ExitCode::from(3)
        }
        Remedy::Dismiss => {
            eprintln!("{err}.");
            ExitCode::from(2)
        }
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper_util=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
