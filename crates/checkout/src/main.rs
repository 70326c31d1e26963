//! Checkout entry point.

use std::process::ExitCode;

use checkout::config::Config;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> ExitCode {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // 2. Bootstrap the container
    let (payments, _gateway, _tokens) = checkout::create_payments(&config);

    // 3. Run the payment attempt
    let request = std::env::args()
        .nth(1)
        .unwrap_or_else(|| checkout::DEFAULT_REQUEST.to_string());

    match checkout::run(&payments, &request) {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "payment failed");
            ExitCode::FAILURE
        }
    }
}
