//! Votes Tabulator Main Entry Point
//!
//! Loads configuration, connects to PostgreSQL and runs a single command,
//! printing its result as JSON.

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use votes_tabulator::cli::{self, Cli};
use votes_tabulator::{Dependencies, LogFormat, TabulatorAppError, TabulatorConfig};

/// Initialize tracing/logging.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("votes_tabulator=info,votes_tabulator_engine=info"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr)
                        .pretty(),
                )
                .init();
        }
    }

    info!(
        service_name = "votes-tabulator",
        service_version = env!("CARGO_PKG_VERSION"),
        log_format = ?format,
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), TabulatorAppError> {
    dotenv().ok();

    let args = Cli::parse_args();
    let config = TabulatorConfig::from_env()?;
    init_tracing(config.log_format);

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => deps,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match cli::run(&args.command, &deps).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, command = ?args.command, "Command failed");
            Err(e)
        }
    }
}
