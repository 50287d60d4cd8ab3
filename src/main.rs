use clap::Parser;
use std::path::PathBuf;

use flight_frontend::config::resolve_config;
use flight_frontend::lifecycle;
use flight_frontend::observability::logging;

#[derive(Parser)]
#[command(name = "flight-frontend")]
#[command(about = "Flight tracking front end with request correlation", long_about = None)]
struct Args {
    /// TOML configuration file. Watched for collector endpoint changes.
    #[arg(short, long, env = "FRONTEND_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        bind_address = %config.listener.bind_address,
        flight_service = %config.flight_service.endpoint,
        collector = ?config.telemetry.collector_endpoint,
        "flight-frontend starting"
    );

    lifecycle::run(config, args.config).await?;
    Ok(())
}
