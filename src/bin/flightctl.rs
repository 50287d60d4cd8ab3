use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

use flight_frontend::correlation::{ActivityId, REQUEST_ID_HEADER};
use flight_frontend::http::handlers::START_NEW_FLIGHT;

#[derive(Parser)]
#[command(name = "flightctl")]
#[command(about = "Operator CLI for the flight front end", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    /// Start a trace here and send it as `Request-Id`.
    #[arg(short, long)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether monitoring is running
    Status,
    /// Start a new flight
    Start {
        #[arg(long)]
        departure: String,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        callsign: String,
    },
    /// Toggle flight monitoring
    Monitor,
    /// Check the health endpoint
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if cli.trace {
        let activity = ActivityId::root();
        eprintln!("Trace root: {}", activity.root_id());
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(activity.id())?);
    }

    let base = cli.url.trim_end_matches('/');
    let res = match cli.command {
        Commands::Status => client.get(format!("{}/", base)).headers(headers).send().await?,
        Commands::Start {
            departure,
            destination,
            callsign,
        } => {
            let form = [
                ("vote", START_NEW_FLIGHT.to_string()),
                ("departure", departure),
                ("destination", destination),
                ("callsign", callsign),
            ];
            client
                .post(format!("{}/", base))
                .headers(headers)
                .form(&form)
                .send()
                .await?
        }
        Commands::Monitor => {
            client
                .post(format!("{}/", base))
                .headers(headers)
                .form(&[("vote", "showFlights")])
                .send()
                .await?
        }
        Commands::Health => {
            client
                .get(format!("{}/health", base))
                .headers(headers)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if let Some(request_id) = res.headers().get(REQUEST_ID_HEADER) {
        eprintln!("Request-Id: {}", request_id.to_str().unwrap_or("<binary>"));
    }

    if !status.is_success() {
        eprintln!("Error: front end returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
