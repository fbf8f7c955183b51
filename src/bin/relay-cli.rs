use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Client for a running ICS relay", long_about = None)]
struct Cli {
    /// Base URL of the relay.
    #[arg(short, long, default_value = "http://localhost:8080")]
    relay: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a calendar through the relay and print it
    Fetch {
        /// Calendar URL to relay
        url: String,
    },
    /// Check relay liveness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.relay.trim_end_matches('/');

    let res = match &cli.command {
        Commands::Fetch { url } => {
            client
                .get(format!("{base}/api/fetch-ics"))
                .query(&[("url", url)])
                .send()
                .await?
        }
        Commands::Health => client.get(format!("{base}/health")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let request_id = res
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let body = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: relay returned status {status} (request {request_id})");
        eprintln!("Response: {body}");
        std::process::exit(1);
    }

    print!("{body}");
    Ok(())
}
