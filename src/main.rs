//! ICS relay server.
//!
//! ```text
//!   browser ── GET /api/fetch-ics?url=… ──▶ ics-relay ── GET … ──▶ calendar host
//!           ◀── text/calendar body ────────           ◀── .ics ───
//! ```

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "ics-relay", version)]
#[command(about = "Relays remote iCalendar feeds for browser clients", long_about = None)]
struct Cli {
    /// TOML configuration file; watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    ics_relay::lifecycle::startup::start(cli.config.as_deref()).await?;
    Ok(())
}
