//! vitrine: command-line front for the portfolio's presence and sponsorship
//! services. Stands in for the website's rendering layer: streams activity
//! updates to stdout, or runs the passthrough calls once.

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use vitrine_presence::{PresenceClient, PresenceEvent, RestClient, SocketConfig, SubscribeTarget};
use vitrine_sponsors::{SponsorsClient, SponsorsConfig};

#[derive(Parser)]
#[command(name = "vitrine", about = "Portfolio presence and sponsorship services")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Watch live presence for one or more Discord user ids.
    Watch {
        /// User id(s) to subscribe to.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Fetch a single snapshot over REST instead of streaming.
        #[arg(long)]
        rest: bool,

        /// Heartbeat interval in seconds.
        #[arg(long, default_value_t = 25)]
        heartbeat: u64,
    },
    /// Fetch the GitHub sponsor list once (reads GITHUB_TOKEN).
    Sponsors,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitrine=info,vitrine_presence=info,vitrine_sponsors=info".into()),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Command::Watch { ids, rest, heartbeat } => {
            if rest {
                fetch_snapshots(&ids).await;
            } else {
                watch(ids, heartbeat).await;
            }
        }
        Command::Sponsors => sponsors().await,
    }
}

async fn watch(ids: Vec<String>, heartbeat: u64) {
    let target = if ids.len() == 1 {
        SubscribeTarget::One(ids.into_iter().next().unwrap())
    } else {
        SubscribeTarget::Many(ids)
    };
    let config = SocketConfig {
        heartbeat_interval_secs: heartbeat,
        ..Default::default()
    };

    let (_client, mut events) = match PresenceClient::start(target, config) {
        Ok(started) => started,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start presence client");
            std::process::exit(1);
        }
    };

    while let Some(event) = events.recv().await {
        match event {
            PresenceEvent::Connected => info!("Connected to presence service"),
            PresenceEvent::Disconnected => warn!("Connection lost, reconnecting"),
            PresenceEvent::ActivitiesUpdated(activities) => {
                match serde_json::to_string_pretty(&activities) {
                    Ok(json) => println!("{json}"),
                    Err(e) => warn!(error = %e, "Failed to render activities"),
                }
            }
            PresenceEvent::Error(message) => warn!(%message, "Presence error"),
        }
    }
}

async fn fetch_snapshots(ids: &[String]) {
    let client = RestClient::new();
    let mut failed = false;
    for id in ids {
        match client.fetch(id).await {
            Ok(data) => match serde_json::to_string_pretty(&data) {
                Ok(json) => println!("{json}"),
                Err(e) => warn!(error = %e, "Failed to render snapshot"),
            },
            Err(e) => {
                tracing::error!(user_id = %id, error = %e, "Presence lookup failed");
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}

async fn sponsors() {
    let client = match SponsorsConfig::from_env().map(SponsorsClient::new) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(status = e.status_code(), error = %e, "Sponsors unavailable");
            std::process::exit(1);
        }
    };

    match client.fetch_sponsors().await {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render sponsors");
                std::process::exit(1);
            }
        },
        Err(e) => {
            tracing::error!(status = e.status_code(), error = %e, "Failed to fetch sponsors");
            std::process::exit(1);
        }
    }
}
