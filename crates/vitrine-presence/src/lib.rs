//! Presence client for the portfolio's live status widget.
//!
//! Talks to a Lanyard-compatible presence service two ways:
//! - [`socket`]: a persistent WebSocket subscription with heartbeat and
//!   auto-reconnect, continuously exposing the latest activity list.
//! - [`rest`]: a one-shot snapshot lookup over plain HTTP.
//!
//! The widget is decorative: on failure it simply stops updating, and the
//! socket client retries forever by default.

pub mod rest;
pub mod socket;
pub mod types;

pub use rest::RestClient;
pub use socket::{PresenceClient, PresenceEvent, SocketConfig, SubscribeTarget};
pub use types::{Activity, DiscordStatus, DiscordUser, PresenceData};

#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    #[error("Missing subscription target")]
    MissingTarget,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
