//! Streaming presence client over a Lanyard-style gateway.
//!
//! Subscribes to one or more user ids with an `{op: 2}` handshake, replaces
//! the exposed activity list on every `{op: 0}` dispatch, keeps the link
//! alive with `{op: 3}` heartbeats, and reconnects automatically when the
//! connection drops.

mod client;
mod connection;
mod handler;
mod types;

pub use client::PresenceClient;
pub use types::{
    opcodes, GatewayMessage, PresenceEvent, SocketConfig, SubscribeTarget, DEFAULT_SOCKET_URL,
};
