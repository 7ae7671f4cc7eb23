//! Configuration, gateway envelope, and event types for the socket client.

use serde::{Deserialize, Serialize};

use crate::types::Activity;

/// Default Lanyard-compatible socket endpoint.
pub const DEFAULT_SOCKET_URL: &str = "wss://api.lanyard.rest/socket";

/// Gateway opcodes used by this client. Inbound ops other than `DISPATCH`
/// are ignored.
pub mod opcodes {
    /// Server push carrying a full presence snapshot.
    pub const DISPATCH: u8 = 0;
    /// Client subscription handshake.
    pub const SUBSCRIBE: u8 = 2;
    /// Client liveness signal; no reply expected.
    pub const HEARTBEAT: u8 = 3;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the presence socket connection.
///
/// The defaults reproduce the behavior of the original widget: a 25 second
/// heartbeat and immediate, unlimited reconnects.
#[derive(Debug, Clone)]
pub struct SocketConfig {
    /// WebSocket endpoint of the presence service.
    pub socket_url: String,
    /// Heartbeat interval in seconds. The timer lives for the whole client,
    /// not for a single connection.
    pub heartbeat_interval_secs: u64,
    /// Base delay before a reconnect attempt, in seconds. 0 reconnects
    /// immediately.
    pub reconnect_delay_secs: u64,
    /// Cap for the doubling reconnect delay, in seconds.
    pub max_reconnect_delay_secs: u64,
    /// Maximum consecutive failed reconnect attempts before the client gives
    /// up. `None` retries forever.
    pub max_reconnect_attempts: Option<u32>,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            socket_url: DEFAULT_SOCKET_URL.to_string(),
            heartbeat_interval_secs: 25,
            reconnect_delay_secs: 0,
            max_reconnect_delay_secs: 0,
            max_reconnect_attempts: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Subscription Target
// ---------------------------------------------------------------------------

/// Who to subscribe to: a single user id or a set of ids. The choice selects
/// the handshake key (`subscribe_to_id` vs `subscribe_to_ids`).
#[derive(Debug, Clone)]
pub enum SubscribeTarget {
    One(String),
    Many(Vec<String>),
}

impl SubscribeTarget {
    /// True when there is nothing to subscribe to (empty id or empty set).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(id) => id.is_empty(),
            Self::Many(ids) => ids.is_empty() || ids.iter().all(String::is_empty),
        }
    }

    /// Build the `{op: 2, d: {...}}` handshake envelope.
    pub(crate) fn subscribe_envelope(&self) -> serde_json::Value {
        let d = match self {
            Self::One(id) => serde_json::json!({ "subscribe_to_id": id }),
            Self::Many(ids) => serde_json::json!({ "subscribe_to_ids": ids }),
        };
        serde_json::json!({ "op": opcodes::SUBSCRIBE, "d": d })
    }
}

impl From<String> for SubscribeTarget {
    fn from(id: String) -> Self {
        Self::One(id)
    }
}

impl From<Vec<String>> for SubscribeTarget {
    fn from(ids: Vec<String>) -> Self {
        Self::Many(ids)
    }
}

/// Build the `{op: 3}` heartbeat envelope.
pub(crate) fn heartbeat_envelope() -> serde_json::Value {
    serde_json::json!({ "op": opcodes::HEARTBEAT })
}

// ---------------------------------------------------------------------------
// Gateway Envelope
// ---------------------------------------------------------------------------

/// A gateway message envelope: `{op, d}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub op: u8,
    #[serde(default)]
    pub d: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events emitted by the presence client for the rendering layer to consume.
#[derive(Debug, Clone)]
pub enum PresenceEvent {
    /// Socket opened and the subscription handshake was sent.
    Connected,
    /// Connection lost; a reconnect follows per the configured policy.
    Disconnected,
    /// A dispatch arrived; this list has fully replaced the previous one.
    ActivitiesUpdated(Vec<Activity>),
    /// Non-fatal transport error.
    Error(String),
}
