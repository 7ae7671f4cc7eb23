//! Public handle for the presence socket connection.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::types::Activity;
use crate::PresenceError;

use super::connection::{connection_loop, heartbeat_task, SharedSink};
use super::types::{PresenceEvent, SocketConfig, SubscribeTarget};

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Handle for a live presence subscription.
///
/// `start` spawns two background tasks: the connection loop (connect,
/// subscribe, read, reconnect) and a single heartbeat timer that outlives
/// individual connections. The most recently dispatched activity list is
/// always available through [`activities`](Self::activities).
pub struct PresenceClient {
    /// Latest activity list, replaced wholesale on every dispatch.
    activities: Arc<RwLock<Vec<Activity>>>,
    connected: Arc<RwLock<bool>>,
    connection: JoinHandle<()>,
    heartbeat: JoinHandle<()>,
}

impl PresenceClient {
    /// Start a subscription. Returns the client and a receiver for presence
    /// events.
    ///
    /// Fails synchronously, before any network activity, when `target` is
    /// empty. Must be called from within a tokio runtime.
    pub fn start(
        target: impl Into<SubscribeTarget>,
        config: SocketConfig,
    ) -> Result<(Self, mpsc::Receiver<PresenceEvent>), PresenceError> {
        let target = target.into();
        if target.is_empty() {
            return Err(PresenceError::MissingTarget);
        }

        let (event_tx, event_rx) = mpsc::channel(256);
        let activities = Arc::new(RwLock::new(Vec::new()));
        let connected = Arc::new(RwLock::new(false));
        let sink: SharedSink = Arc::new(Mutex::new(None));

        let connection = tokio::spawn(connection_loop(
            config.clone(),
            target,
            Arc::clone(&sink),
            Arc::clone(&activities),
            Arc::clone(&connected),
            event_tx,
        ));

        // One heartbeat for the client's lifetime; reconnects never touch it.
        let heartbeat = tokio::spawn(heartbeat_task(sink, config.heartbeat_interval_secs));

        let client = Self {
            activities,
            connected,
            connection,
            heartbeat,
        };
        Ok((client, event_rx))
    }

    /// The most recently received activity list.
    pub async fn activities(&self) -> Vec<Activity> {
        self.activities.read().await.clone()
    }

    /// Whether a subscribed connection is currently up. Note that a dead
    /// connection is only detected when the read loop observes it; between
    /// those points stale data is the only symptom.
    pub async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }

    /// Tear the client down: cancels the heartbeat timer and suppresses any
    /// further reconnect attempts. The last activity list stays readable.
    pub async fn stop(&self) {
        self.heartbeat.abort();
        self.connection.abort();
        *self.connected.write().await = false;
    }
}

impl Drop for PresenceClient {
    fn drop(&mut self) {
        self.heartbeat.abort();
        self.connection.abort();
    }
}
