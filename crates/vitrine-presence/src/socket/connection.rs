//! Background WebSocket connection loop with auto-reconnect.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::types::Activity;

use super::handler::handle_gateway_message;
use super::types::{heartbeat_envelope, PresenceEvent, SocketConfig, SubscribeTarget};

pub(crate) type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;

/// The current connection's write half. Reassigned wholesale on reconnect:
/// the previous sink is abandoned without a close handshake and the new one
/// supersedes it as the sole target for outbound frames.
pub(crate) type SharedSink = Arc<Mutex<Option<WsSink>>>;

// ---------------------------------------------------------------------------
// Connection Loop
// ---------------------------------------------------------------------------

/// Background task managing the WebSocket connection.
///
/// Each pass connects, sends the subscription handshake, publishes the write
/// half for the heartbeat task, and drains inbound frames until the
/// connection drops. Reconnects follow the configured policy; the default is
/// immediate and unlimited.
pub(crate) async fn connection_loop(
    config: SocketConfig,
    target: SubscribeTarget,
    sink: SharedSink,
    activities: Arc<RwLock<Vec<Activity>>>,
    connected: Arc<RwLock<bool>>,
    event_tx: mpsc::Sender<PresenceEvent>,
) {
    let mut reconnect_delay = config.reconnect_delay_secs;
    let mut failed_attempts: u32 = 0;

    loop {
        info!(url = %config.socket_url, "Connecting to presence service");

        match tokio::time::timeout(
            Duration::from_secs(15),
            tokio_tungstenite::connect_async(&config.socket_url),
        )
        .await
        {
            Ok(Ok((ws_stream, _))) => {
                reconnect_delay = config.reconnect_delay_secs;
                failed_attempts = 0;

                let (mut ws_write, mut ws_read) = ws_stream.split();

                // Subscription handshake goes out first, before the sink is
                // shared with the heartbeat task.
                let envelope = target.subscribe_envelope().to_string();
                if let Err(e) = ws_write.send(WsMessage::Text(envelope.into())).await {
                    warn!(error = %e, "Failed to send subscribe handshake");
                    let _ = event_tx
                        .send(PresenceEvent::Error(format!("Handshake failed: {e}")))
                        .await;
                    failed_attempts += 1;
                } else {
                    *sink.lock().await = Some(ws_write);
                    *connected.write().await = true;
                    let _ = event_tx.send(PresenceEvent::Connected).await;
                    debug!("Subscribed to presence updates");

                    while let Some(msg_result) = ws_read.next().await {
                        match msg_result {
                            Ok(WsMessage::Text(text)) => {
                                handle_gateway_message(&text, &activities, &event_tx).await;
                            }
                            Ok(WsMessage::Close(_)) => {
                                info!("Presence service closed connection");
                                break;
                            }
                            Err(e) => {
                                warn!(error = %e, "WebSocket error");
                                break;
                            }
                            _ => {}
                        }
                    }

                    *connected.write().await = false;
                    let _ = event_tx.send(PresenceEvent::Disconnected).await;
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to connect to presence service");
                let _ = event_tx
                    .send(PresenceEvent::Error(format!("Connection failed: {e}")))
                    .await;
                failed_attempts += 1;
            }
            Err(_elapsed) => {
                warn!("WebSocket connection timed out after 15s");
                let _ = event_tx
                    .send(PresenceEvent::Error(
                        "Connection timed out after 15s".to_string(),
                    ))
                    .await;
                failed_attempts += 1;
            }
        }

        if let Some(max) = config.max_reconnect_attempts {
            if failed_attempts > max {
                warn!(attempts = failed_attempts, "Reconnect budget exhausted, giving up");
                let _ = event_tx
                    .send(PresenceEvent::Error("Reconnect budget exhausted".to_string()))
                    .await;
                return;
            }
        }

        if reconnect_delay > 0 {
            info!(delay = reconnect_delay, "Reconnecting in {} seconds", reconnect_delay);
            tokio::time::sleep(Duration::from_secs(reconnect_delay)).await;
            reconnect_delay = (reconnect_delay * 2).min(config.max_reconnect_delay_secs);
        }
    }
}

// ---------------------------------------------------------------------------
// Heartbeat
// ---------------------------------------------------------------------------

/// Recurring `{op: 3}` sender. Spawned once per client and never restarted:
/// reconnects neither cancel nor duplicate it. A tick while the socket is
/// down or not yet open is a silent no-op.
pub(crate) async fn heartbeat_task(sink: SharedSink, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    // The first tick of a tokio interval completes immediately; skip it so
    // heartbeats start one full period after the client comes up.
    interval.tick().await;

    loop {
        interval.tick().await;
        let mut guard = sink.lock().await;
        if let Some(writer) = guard.as_mut() {
            let envelope = heartbeat_envelope().to_string();
            // Sends against a dead connection are tolerated; the read loop
            // notices the drop and triggers the reconnect.
            if let Err(e) = writer.send(WsMessage::Text(envelope.into())).await {
                debug!(error = %e, "Heartbeat send failed");
            }
        }
    }
}
