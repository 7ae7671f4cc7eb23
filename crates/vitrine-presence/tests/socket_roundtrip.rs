//! End-to-end tests for the socket client against a local WebSocket server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

use vitrine_presence::socket::{PresenceClient, PresenceEvent, SocketConfig, SubscribeTarget};
use vitrine_presence::Activity;

const WAIT: Duration = Duration::from_secs(5);

async fn bind_server() -> (TcpListener, SocketConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = SocketConfig {
        socket_url: format!("ws://{addr}"),
        heartbeat_interval_secs: 1,
        ..Default::default()
    };
    (listener, config)
}

async fn accept_client(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    accept_async(stream).await.unwrap()
}

async fn recv_json(ws: &mut WebSocketStream<TcpStream>) -> serde_json::Value {
    loop {
        let msg = timeout(WAIT, ws.next())
            .await
            .expect("timed out waiting for client frame")
            .expect("connection closed")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

async fn next_update(events: &mut mpsc::Receiver<PresenceEvent>) -> Vec<Activity> {
    loop {
        let event = timeout(WAIT, events.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed");
        if let PresenceEvent::ActivitiesUpdated(list) = event {
            return list;
        }
    }
}

fn activity(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "type": 0,
        "created_at": 1724932801000u64
    })
}

fn dispatch(activities: Vec<serde_json::Value>) -> Message {
    Message::text(serde_json::json!({ "op": 0, "d": { "activities": activities } }).to_string())
}

#[tokio::test]
async fn subscribe_dispatch_replace_and_ignore() {
    let (listener, config) = bind_server().await;
    let (client, mut events) =
        PresenceClient::start("94490510688792576".to_string(), config).unwrap();

    let mut ws = accept_client(&listener).await;

    // First frame is the handshake with the single-target key.
    let handshake = recv_json(&mut ws).await;
    assert_eq!(handshake["op"], 2);
    assert_eq!(handshake["d"]["subscribe_to_id"], "94490510688792576");

    // Dispatch [A, B], then [C]: the exposed list is replaced, not merged.
    ws.send(dispatch(vec![activity("a", "A"), activity("b", "B")]))
        .await
        .unwrap();
    assert_eq!(next_update(&mut events).await.len(), 2);

    // A non-zero op in between must not disturb the state.
    ws.send(Message::text(
        serde_json::json!({ "op": 1, "d": { "heartbeat_interval": 30000 } }).to_string(),
    ))
    .await
    .unwrap();

    ws.send(dispatch(vec![activity("c", "C")])).await.unwrap();
    let update = next_update(&mut events).await;
    assert_eq!(update.len(), 1);
    assert_eq!(update[0].name, "C");
    assert_eq!(client.activities().await, update);
    assert!(client.is_connected().await);

    client.stop().await;
}

#[tokio::test]
async fn collection_target_subscribes_with_ids_key() {
    let (listener, config) = bind_server().await;
    let ids = vec!["1".to_string(), "2".to_string()];
    let (client, _events) =
        PresenceClient::start(SubscribeTarget::Many(ids), config).unwrap();

    let mut ws = accept_client(&listener).await;
    let handshake = recv_json(&mut ws).await;
    assert_eq!(handshake["op"], 2);
    assert_eq!(
        handshake["d"]["subscribe_to_ids"],
        serde_json::json!(["1", "2"])
    );

    client.stop().await;
}

#[tokio::test]
async fn reconnects_and_resubscribes_with_same_target() {
    let (listener, config) = bind_server().await;
    let (client, mut events) = PresenceClient::start("42".to_string(), config).unwrap();

    let mut ws = accept_client(&listener).await;
    let handshake = recv_json(&mut ws).await;
    assert_eq!(handshake["d"]["subscribe_to_id"], "42");

    ws.send(dispatch(vec![activity("a", "A")])).await.unwrap();
    assert_eq!(next_update(&mut events).await.len(), 1);

    // Kill the connection without any close handshake.
    drop(ws);

    // The client reconnects immediately and re-runs the handshake.
    let mut ws2 = accept_client(&listener).await;
    let handshake2 = recv_json(&mut ws2).await;
    assert_eq!(handshake2["op"], 2);
    assert_eq!(handshake2["d"]["subscribe_to_id"], "42");

    // The new connection supersedes the old one as the source of truth.
    ws2.send(dispatch(vec![activity("b", "B")])).await.unwrap();
    let update = next_update(&mut events).await;
    assert_eq!(update[0].name, "B");

    client.stop().await;
}

#[tokio::test]
async fn heartbeat_fires_and_survives_reconnect_without_duplicating() {
    let (listener, config) = bind_server().await;
    let (client, _events) = PresenceClient::start("42".to_string(), config).unwrap();

    let mut ws = accept_client(&listener).await;
    let handshake = recv_json(&mut ws).await;
    assert_eq!(handshake["op"], 2);

    // A heartbeat arrives within the 1s interval (plus slack).
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame, serde_json::json!({ "op": 3 }));

    drop(ws);

    // After the reconnect the same timer keeps ticking on the new socket.
    let mut ws2 = accept_client(&listener).await;
    let handshake2 = recv_json(&mut ws2).await;
    assert_eq!(handshake2["op"], 2);

    // Count heartbeats over ~2.5 intervals: a single timer yields 2-3; a
    // timer duplicated by the reconnect would yield noticeably more.
    let mut heartbeats = 0;
    let deadline = tokio::time::Instant::now() + Duration::from_millis(2500);
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            break;
        }
        match timeout(remaining, ws2.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => {
                let value: serde_json::Value = serde_json::from_str(&text).unwrap();
                if value["op"] == 3 {
                    heartbeats += 1;
                }
            }
            Ok(Some(_)) => {}
            _ => break,
        }
    }
    assert!(
        (1..=3).contains(&heartbeats),
        "expected 1-3 heartbeats, got {heartbeats}"
    );

    client.stop().await;
}

#[tokio::test]
async fn stop_suppresses_reconnects() {
    let (listener, config) = bind_server().await;
    let (client, _events) = PresenceClient::start("42".to_string(), config).unwrap();

    let mut ws = accept_client(&listener).await;
    let handshake = recv_json(&mut ws).await;
    assert_eq!(handshake["op"], 2);

    client.stop().await;
    assert!(!client.is_connected().await);
    drop(ws);

    // No new connection attempt after teardown.
    let result = timeout(Duration::from_millis(700), listener.accept()).await;
    assert!(result.is_err(), "client reconnected after stop()");
}
