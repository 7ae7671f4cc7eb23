//! Incoming gateway message handling.

use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use crate::types::Activity;

use super::types::{opcodes, GatewayMessage, PresenceEvent};

/// Handle one raw text frame from the gateway.
///
/// Only `op: 0` dispatches are interpreted; their activity list replaces the
/// exposed state wholesale. Every other op is ignored, and malformed payloads
/// are logged and dropped rather than crossing the client boundary.
pub(crate) async fn handle_gateway_message(
    text: &str,
    activities: &Arc<RwLock<Vec<Activity>>>,
    event_tx: &mpsc::Sender<PresenceEvent>,
) {
    let msg = match serde_json::from_str::<GatewayMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(error = %e, "Malformed gateway payload, ignoring");
            return;
        }
    };

    match msg.op {
        opcodes::DISPATCH => {
            let list = match msg.d.get("activities") {
                Some(value) => match serde_json::from_value::<Vec<Activity>>(value.clone()) {
                    Ok(list) => list,
                    Err(e) => {
                        warn!(error = %e, "Unparseable activity list in dispatch, ignoring");
                        return;
                    }
                },
                None => {
                    warn!("Dispatch without activity list, ignoring");
                    return;
                }
            };

            debug!(count = list.len(), "Presence dispatch received");
            *activities.write().await = list.clone();
            let _ = event_tx.send(PresenceEvent::ActivitiesUpdated(list)).await;
        }
        op => {
            debug!(op, "Ignoring gateway op");
        }
    }
}
