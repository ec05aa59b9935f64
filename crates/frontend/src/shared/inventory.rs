//! Live inventory feed.
//!
//! Listens on the backend WebSocket for `inventory:update` events and
//! hands the decoded patches to the subscriber. The connection reconnects
//! with a fixed delay until the subscription guard is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use contracts::offer::InventoryPatch;
use futures::StreamExt;
use gloo_net::websocket::futures::WebSocket;
use gloo_net::websocket::Message;
use gloo_timers::future::TimeoutFuture;
use leptos::task::spawn_local;
use serde::Deserialize;
use serde_json::Value;

use super::api_utils::ws_url;

const RECONNECT_DELAY_MS: u32 = 5_000;

#[derive(Debug, Deserialize)]
struct WsEvent {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Dropping the guard stops the listener at the next frame or reconnect.
pub struct InventorySubscription {
    alive: Arc<AtomicBool>,
}

impl Drop for InventorySubscription {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Relaxed);
    }
}

/// Start listening for inventory patches. Keep the returned guard alive
/// for as long as the page cares about updates.
pub fn subscribe(on_patch: impl Fn(InventoryPatch) + 'static) -> InventorySubscription {
    let alive = Arc::new(AtomicBool::new(true));
    let flag = alive.clone();

    spawn_local(async move {
        while flag.load(Ordering::Relaxed) {
            match WebSocket::open(&ws_url()) {
                Ok(mut socket) => {
                    while let Some(frame) = socket.next().await {
                        if !flag.load(Ordering::Relaxed) {
                            return;
                        }
                        let Ok(Message::Text(text)) = frame else {
                            continue;
                        };
                        if let Some(patch) = decode_frame(&text) {
                            on_patch(patch);
                        }
                    }
                    log::warn!("inventory socket closed, reconnecting");
                }
                Err(err) => log::warn!("inventory socket failed to open: {err:?}"),
            }
            if !flag.load(Ordering::Relaxed) {
                return;
            }
            TimeoutFuture::new(RECONNECT_DELAY_MS).await;
        }
    });

    InventorySubscription { alive }
}

/// Decode one text frame; anything that is not a well-formed
/// `inventory:update` event is ignored.
fn decode_frame(text: &str) -> Option<InventoryPatch> {
    let event: WsEvent = serde_json::from_str(text).ok()?;
    if event.event != "inventory:update" {
        return None;
    }
    match serde_json::from_value::<InventoryPatch>(event.data) {
        Ok(patch) => Some(patch),
        Err(err) => {
            log::warn!("malformed inventory payload: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_inventory_events_only() {
        let patch = decode_frame(
            r#"{"event":"inventory:update","data":{"offerItemId":"i1","availableQuantity":4,"reservedQuantity":6}}"#,
        )
        .unwrap();
        assert_eq!(patch.offer_item_id, "i1");
        assert_eq!(patch.available_quantity, 4);
        assert_eq!(patch.reserved_quantity, 6);

        assert!(decode_frame(r#"{"event":"deal:update","data":{}}"#).is_none());
        assert!(decode_frame("not json").is_none());
    }
}
