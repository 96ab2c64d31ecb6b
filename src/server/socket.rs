use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::protocol::{ClientEvent, ServerEvent};

use super::{AppState, EventLoopHandle};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.events))
}

/// Pump one WebSocket: frames in become commands, events out become frames.
///
/// Reports the disconnect exactly once, after the read side ends.
async fn handle_socket(socket: WebSocket, events: EventLoopHandle) {
    let (mut sender, mut receiver) = socket.split();
    let (tx_out, mut rx_out) = mpsc::unbounded_channel::<ServerEvent>();

    let Some(id) = events.connect(tx_out).await else {
        warn!("event loop unavailable, closing socket");
        return;
    };

    tokio::spawn(async move {
        while let Some(event) = rx_out.recv().await {
            let text = match event.to_json() {
                Ok(text) => text,
                Err(error) => {
                    warn!(connection = %id, %error, "failed to encode event");
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => match ClientEvent::from_json(text.as_str()) {
                Ok(event) => events.send_event(id, event),
                Err(error) => debug!(connection = %id, %error, "ignoring malformed frame"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(error) => {
                debug!(connection = %id, %error, "socket read failed");
                break;
            }
        }
    }

    events.disconnect(id);
}
