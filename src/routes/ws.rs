//! WebSocket handler — the per-client event stream.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register a bounded event channel under a fresh client id
//! 2. Forward broadcast events to the socket as JSON text frames
//! 3. Close or send failure → unregister
//!
//! The stream is server→client only; inbound text frames are ignored. A
//! client that reconnects re-fetches the full grid snapshot before reading
//! events, so missed messages need no replay.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::event::Event;
use crate::services::broadcast;
use crate::state::AppState;

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::channel::<Event>(broadcast::EVENT_CHANNEL_CAPACITY);

    broadcast::register(&state, client_id, tx).await;
    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Close(_) => break,
                    // The event stream is one-way; inbound frames are ignored.
                    _ => {}
                }
            }
            Some(event) = rx.recv() => {
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    broadcast::unregister(&state, client_id).await;
    info!(%client_id, "ws: client disconnected");
}

async fn send_event(socket: &mut WebSocket, event: &Event) -> Result<(), ()> {
    let json = match serde_json::to_string(event) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, event = event.name(), "ws: failed to serialize event");
            return Err(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}
