//! Diff broadcaster — fan-out to connected clients.
//!
//! DESIGN
//! ======
//! Each connection registers a bounded mpsc sender; events are delivered
//! best-effort per connection with `try_send`. A full or closed channel
//! skips that client — no replay log is kept, a client that missed events
//! resyncs by re-fetching the full grid snapshot on reconnect. Within one
//! channel, delivery order equals broadcast-call order.

use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::event::Event;
use crate::state::AppState;

/// Per-connection outgoing event buffer.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Register a connected client's event channel.
pub async fn register(state: &AppState, client_id: Uuid, tx: mpsc::Sender<Event>) {
    let mut clients = state.clients.write().await;
    clients.insert(client_id, tx);
    info!(%client_id, connected = clients.len(), "client registered");
}

/// Remove a client's channel (disconnect).
pub async fn unregister(state: &AppState, client_id: Uuid) {
    let mut clients = state.clients.write().await;
    clients.remove(&client_id);
    info!(%client_id, connected = clients.len(), "client unregistered");
}

/// Deliver an event to every connected client, optionally excluding one.
pub async fn broadcast(state: &AppState, event: &Event, exclude: Option<Uuid>) {
    let clients = state.clients.read().await;
    for (client_id, tx) in clients.iter() {
        if exclude == Some(*client_id) {
            continue;
        }
        // Best-effort: if a client's channel is full, skip it.
        let _ = tx.try_send(event.clone());
    }
}
