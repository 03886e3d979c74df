//! Event — the fan-out message type.
//!
//! DESIGN
//! ======
//! Everything the server pushes to connected clients is an `Event`,
//! serialized as `{"event": "<name>", "data": {...}}` and sent as one JSON
//! text frame per event. Within a single connection, delivery order equals
//! broadcast order; clients apply events in arrival order.

use serde::{Deserialize, Serialize};

use crate::paint::{Diff, Revert};
use crate::services::chat::ChatMessageView;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum Event {
    /// A paint was committed; apply these cells.
    #[serde(rename = "canvas.diff")]
    CanvasDiff(Diff),
    /// A paint failed to persist; roll these cells back.
    #[serde(rename = "canvas.revert")]
    CanvasRevert(Revert),
    /// A chat message was posted.
    #[serde(rename = "chat.message")]
    ChatMessage(ChatMessageView),
}

impl Event {
    /// Wire name of the event, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Event::CanvasDiff(_) => "canvas.diff",
            Event::CanvasRevert(_) => "canvas.revert",
            Event::ChatMessage(_) => "chat.message",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Pixel;

    #[test]
    fn diff_event_wire_format() {
        let event = Event::CanvasDiff(Diff { pixel: Pixel::rgba(10, 20, 30, 255), indices: vec![0, 1] });
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["event"], "canvas.diff");
        assert_eq!(value["data"]["pixel"]["r"], 10);
        assert_eq!(value["data"]["indices"], serde_json::json!([0, 1]));
    }

    #[test]
    fn revert_event_round_trip() {
        let event = Event::CanvasRevert(Revert { pixel: Pixel::WHITE, indices: vec![3] });
        let json = serde_json::to_string(&event).unwrap();
        let restored: Event = serde_json::from_str(&json).unwrap();

        match restored {
            Event::CanvasRevert(revert) => {
                assert_eq!(revert.pixel, Pixel::WHITE);
                assert_eq!(revert.indices, vec![3]);
            }
            other => panic!("expected canvas.revert, got {}", other.name()),
        }
    }

    #[test]
    fn event_names_are_stable() {
        let diff = Event::CanvasDiff(Diff { pixel: Pixel::WHITE, indices: vec![] });
        let revert = Event::CanvasRevert(Revert { pixel: Pixel::WHITE, indices: vec![] });
        assert_eq!(diff.name(), "canvas.diff");
        assert_eq!(revert.name(), "canvas.revert");
    }
}
