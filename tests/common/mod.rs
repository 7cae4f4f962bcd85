//! Shared test helpers
//!
//! Builders for elements and wire frames, plus channel-backed client
//! connections for exercising a session without a real socket.

use sketchsync::backend::session::{ClientId, DocumentSession};
use sketchsync::shared::{Element, ElementShape, Geometry, PathProperties};
use tokio::sync::mpsc;
use uuid::Uuid;

/// A freehand path element with distinct geometry values.
pub fn path_element() -> Element {
    Element {
        id: Uuid::new_v4(),
        shape: ElementShape::Path(PathProperties {
            geometry: Geometry {
                x: 1.0,
                y: 2.0,
                width: 10.0,
                height: 20.0,
                ..Geometry::default()
            },
            path: "M0 0 L10 10".to_string(),
        }),
    }
}

/// A STATE/ADD frame carrying one element.
pub fn add_frame(element: &Element) -> String {
    format!(
        r#"{{"type":"state","command":"add","payload":{}}}"#,
        serde_json::to_string(element).unwrap()
    )
}

/// A STATE/DELETE frame for a set of element IDs.
pub fn delete_frame(ids: &[Uuid]) -> String {
    format!(
        r#"{{"type":"state","command":"delete","payload":{{"elementIds":{}}}}}"#,
        serde_json::to_string(ids).unwrap()
    )
}

/// A TEXT_STATE/ADD frame appending to the heading.
pub fn heading_frame(heading: &str) -> String {
    format!(r#"{{"type":"text_state","command":"add","payload":{{"heading":"{heading}"}}}}"#)
}

/// The SETUP handshake frame.
pub fn setup_frame() -> String {
    r#"{"type":"setup","command":"info"}"#.to_string()
}

/// Register a channel-backed client with a session.
pub fn connect<L, D>(
    session: &mut DocumentSession<L, D>,
) -> (ClientId, mpsc::UnboundedReceiver<String>)
where
    L: sketchsync::backend::persistence::SnapshotStore,
    D: sketchsync::backend::persistence::DurableStore,
{
    let (tx, rx) = mpsc::unbounded_channel();
    (session.add_client(tx), rx)
}

/// Collect every frame currently queued for a client.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
    }
    frames
}
