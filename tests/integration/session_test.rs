//! End-to-end session behavior over in-memory storage tiers

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::Value;
use sketchsync::backend::persistence::{DurableStore, MemoryDurableStore, MemorySnapshotStore};
use sketchsync::backend::session::{DocumentSession, Frame};
use sketchsync::shared::DocumentState;

use crate::common::{
    add_frame, connect, delete_frame, drain, heading_frame, path_element, setup_frame,
};

type TestSession = DocumentSession<MemorySnapshotStore, MemoryDurableStore>;

fn session_over(
    local: Arc<MemorySnapshotStore>,
    durable: Option<Arc<MemoryDurableStore>>,
    window: Duration,
) -> TestSession {
    DocumentSession::new("doc1".to_string(), local, durable, window)
}

async fn send(session: &mut TestSession, client: uuid::Uuid, frame: &str) {
    session
        .handle_message(client, Frame::Text(frame.to_string()))
        .await;
}

#[tokio::test]
async fn test_mutations_survive_session_restart() {
    let local = Arc::new(MemorySnapshotStore::new());

    let expected = {
        let mut session = session_over(Arc::clone(&local), None, Duration::from_millis(50));
        session.initialize(None).await;
        let (alice, _alice_rx) = connect(&mut session);

        send(&mut session, alice, &add_frame(&path_element())).await;
        send(&mut session, alice, &heading_frame("title")).await;
        session.state().clone()
    };

    // A fresh session over the same local tier reconstructs the exact state
    let mut revived = session_over(local, None, Duration::from_millis(50));
    revived.initialize(None).await;
    assert_eq!(revived.state(), &expected);
}

#[tokio::test(start_paused = true)]
async fn test_mutation_burst_coalesces_to_one_durable_write() {
    let durable = Arc::new(MemoryDurableStore::new());
    let window = Duration::from_millis(5000);
    let mut session = session_over(
        Arc::new(MemorySnapshotStore::new()),
        Some(Arc::clone(&durable)),
        window,
    );
    session.initialize(None).await;
    let (alice, _alice_rx) = connect(&mut session);

    for _ in 0..4 {
        send(&mut session, alice, &add_frame(&path_element())).await;
    }
    assert_eq!(durable.write_count(), 0);

    tokio::time::sleep(window + Duration::from_millis(100)).await;

    // One write, containing the state as of the last mutation
    assert_eq!(durable.write_count(), 1);
    let stored = durable.load("doc1").await.unwrap().unwrap();
    assert_eq!(stored.elements.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_flush_cancels_pending_debounced_write() {
    let durable = Arc::new(MemoryDurableStore::new());
    let window = Duration::from_millis(5000);
    let mut session = session_over(
        Arc::new(MemorySnapshotStore::new()),
        Some(Arc::clone(&durable)),
        window,
    );
    session.initialize(None).await;
    let (alice, _alice_rx) = connect(&mut session);

    send(&mut session, alice, &add_frame(&path_element())).await;
    session.flush().await;
    assert_eq!(durable.write_count(), 1);

    // The aborted debounce task must not fire a duplicate late write
    tokio::time::sleep(window * 2).await;
    assert_eq!(durable.write_count(), 1);
}

#[tokio::test]
async fn test_cold_start_falls_back_to_durable_snapshot() {
    let durable = Arc::new(MemoryDurableStore::new());
    let seeded = DocumentState {
        elements: vec![path_element()],
        ..DocumentState::default()
    };
    durable.persist("doc1", &seeded).await.unwrap();

    let local = Arc::new(MemorySnapshotStore::new());
    let mut session = session_over(
        Arc::clone(&local),
        Some(Arc::clone(&durable)),
        Duration::from_millis(50),
    );
    let fallback = durable.load("doc1").await.unwrap();
    session.initialize(fallback).await;

    assert_eq!(session.state(), &seeded);
}

/// The end-to-end scenario: two clients collaborating on an initially empty
/// document.
#[tokio::test]
async fn test_two_client_collaboration_scenario() {
    let local = Arc::new(MemorySnapshotStore::new());
    let mut session = session_over(Arc::clone(&local), None, Duration::from_millis(50));
    session.initialize(None).await;

    // Client A connects and runs the SETUP handshake on the empty document
    let (alice, mut alice_rx) = connect(&mut session);
    send(&mut session, alice, &setup_frame()).await;
    let frames = drain(&mut alice_rx);
    assert_eq!(frames.len(), 2);
    let elements: Value = serde_json::from_str(&frames[0]).unwrap();
    assert_eq!(elements["payload"].as_array().unwrap().len(), 0);
    let text: Value = serde_json::from_str(&frames[1]).unwrap();
    assert_eq!(text["payload"]["heading"], "");
    assert_eq!(text["payload"]["text"], "");

    // A adds e1; the local tier now holds [e1]
    let e1 = path_element();
    send(&mut session, alice, &add_frame(&e1)).await;
    assert_eq!(session.state().elements.len(), 1);
    use sketchsync::backend::persistence::SnapshotStore;
    let persisted = local.get().await.unwrap().unwrap();
    assert_eq!(persisted.elements.len(), 1);
    assert_eq!(persisted.elements[0].id, e1.id);

    // Client B connects and receives [e1] from its own SETUP
    let (bob, mut bob_rx) = connect(&mut session);
    send(&mut session, bob, &setup_frame()).await;
    let frames = drain(&mut bob_rx);
    let elements: Value = serde_json::from_str(&frames[0]).unwrap();
    assert_eq!(elements["payload"][0]["id"], e1.id.to_string());

    // A deletes e1; B receives the delete broadcast and the list empties
    let delete = delete_frame(&[e1.id]);
    send(&mut session, alice, &delete).await;
    assert_eq!(drain(&mut bob_rx), vec![delete]);
    assert!(session.state().elements.is_empty());
    // The sender got no echo
    assert!(drain(&mut alice_rx).is_empty());
}
