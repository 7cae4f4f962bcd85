//! Registry routing and warm-restart behavior over the SQLite local tier

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use sketchsync::backend::session::{Frame, SessionRegistry};

use crate::common::{add_frame, connect, path_element};

#[tokio::test]
async fn test_same_document_resolves_to_same_session() {
    let dir = tempfile::tempdir().unwrap();
    let registry = SessionRegistry::new(dir.path().to_path_buf(), None, Duration::from_millis(50));

    let first = registry.get_or_create("doc1").await.unwrap();
    let second = registry.get_or_create("doc1").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.session_count().await, 1);
}

#[tokio::test]
async fn test_documents_get_independent_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let registry = SessionRegistry::new(dir.path().to_path_buf(), None, Duration::from_millis(50));

    let doc_a = registry.get_or_create("doc-a").await.unwrap();
    let doc_b = registry.get_or_create("doc-b").await.unwrap();

    assert!(!Arc::ptr_eq(&doc_a, &doc_b));
    assert_eq!(registry.session_count().await, 2);
}

#[tokio::test]
async fn test_warm_restart_rehydrates_from_local_tier() {
    let dir = tempfile::tempdir().unwrap();
    let element = path_element();

    {
        let registry =
            SessionRegistry::new(dir.path().to_path_buf(), None, Duration::from_millis(50));
        let session = registry.get_or_create("doc1").await.unwrap();
        let mut session = session.lock().await;
        let (alice, _alice_rx) = connect(&mut session);
        session
            .handle_message(alice, Frame::Text(add_frame(&element)))
            .await;
    }

    // A new registry over the same data dir (a restarted process) lazily
    // rehydrates the session from the local tier.
    let registry = SessionRegistry::new(dir.path().to_path_buf(), None, Duration::from_millis(50));
    let session = registry.get_or_create("doc1").await.unwrap();
    let session = session.lock().await;

    assert_eq!(session.state().elements.len(), 1);
    assert_eq!(session.state().elements[0].id, element.id);
}
