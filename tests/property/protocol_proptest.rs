//! Property-based tests for the message codec

use proptest::prelude::*;
use sketchsync::shared::{decode_client_message, ClientMessage};

use crate::common::path_element;

proptest! {
    /// Arbitrary input never panics the decoder; it either validates or
    /// comes back as a failure value.
    #[test]
    fn test_decode_never_panics(frame in "\\PC*") {
        let _ = decode_client_message(&frame);
    }

    /// Unknown type/command combinations are rejected, not dispatched.
    #[test]
    fn test_unknown_discriminators_are_rejected(
        kind in "[a-z_]{1,12}",
        command in "[a-z_]{1,12}",
    ) {
        let frame = format!(r#"{{"type":"{kind}","command":"{command}","payload":{{}}}}"#);
        let result = decode_client_message(&frame);
        let known_type = matches!(kind.as_str(), "setup" | "state" | "text_state");
        if !known_type {
            prop_assert!(result.is_err());
        }
    }

    /// Text deltas round-trip through the codec for any content that JSON
    /// string escaping can carry.
    #[test]
    fn test_text_delta_roundtrip(heading in "[a-zA-Z0-9 ]{0,40}", text in "[a-zA-Z0-9 ]{0,40}") {
        let frame = format!(
            r#"{{"type":"text_state","command":"add","payload":{{"heading":{},"text":{}}}}}"#,
            serde_json::to_string(&heading).unwrap(),
            serde_json::to_string(&text).unwrap(),
        );
        let message = decode_client_message(&frame).unwrap();
        match message {
            ClientMessage::AppendText(delta) => {
                prop_assert_eq!(delta.heading.as_deref(), Some(heading.as_str()));
                prop_assert_eq!(delta.text.as_deref(), Some(text.as_str()));
            }
            other => prop_assert!(false, "unexpected message: {:?}", other),
        }
    }

    /// STATE/ADD accepts any element count, single or array encoded.
    #[test]
    fn test_add_accepts_any_batch_size(count in 1usize..8) {
        let elements: Vec<_> = (0..count).map(|_| path_element()).collect();
        let frame = format!(
            r#"{{"type":"state","command":"add","payload":{}}}"#,
            serde_json::to_string(&elements).unwrap()
        );
        let message = decode_client_message(&frame).unwrap();
        match message {
            ClientMessage::AddElements(decoded) => prop_assert_eq!(decoded.len(), count),
            other => prop_assert!(false, "unexpected message: {:?}", other),
        }
    }
}
