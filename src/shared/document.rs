/**
 * Document Snapshot Types
 *
 * This module defines the persisted form of a document: the ordered element
 * list and the text body. The same structure is the authoritative in-memory
 * state of a session and the serialized snapshot written to both storage
 * tiers.
 */
use serde::{Deserialize, Serialize};

use super::element::Element;

/// The shared text body of a document
///
/// Both fields grow by appending only; the protocol has no offset/range edit
/// model. Concurrent appends from different clients interleave in arrival
/// order at the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextState {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub text: String,
}

impl TextState {
    /// Append the present, non-empty parts of a delta.
    pub fn append(&mut self, delta: &TextDelta) {
        if let Some(heading) = &delta.heading {
            if !heading.is_empty() {
                self.heading.push_str(heading);
            }
        }
        if let Some(text) = &delta.text {
            if !text.is_empty() {
                self.text.push_str(text);
            }
        }
    }
}

/// Appended text carried by a TEXT_STATE/ADD message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDelta {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// The full state of one document
///
/// `text` defaults to empty when deserializing snapshots persisted before
/// the text body existed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentState {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub text: TextState,
}
