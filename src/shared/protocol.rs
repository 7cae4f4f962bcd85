/**
 * Message Codec & Validator
 *
 * This module turns untyped inbound text frames into one of a small closed
 * set of message shapes, or rejects them with a descriptive failure value.
 *
 * # Recognized shapes
 *
 * | type       | command | payload                          |
 * |------------|---------|----------------------------------|
 * | setup      | info    | none                             |
 * | state      | add     | Element or Element[]             |
 * | state      | update  | { id, properties (partial) }     |
 * | state      | delete  | { elementIds: [...] }            |
 * | text_state | add     | { heading?, text? }              |
 * | error      | info    | { message } (outbound only)      |
 *
 * Validation here is structural (shape and enum membership), not semantic:
 * whether a referenced element ID exists is the session's concern. A failed
 * validation never raises; it returns a `ProtocolError` for the caller to
 * turn into an ERROR reply.
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::document::{TextDelta, TextState};
use super::element::{Element, PropertiesPatch};
use super::error::ProtocolError;

/// Top-level message discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Setup,
    State,
    TextState,
    Error,
}

/// Second-level message discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCommand {
    Add,
    Update,
    Delete,
    Info,
}

/// A validated inbound message
///
/// This is the only form in which client input reaches mutation logic; an
/// open payload dictionary never crosses this boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Request the full current document state
    Setup,
    /// Append one or more elements
    AddElements(Vec<Element>),
    /// Merge a partial properties update into one element
    UpdateElement(ElementUpdate),
    /// Remove every element whose ID is in the selection
    DeleteElements(DeleteSelection),
    /// Append to the text body
    AppendText(TextDelta),
}

/// Payload of a STATE/UPDATE message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementUpdate {
    pub id: Uuid,
    pub properties: PropertiesPatch,
}

/// Payload of a STATE/DELETE message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSelection {
    pub element_ids: Vec<Uuid>,
}

/// Raw frame envelope, before payload validation
///
/// `type` and `command` are kept as strings at this stage so unrecognized
/// values can be echoed back in the ERROR reply.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    payload: Option<Value>,
}

/// STATE/ADD accepts a single element or an array of elements.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Element>),
    One(Element),
}

/// Decode and validate one inbound text frame
///
/// Returns the validated message, or a `ProtocolError` describing why the
/// frame was rejected. Never panics.
pub fn decode_client_message(frame: &str) -> Result<ClientMessage, ProtocolError> {
    let envelope: Envelope = serde_json::from_str(frame)?;
    let command = envelope.command.as_deref();

    match (envelope.kind.as_str(), command) {
        ("setup", None) | ("setup", Some("info")) => Ok(ClientMessage::Setup),
        ("state", Some("add")) => {
            let payload = require_payload(envelope.payload)?;
            let elements = match serde_json::from_value::<OneOrMany>(payload)
                .map_err(|err| ProtocolError::schema("payload", err.to_string()))?
            {
                OneOrMany::Many(elements) => elements,
                OneOrMany::One(element) => vec![element],
            };
            Ok(ClientMessage::AddElements(elements))
        }
        ("state", Some("update")) => {
            let payload = require_payload(envelope.payload)?;
            let update = serde_json::from_value::<ElementUpdate>(payload)
                .map_err(|err| ProtocolError::schema("payload", err.to_string()))?;
            Ok(ClientMessage::UpdateElement(update))
        }
        ("state", Some("delete")) => {
            let payload = require_payload(envelope.payload)?;
            let selection = serde_json::from_value::<DeleteSelection>(payload)
                .map_err(|err| ProtocolError::schema("payload", err.to_string()))?;
            Ok(ClientMessage::DeleteElements(selection))
        }
        ("text_state", Some("add")) => {
            let payload = require_payload(envelope.payload)?;
            let delta = serde_json::from_value::<TextDelta>(payload)
                .map_err(|err| ProtocolError::schema("payload", err.to_string()))?;
            Ok(ClientMessage::AppendText(delta))
        }
        ("setup" | "state" | "text_state", _) => Err(ProtocolError::unrecognized(format!(
            "command '{}' for type '{}'",
            command.unwrap_or("<none>"),
            envelope.kind
        ))),
        (other, _) => Err(ProtocolError::unrecognized(format!("type '{}'", other))),
    }
}

fn require_payload(payload: Option<Value>) -> Result<Value, ProtocolError> {
    payload.ok_or_else(|| ProtocolError::schema("payload", "payload is required".to_string()))
}

/// A serializable outbound frame
///
/// Built by the session for SETUP replies and ERROR messages. Broadcasts of
/// client mutations reuse the original validated frame text instead.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub command: MessageCommand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl OutboundMessage {
    /// An ERROR reply carrying a human-readable reason.
    pub fn error(reason: impl Into<String>) -> Self {
        let message: String = reason.into();
        Self {
            kind: MessageType::Error,
            command: MessageCommand::Info,
            payload: Some(serde_json::json!({ "message": message })),
        }
    }

    /// A STATE/ADD frame carrying the full element list.
    pub fn element_sync(elements: &[Element]) -> Result<Self, ProtocolError> {
        Ok(Self {
            kind: MessageType::State,
            command: MessageCommand::Add,
            payload: Some(serde_json::to_value(elements)?),
        })
    }

    /// A TEXT_STATE/ADD frame carrying the full text body.
    pub fn text_sync(text: &TextState) -> Result<Self, ProtocolError> {
        Ok(Self {
            kind: MessageType::TextState,
            command: MessageCommand::Add,
            payload: Some(serde_json::to_value(text)?),
        })
    }

    /// Serialize to a wire frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::element::{ElementShape, Geometry, PathProperties};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn element_json(id: &str) -> String {
        format!(
            r#"{{
                "id": "{id}",
                "type": "path",
                "properties": {{
                    "x": 0.0, "y": 0.0, "focalX": 0.0, "focalY": 0.0,
                    "width": 10.0, "height": 10.0,
                    "matrix": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1],
                    "path": "M0 0 L10 10"
                }}
            }}"#
        )
    }

    #[test]
    fn test_decode_setup() {
        let message = decode_client_message(r#"{"type": "setup", "command": "info"}"#).unwrap();
        assert_eq!(message, ClientMessage::Setup);

        // Command may be omitted for setup
        let message = decode_client_message(r#"{"type": "setup"}"#).unwrap();
        assert_eq!(message, ClientMessage::Setup);
    }

    #[test]
    fn test_decode_add_single_element() {
        let frame = format!(
            r#"{{"type": "state", "command": "add", "payload": {}}}"#,
            element_json("a6f8f1c4-0f38-4b3e-9f1d-111111111111")
        );
        let message = decode_client_message(&frame).unwrap();
        assert_matches!(message, ClientMessage::AddElements(elements) if elements.len() == 1);
    }

    #[test]
    fn test_decode_add_element_array() {
        let frame = format!(
            r#"{{"type": "state", "command": "add", "payload": [{}, {}]}}"#,
            element_json("a6f8f1c4-0f38-4b3e-9f1d-111111111111"),
            element_json("a6f8f1c4-0f38-4b3e-9f1d-222222222222")
        );
        let message = decode_client_message(&frame).unwrap();
        assert_matches!(message, ClientMessage::AddElements(elements) if elements.len() == 2);
    }

    #[test]
    fn test_decode_update() {
        let frame = r#"{
            "type": "state", "command": "update",
            "payload": {"id": "a6f8f1c4-0f38-4b3e-9f1d-111111111111", "properties": {"x": 5.0}}
        }"#;
        let message = decode_client_message(frame).unwrap();
        assert_matches!(
            message,
            ClientMessage::UpdateElement(update)
                if update.properties.x == Some(5.0) && update.properties.y.is_none()
        );
    }

    #[test]
    fn test_decode_delete() {
        let frame = r#"{
            "type": "state", "command": "delete",
            "payload": {"elementIds": ["a6f8f1c4-0f38-4b3e-9f1d-111111111111"]}
        }"#;
        let message = decode_client_message(frame).unwrap();
        assert_matches!(message, ClientMessage::DeleteElements(selection) if selection.element_ids.len() == 1);
    }

    #[test]
    fn test_decode_text_add() {
        let frame = r#"{"type": "text_state", "command": "add", "payload": {"heading": "foo"}}"#;
        let message = decode_client_message(frame).unwrap();
        assert_matches!(
            message,
            ClientMessage::AppendText(delta)
                if delta.heading.as_deref() == Some("foo") && delta.text.is_none()
        );
    }

    #[test]
    fn test_reject_invalid_json() {
        let error = decode_client_message("not json at all").unwrap_err();
        assert_matches!(error, ProtocolError::MalformedFrame { .. });
    }

    #[test]
    fn test_reject_unknown_type() {
        let error = decode_client_message(r#"{"type": "ping"}"#).unwrap_err();
        assert_matches!(error, ProtocolError::Unrecognized { message } if message.contains("ping"));
    }

    #[test]
    fn test_reject_unknown_command() {
        let error =
            decode_client_message(r#"{"type": "state", "command": "upsert", "payload": {}}"#)
                .unwrap_err();
        assert_matches!(error, ProtocolError::Unrecognized { message } if message.contains("upsert"));
    }

    #[test]
    fn test_reject_missing_payload() {
        let error = decode_client_message(r#"{"type": "state", "command": "add"}"#).unwrap_err();
        assert_matches!(error, ProtocolError::SchemaViolation { .. });
    }

    #[test]
    fn test_reject_non_uuid_element_ids() {
        let frame = r#"{
            "type": "state", "command": "delete",
            "payload": {"elementIds": ["not-a-uuid"]}
        }"#;
        let error = decode_client_message(frame).unwrap_err();
        assert_matches!(error, ProtocolError::SchemaViolation { .. });
    }

    #[test]
    fn test_outbound_error_shape() {
        let frame = OutboundMessage::error("Invalid message format.")
            .encode()
            .unwrap();
        let json: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["command"], "info");
        assert_eq!(json["payload"]["message"], "Invalid message format.");
    }

    #[test]
    fn test_outbound_element_sync_shape() {
        let elements = vec![Element {
            id: Uuid::new_v4(),
            shape: ElementShape::Path(PathProperties {
                geometry: Geometry::default(),
                path: "M0 0".to_string(),
            }),
        }];
        let frame = OutboundMessage::element_sync(&elements).unwrap().encode().unwrap();
        let json: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(json["type"], "state");
        assert_eq!(json["command"], "add");
        assert!(json["payload"].is_array());
    }

    #[test]
    fn test_outbound_text_sync_shape() {
        let text = TextState {
            heading: "h".to_string(),
            text: "t".to_string(),
        };
        let frame = OutboundMessage::text_sync(&text).unwrap().encode().unwrap();
        let json: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(json["type"], "text_state");
        assert_eq!(json["payload"]["heading"], "h");
    }
}
