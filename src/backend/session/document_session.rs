/**
 * Document Session
 *
 * The single authoritative owner of one document's state and the fan-out
 * point for all of its connected clients. Every inbound frame goes through
 * validate -> mutate -> broadcast -> persist, strictly one frame at a time:
 * the gateway serializes access per document, so the plain mutations below
 * are safe without further locking.
 *
 * # Message handling
 *
 * 1. Non-text frames are dropped silently.
 * 2. Parse/validation failures are answered with an ERROR frame to the
 *    sender only; they are data, not control flow.
 * 3. SETUP replies to the sender with the full element list and the full
 *    text body; no mutation, no broadcast, no persistence.
 * 4. STATE add/update/delete and TEXT_STATE add mutate the authoritative
 *    state, then the original validated frame is rebroadcast to every other
 *    client and the state is persisted (local tier immediately, durable
 *    tier debounced).
 * 5. Any unexpected internal failure is caught at the top of
 *    `handle_message`, logged, and answered with a generic ERROR; state is
 *    left as it was.
 */
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::backend::persistence::{DurableStore, SnapshotStore};
use crate::shared::document::DocumentState;
use crate::shared::error::ProtocolError;
use crate::shared::protocol::{decode_client_message, ClientMessage, OutboundMessage};

use super::debounce::DebouncedWrite;

/// Opaque per-connection client identifier
///
/// Random per connection, not per user; no identity persists across
/// reconnects. Used solely to exclude the sender from broadcast echo.
pub type ClientId = Uuid;

/// Outbound frame sender registered for one connection.
pub type ClientSender = mpsc::UnboundedSender<String>;

/// An inbound transport frame
#[derive(Debug, Clone)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

pub struct DocumentSession<L, D> {
    document_id: String,
    state: DocumentState,
    clients: HashMap<ClientId, ClientSender>,
    local: Arc<L>,
    durable: Option<Arc<D>>,
    debounce: DebouncedWrite,
    initialized: bool,
}

impl<L: SnapshotStore, D: DurableStore> DocumentSession<L, D> {
    pub fn new(
        document_id: String,
        local: Arc<L>,
        durable: Option<Arc<D>>,
        debounce_window: Duration,
    ) -> Self {
        Self {
            document_id,
            state: DocumentState::default(),
            clients: HashMap::new(),
            local,
            durable,
            debounce: DebouncedWrite::new(debounce_window),
            initialized: false,
        }
    }

    /// Load state, preferring the local tier
    ///
    /// Falls back to the supplied durable-tier snapshot, else starts empty,
    /// and writes the resolved state back to the local tier so it is warm
    /// after init. Idempotent: a second call is a no-op. Storage failures
    /// are logged and never propagate; the session then starts from the
    /// fallback (or empty).
    pub async fn initialize(&mut self, fallback: Option<DocumentState>) {
        if self.initialized {
            return;
        }

        let loaded = match self.local.get().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(
                    "[DocumentSession] local snapshot read failed for {}: {err}",
                    self.document_id
                );
                None
            }
        };
        self.state = loaded.or(fallback).unwrap_or_default();

        if let Err(err) = self.local.put(&self.state).await {
            tracing::warn!(
                "[DocumentSession] local snapshot write failed for {}: {err}",
                self.document_id
            );
        }
        self.initialized = true;
    }

    /// Register a connection and return its fresh client identifier.
    pub fn add_client(&mut self, sender: ClientSender) -> ClientId {
        let client_id = Uuid::new_v4();
        self.clients.insert(client_id, sender);
        tracing::info!(
            "[DocumentSession] client {client_id} connected to {}. Total clients: {}",
            self.document_id,
            self.clients.len()
        );
        client_id
    }

    /// Deregister a connection; safe to call on an unknown client.
    pub fn remove_client(&mut self, client_id: ClientId) {
        if self.clients.remove(&client_id).is_some() {
            tracing::info!(
                "[DocumentSession] client {client_id} disconnected from {}. Total clients: {}",
                self.document_id,
                self.clients.len()
            );
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    /// Process one inbound frame from a connected client.
    pub async fn handle_message(&mut self, sender: ClientId, frame: Frame) {
        let text = match frame {
            Frame::Text(text) => text,
            Frame::Binary(_) => {
                tracing::trace!(
                    "[DocumentSession] dropping binary frame from {sender} on {}",
                    self.document_id
                );
                return;
            }
        };

        if let Err(err) = self.process_frame(sender, &text).await {
            tracing::error!(
                "[DocumentSession] error processing message from {sender} on {}: {err}",
                self.document_id
            );
            self.reply(sender, OutboundMessage::error("Error processing message."));
        }
    }

    async fn process_frame(&mut self, sender: ClientId, frame: &str) -> Result<(), ProtocolError> {
        let message = match decode_client_message(frame) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(
                    "[DocumentSession] rejecting frame from {sender} on {}: {err}",
                    self.document_id
                );
                self.reply(sender, OutboundMessage::error(err.to_string()));
                return Ok(());
            }
        };

        match message {
            ClientMessage::Setup => {
                self.reply(sender, OutboundMessage::element_sync(&self.state.elements)?);
                self.reply(sender, OutboundMessage::text_sync(&self.state.text)?);
            }
            ClientMessage::AddElements(elements) => {
                tracing::debug!(
                    "[DocumentSession] adding {} element(s) to {}",
                    elements.len(),
                    self.document_id
                );
                self.state.elements.extend(elements);
                self.broadcast(sender, frame);
                self.persist_state().await;
            }
            ClientMessage::UpdateElement(update) => {
                match self
                    .state
                    .elements
                    .iter_mut()
                    .find(|element| element.id == update.id)
                {
                    Some(element) => element.apply_patch(&update.properties),
                    // Deliberately a silent no-op rather than an ERROR reply;
                    // the log line is the only trace of the dropped update.
                    None => tracing::warn!(
                        "[DocumentSession] element '{}' not found in {}. No update performed.",
                        update.id,
                        self.document_id
                    ),
                }
                self.broadcast(sender, frame);
                self.persist_state().await;
            }
            ClientMessage::DeleteElements(selection) => {
                self.state
                    .elements
                    .retain(|element| !selection.element_ids.contains(&element.id));
                self.broadcast(sender, frame);
                self.persist_state().await;
            }
            ClientMessage::AppendText(delta) => {
                self.state.text.append(&delta);
                self.broadcast(sender, frame);
                self.persist_state().await;
            }
        }
        Ok(())
    }

    /// Send one frame to one client, pruning it if unreachable.
    fn reply(&mut self, client_id: ClientId, message: OutboundMessage) {
        let frame = match message.encode() {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!("[DocumentSession] failed to encode reply: {err}");
                return;
            }
        };
        let delivered = match self.clients.get(&client_id) {
            Some(sender) => sender.send(frame).is_ok(),
            None => return,
        };
        if !delivered {
            tracing::warn!(
                "[DocumentSession] error sending message to {client_id}, deregistering"
            );
            self.clients.remove(&client_id);
        }
    }

    /// Rebroadcast the original validated frame to every client but the sender
    ///
    /// A failed send deregisters that client and never aborts delivery to
    /// the rest; dropping its sender closes the connection's forward task.
    fn broadcast(&mut self, sender: ClientId, frame: &str) {
        let mut stale = Vec::new();
        for (client_id, tx) in &self.clients {
            if *client_id == sender {
                continue;
            }
            if tx.send(frame.to_string()).is_err() {
                stale.push(*client_id);
            }
        }
        for client_id in stale {
            tracing::warn!(
                "[DocumentSession] error sending message to {client_id}, deregistering"
            );
            self.clients.remove(&client_id);
        }
    }

    /// Persist to the local tier now and schedule the debounced durable write.
    pub async fn persist_state(&mut self) {
        if let Err(err) = self.local.put(&self.state).await {
            tracing::error!(
                "[DocumentSession] local persist failed for {}: {err}",
                self.document_id
            );
        }
        if let Some(durable) = &self.durable {
            self.debounce.schedule(
                Arc::clone(durable),
                self.document_id.clone(),
                self.state.clone(),
            );
        }
    }

    /// Write to the durable tier immediately, bypassing the debounce
    ///
    /// Cancels any pending debounced write so it cannot fire late and
    /// duplicate this one.
    pub async fn flush(&mut self) {
        self.debounce.cancel();
        if let Some(durable) = &self.durable {
            tracing::info!(
                "[DocumentSession] flushing state for {} to durable storage",
                self.document_id
            );
            if let Err(err) = durable.persist(&self.document_id, &self.state).await {
                tracing::warn!(
                    "[DocumentSession] durable flush failed for {}: {err}",
                    self.document_id
                );
            }
        }
    }
}
