/**
 * WebSocket Connection Handler
 *
 * The thin adapter between the transport and a document session. It accepts
 * the upgrade on `GET /ws/{document_id}`, resolves the one session for that
 * document, registers the connection, and then only relays:
 *
 * - inbound socket frames -> `DocumentSession::handle_message`
 * - frames queued by the session -> the socket sink
 *
 * On close or error the connection is deregistered immediately; there is no
 * grace period and no resume protocol. A reconnecting client starts a fresh
 * SETUP handshake and receives the latest snapshot. When the last client of
 * a document leaves, the session is flushed to the durable tier so the
 * final debounce window of edits is not lost.
 */
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::backend::server::state::AppState;
use crate::backend::session::{Frame, SharedSession};

/// Handle a WebSocket upgrade request (GET /ws/{document_id})
///
/// Non-upgrade requests are rejected by the extractor with 426 before this
/// handler runs.
pub async fn handle_ws_upgrade(
    State(app_state): State<AppState>,
    Path(document_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    tracing::info!("[Gateway] upgrade request for document {document_id}");

    let session = app_state
        .sessions
        .get_or_create(&document_id)
        .await
        .map_err(|err| {
            tracing::error!("[Gateway] cannot open session for {document_id}: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(ws.on_upgrade(move |socket| client_connection(session, document_id, socket)))
}

/// Drive one client connection until it closes.
async fn client_connection(session: SharedSession, document_id: String, socket: WebSocket) {
    let (mut sink, mut stream) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let client_id = session.lock().await.add_client(out_tx);

    // Forward frames queued by the session to the socket. Ends when the
    // session drops this client's sender or the socket goes away.
    let forward = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => {
                session
                    .lock()
                    .await
                    .handle_message(client_id, Frame::Text(text.to_string()))
                    .await;
            }
            Ok(Message::Binary(bytes)) => {
                session
                    .lock()
                    .await
                    .handle_message(client_id, Frame::Binary(bytes.to_vec()))
                    .await;
            }
            Ok(Message::Close(_)) => break,
            // Ping/pong keepalive is answered by the transport layer
            Ok(_) => {}
            Err(err) => {
                tracing::warn!("[Gateway] socket error on {document_id}: {err}");
                break;
            }
        }
    }

    let remaining = {
        let mut session = session.lock().await;
        session.remove_client(client_id);
        session.client_count()
    };
    if remaining == 0 {
        tracing::info!("[Gateway] last client left {document_id}, flushing session");
        session.lock().await.flush().await;
    }
    forward.abort();
}
