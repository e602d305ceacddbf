//! WebSocket connection lifecycle and inbound message dispatch.
//!
//! Every accepted mutation ends in a full-snapshot broadcast to the room;
//! malformed frames and illegal moves are logged and dropped without any
//! reply to the sender, keeping both participants on identical state.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    dto::ws::ClientMessage,
    game::Player,
    state::Room,
};

/// Handle the full lifecycle for one participant's WebSocket connection.
///
/// The connection is already bound to `(room, slot)` by the handshake. The
/// socket is split so a dedicated writer task keeps broadcast frames flowing
/// while this task awaits inbound messages.
pub async fn handle_socket(room: Arc<Room>, slot: Player, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    // Attach (replacing any stale channel for this slot) and hand the new
    // connection its view of the authoritative state.
    {
        let mut state = room.state().lock().await;
        state.attach(slot, outbound_tx.clone());
        state.send_snapshot(room.id(), slot);
    }
    info!(room = %room.id(), %slot, "participant connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                handle_client_message(&room, slot, text.as_str()).await;
            }
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(room = %room.id(), %slot, error = %err, "websocket error");
                break;
            }
        }
    }

    // Leave a newer attachment from a resume untouched; the room itself
    // outlives the disconnect so the player can come back.
    {
        let mut state = room.state().lock().await;
        state.detach_if_current(slot, &outbound_tx);
    }
    info!(room = %room.id(), %slot, "participant disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Dispatch one inbound text frame for a connected participant.
///
/// Move and rematch messages always end in a broadcast, accepted or not, so
/// both sides converge on the same authoritative snapshot. Unparseable or
/// unknown frames are dropped with a diagnostic and trigger no broadcast.
pub async fn handle_client_message(room: &Room, slot: Player, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(err) => {
            warn!(room = %room.id(), %slot, error = %err, "ignoring malformed message");
            return;
        }
    };

    match message {
        ClientMessage::Move { board, cell } => {
            let mut state = room.state().lock().await;
            match state.game.apply_move(slot, board, cell) {
                Ok(()) => info!(room = %room.id(), %slot, board, cell, "move applied"),
                Err(err) => {
                    warn!(room = %room.id(), %slot, board, cell, error = %err, "ignoring illegal move");
                }
            }
            state.broadcast(room.id());
        }
        ClientMessage::Rematch => {
            let mut state = room.state().lock().await;
            match state.game.vote_rematch(slot) {
                Ok(outcome) => info!(room = %room.id(), %slot, ?outcome, "rematch vote"),
                Err(err) => {
                    warn!(room = %room.id(), %slot, error = %err, "ignoring rematch vote");
                }
            }
            state.broadcast(room.id());
        }
        ClientMessage::Unknown => {
            warn!(room = %room.id(), %slot, "ignoring unsupported message type");
        }
    }
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
