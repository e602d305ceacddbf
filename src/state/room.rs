//! A single live match: the authoritative game plus the per-slot connection
//! handles used for snapshot fan-out.

use axum::extract::ws::Message;
use tokio::sync::{Mutex, mpsc};
use tracing::warn;

use crate::{
    dto::ws::{GameSnapshot, ServerMessage},
    game::{Game, Player},
};

/// One room identified by its short code.
///
/// All game and occupancy mutation happens under the inner mutex, so no two
/// messages for the same room ever interleave. Rooms never share state.
#[derive(Debug)]
pub struct Room {
    id: String,
    state: Mutex<RoomState>,
}

impl Room {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            state: Mutex::new(RoomState::new()),
        }
    }

    /// The short room code clients share to join.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Serialized access to the game and connection state.
    pub fn state(&self) -> &Mutex<RoomState> {
        &self.state
    }
}

/// Mutable guts of a room: the game, the occupancy flag, and one outbound
/// channel per player slot.
#[derive(Debug)]
pub struct RoomState {
    /// Authoritative game state for this room.
    pub game: Game,
    /// Whether both player slots have been claimed.
    pub full: bool,
    connections: [Option<mpsc::UnboundedSender<Message>>; 2],
}

impl RoomState {
    fn new() -> Self {
        Self {
            game: Game::new(),
            full: false,
            connections: [None, None],
        }
    }

    /// Attach a connection's outbound channel to a slot.
    ///
    /// A slot may be re-attached at any time (reconnection via resume); the
    /// latest attachment wins and the previous channel is dropped.
    pub fn attach(&mut self, slot: Player, tx: mpsc::UnboundedSender<Message>) {
        self.connections[slot.index()] = Some(tx);
    }

    /// Detach a slot's channel, but only if it still belongs to the closing
    /// connection. A newer attachment from a resume is left alone.
    pub fn detach_if_current(&mut self, slot: Player, tx: &mpsc::UnboundedSender<Message>) {
        if let Some(current) = &self.connections[slot.index()] {
            if current.same_channel(tx) {
                self.connections[slot.index()] = None;
            }
        }
    }

    /// Build the snapshot addressed to `slot`.
    pub fn snapshot_for(&self, room_id: &str, slot: Player) -> GameSnapshot {
        GameSnapshot::of_game(room_id, &self.game, self.full, slot)
    }

    /// Push the current snapshot to every attached participant.
    ///
    /// Fire-and-forget: frames are queued on unbounded channels without
    /// awaiting, so fan-out can never stall the mutation path. A closed
    /// channel is logged and the state transition stands regardless.
    pub fn broadcast(&self, room_id: &str) {
        for slot in [Player::Zero, Player::One] {
            self.send_snapshot(room_id, slot);
        }
    }

    /// Push the current snapshot to one slot, if that slot is attached.
    pub fn send_snapshot(&self, room_id: &str, slot: Player) {
        let Some(tx) = &self.connections[slot.index()] else {
            return;
        };
        let message = ServerMessage::Game {
            game: self.snapshot_for(room_id, slot),
        };
        let payload = match serde_json::to_string(&message) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(room = %room_id, %slot, error = %err, "failed to serialize snapshot");
                return;
            }
        };
        if tx.send(Message::Text(payload.into())).is_err() {
            warn!(room = %room_id, %slot, "snapshot delivery failed: connection gone");
        }
    }
}
