//! Shared application state: the session registry owning every room.

pub mod room;

use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use rand::Rng;
use tracing::info;

use crate::{error::ServiceError, game::Player};

pub use self::room::{Room, RoomState};

/// Shared handle to the session registry, cloned into every handler.
pub type SharedState = Arc<AppState>;

/// Characters room codes are drawn from.
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Length of a room code (36^6 possible codes).
const ROOM_CODE_LEN: usize = 6;
/// Collisions are effectively impossible at this scale; a bounded retry keeps
/// the failure mode explicit instead of looping forever.
const MAX_CODE_ATTEMPTS: usize = 64;

/// The session registry: sole owner and sole mutator of every [`Room`].
///
/// Constructed once and passed explicitly to the connection handlers, never
/// reached through ambient global state. Rooms are retained indefinitely so a
/// disconnected player can resume by code and slot; an eviction policy would
/// live here if one is ever added.
pub struct AppState {
    rooms: DashMap<String, Arc<Room>>,
}

impl AppState {
    /// Construct a new registry wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new() -> SharedState {
        Arc::new(Self {
            rooms: DashMap::new(),
        })
    }

    /// Create a fresh room under a newly generated code.
    ///
    /// The creator takes slot 0 and the game waits for its second player.
    pub fn create_room(&self) -> Result<Arc<Room>, ServiceError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_room_code();
            match self.rooms.entry(code.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(entry) => {
                    let room = Arc::new(Room::new(code.clone()));
                    entry.insert(Arc::clone(&room));
                    info!(room = %code, "room created");
                    return Ok(room);
                }
            }
        }
        Err(ServiceError::CodeSpaceExhausted)
    }

    /// Claim slot 1 of an existing room and start the game.
    ///
    /// Fails when the code is unknown or the room already has both players.
    /// On success the room is marked full, the game moves to in-progress, and
    /// the new occupancy is broadcast to everyone already attached.
    pub async fn join_room(&self, id: &str) -> Result<Arc<Room>, ServiceError> {
        let room = self.room(id)?;
        {
            let mut state = room.state().lock().await;
            if state.full {
                return Err(ServiceError::RoomFull(id.to_owned()));
            }
            state.full = true;
            state.game.start();
            state.broadcast(room.id());
        }
        info!(room = %id, "second player joined");
        Ok(room)
    }

    /// Re-attach to an existing room without touching game state.
    ///
    /// The slot is not checked for an existing attachment: a second connection
    /// for the same slot simply replaces the first when it attaches.
    pub fn resume_room(&self, id: &str, slot: Player) -> Result<Arc<Room>, ServiceError> {
        let room = self.room(id)?;
        info!(room = %id, %slot, "player resuming");
        Ok(room)
    }

    /// Look up a room by code.
    pub fn room(&self, id: &str) -> Result<Arc<Room>, ServiceError> {
        self.rooms
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ServiceError::RoomNotFound(id.to_owned()))
    }
}

fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}
