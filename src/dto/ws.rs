//! Wire messages exchanged with game clients after the WebSocket handshake.

use serde::{Deserialize, Serialize};

use crate::game::{BigBoard, Game, Player};

#[derive(Debug, Deserialize)]
/// Messages accepted from game WebSocket clients.
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Place a mark at `cell` of sub-board `board` (both row-major, 0-8).
    Move {
        /// Target sub-board index.
        board: u8,
        /// Target cell index within the sub-board.
        cell: u8,
    },
    /// Cast a rematch vote on a decided game.
    Rematch,
    /// Any unrecognized message type; logged and dropped.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize)]
/// The sole server-to-client message: a full authoritative state snapshot.
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Pushed to every attached participant after each accepted mutation.
    Game {
        /// Snapshot personalized only in its `player` field.
        game: GameSnapshot,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Full authoritative game state as seen by one recipient.
///
/// Both players receive identical content apart from `player`, which names
/// the recipient's own slot; there is no hidden information in this game.
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// The nine sub-boards with their cells (`null | 0 | 1`).
    pub big_board: BigBoard,
    /// Slot whose move is next.
    pub turn: Player,
    /// Room code the snapshot belongs to.
    pub id: String,
    /// Sub-board the next move is constrained to, or `null` for any.
    pub next_board: Option<u8>,
    /// The recipient's own slot.
    pub player: Player,
    /// Whether both player slots are taken.
    pub full: bool,
    /// Slot holding a pending rematch vote, or `null`.
    pub rematch: Option<Player>,
}

impl GameSnapshot {
    /// Build the snapshot of `game` addressed to the participant in `slot`.
    pub fn of_game(room_id: &str, game: &Game, full: bool, slot: Player) -> Self {
        Self {
            big_board: *game.big_board(),
            turn: game.turn(),
            id: room_id.to_owned(),
            next_board: game.next_board(),
            player: slot,
            full,
            rematch: game.rematch(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_move_message_parses() {
        let message: ClientMessage =
            serde_json::from_str(r#"{"type":"move","board":4,"cell":7}"#).unwrap();
        assert!(matches!(message, ClientMessage::Move { board: 4, cell: 7 }));
    }

    #[test]
    fn inbound_rematch_message_parses() {
        let message: ClientMessage = serde_json::from_str(r#"{"type":"rematch"}"#).unwrap();
        assert!(matches!(message, ClientMessage::Rematch));
    }

    #[test]
    fn unknown_message_types_map_to_unknown() {
        let message: ClientMessage = serde_json::from_str(r#"{"type":"chat"}"#).unwrap();
        assert!(matches!(message, ClientMessage::Unknown));
    }

    #[test]
    fn snapshot_serializes_with_wire_field_names() {
        let mut game = Game::new();
        game.start();
        game.apply_move(Player::Zero, 4, 4).unwrap();

        let snapshot = GameSnapshot::of_game("AB12CD", &game, true, Player::One);
        let value = serde_json::to_value(ServerMessage::Game { game: snapshot }).unwrap();

        assert_eq!(value["type"], "game");
        let game_value = &value["game"];
        assert_eq!(game_value["id"], "AB12CD");
        assert_eq!(game_value["turn"], 1);
        assert_eq!(game_value["nextBoard"], 4);
        assert_eq!(game_value["player"], 1);
        assert_eq!(game_value["full"], true);
        assert_eq!(game_value["rematch"], serde_json::Value::Null);
        assert_eq!(game_value["bigBoard"][4][4], 0);
        assert_eq!(game_value["bigBoard"][0][0], serde_json::Value::Null);
    }
}
