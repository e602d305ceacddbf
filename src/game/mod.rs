//! Rules engine for nested tic-tac-toe: board evaluators and the per-room
//! game state machine.

pub mod board;
pub mod engine;

pub use board::{BigBoard, Cell, Outcome, Player, SubBoard, evaluate_big_board, evaluate_board};
pub use engine::{Game, GamePhase, IllegalMove, RematchError, RematchOutcome};
