//! The per-room game state machine: move validation, board routing, and the
//! two-vote rematch negotiation.

use thiserror::Error;

use crate::game::board::{
    BigBoard, Player, empty_big_board, evaluate_big_board, evaluate_board,
};

/// Lifecycle phase of a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// The room exists but the second player has not joined yet.
    AwaitingSecondPlayer,
    /// Both slots are taken and moves are accepted.
    InProgress,
    /// The meta-board outcome is decided; only rematch votes are accepted.
    Decided,
}

/// Reasons a move request fails validation.
///
/// These are diagnostics only: per the protocol, a rejected move is dropped
/// without notifying the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    /// Board or cell index outside `0..9`.
    #[error("board or cell index out of range")]
    OutOfRange,
    /// The game is not in the `InProgress` phase.
    #[error("game is not in progress")]
    NotInProgress,
    /// The request came from the player whose turn it is not.
    #[error("not this player's turn")]
    NotYourTurn,
    /// The active-board constraint routes the move elsewhere.
    #[error("move targets a board other than the active one")]
    WrongBoard,
    /// The targeted sub-board already has a decided outcome.
    #[error("targeted sub-board is already decided")]
    BoardDecided,
    /// The targeted cell already carries a mark.
    #[error("targeted cell is occupied")]
    CellOccupied,
}

/// Reasons a rematch vote is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RematchError {
    /// Votes only count once the game is decided.
    #[error("rematch vote on an undecided game")]
    NotDecided,
}

/// What a rematch vote did to the negotiation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RematchOutcome {
    /// First vote: recorded, waiting for the opponent.
    Recorded,
    /// Same player voted again; idempotent, nothing changed.
    AlreadyVoted,
    /// Both players agreed; the board was reset and play restarted.
    Reset,
}

/// Authoritative state of one match.
///
/// All mutation goes through [`Game::apply_move`] and [`Game::vote_rematch`];
/// outcomes are always re-derived from the cells by the evaluators rather than
/// cached, so the struct carries no denormalized win state.
#[derive(Debug, Clone)]
pub struct Game {
    big_board: BigBoard,
    turn: Player,
    next_board: Option<u8>,
    phase: GamePhase,
    rematch: Option<Player>,
}

impl Game {
    /// A fresh game waiting for its second player, with slot 0 to move first.
    pub fn new() -> Self {
        Self {
            big_board: empty_big_board(),
            turn: Player::Zero,
            next_board: None,
            phase: GamePhase::AwaitingSecondPlayer,
            rematch: None,
        }
    }

    /// The full 9x9 cell grid.
    pub fn big_board(&self) -> &BigBoard {
        &self.big_board
    }

    /// The player whose move is next.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// The sub-board the next move is constrained to, or `None` for any.
    pub fn next_board(&self) -> Option<u8> {
        self.next_board
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// The player holding the pending rematch vote, if any.
    pub fn rematch(&self) -> Option<Player> {
        self.rematch
    }

    /// Move the game from `AwaitingSecondPlayer` to `InProgress` once the
    /// second slot is taken. A no-op in any other phase.
    pub fn start(&mut self) {
        if self.phase == GamePhase::AwaitingSecondPlayer {
            self.phase = GamePhase::InProgress;
        }
    }

    /// Validate and apply one move.
    ///
    /// On acceptance the cell is marked, the turn flips, and the next active
    /// board is routed to the sub-board matching the played cell index. If
    /// that destination board is already decided the constraint opens up and
    /// the opponent may play anywhere. A decided meta-board moves the game to
    /// [`GamePhase::Decided`].
    ///
    /// On rejection nothing changes and the reason is returned for logging.
    pub fn apply_move(&mut self, player: Player, board: u8, cell: u8) -> Result<(), IllegalMove> {
        if board >= 9 || cell >= 9 {
            return Err(IllegalMove::OutOfRange);
        }
        if self.phase != GamePhase::InProgress {
            return Err(IllegalMove::NotInProgress);
        }
        if player != self.turn {
            return Err(IllegalMove::NotYourTurn);
        }
        if self.next_board.is_some_and(|active| active != board) {
            return Err(IllegalMove::WrongBoard);
        }

        let board_index = usize::from(board);
        let cell_index = usize::from(cell);
        if evaluate_board(&self.big_board[board_index]).is_decided() {
            return Err(IllegalMove::BoardDecided);
        }
        if self.big_board[board_index][cell_index].is_some() {
            return Err(IllegalMove::CellOccupied);
        }

        self.big_board[board_index][cell_index] = Some(player);
        self.turn = player.other();
        self.next_board = if evaluate_board(&self.big_board[cell_index]).is_decided() {
            None
        } else {
            Some(cell)
        };
        if evaluate_big_board(&self.big_board).is_decided() {
            self.phase = GamePhase::Decided;
        }
        Ok(())
    }

    /// Record a rematch vote from `player` on a decided game.
    ///
    /// The negotiation is a two-voter agreement: the first vote is held, a
    /// repeat vote from the same player changes nothing, and a vote from the
    /// other player triggers the reset. The reset empties the board, clears
    /// the vote and the board constraint, hands the first move to the player
    /// who was not on turn when the game was decided, and resumes play.
    pub fn vote_rematch(&mut self, player: Player) -> Result<RematchOutcome, RematchError> {
        if self.phase != GamePhase::Decided {
            return Err(RematchError::NotDecided);
        }
        match self.rematch {
            None => {
                self.rematch = Some(player);
                Ok(RematchOutcome::Recorded)
            }
            Some(voter) if voter == player => Ok(RematchOutcome::AlreadyVoted),
            Some(_) => {
                self.big_board = empty_big_board();
                self.turn = self.turn.other();
                self.next_board = None;
                self.rematch = None;
                self.phase = GamePhase::InProgress;
                Ok(RematchOutcome::Reset)
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_game() -> Game {
        let mut game = Game::new();
        game.start();
        game
    }

    /// Play a fixed legal sequence where player zero wins the top meta row.
    ///
    /// Zero takes the bottom rows of boards 0, 1 and 2; the cell indices 6/7/8
    /// route player one into boards 6, 7 and 8, whose replies route zero right
    /// back. Player one incidentally wins boards 6 and 7, which never form a
    /// meta line before zero's final move.
    fn decided_game() -> Game {
        let mut game = started_game();
        let moves: [(Player, u8, u8); 17] = [
            (Player::Zero, 0, 6),
            (Player::One, 6, 0),
            (Player::Zero, 0, 7),
            (Player::One, 7, 0),
            (Player::Zero, 0, 8),
            (Player::One, 8, 1),
            (Player::Zero, 1, 6),
            (Player::One, 6, 1),
            (Player::Zero, 1, 7),
            (Player::One, 7, 1),
            (Player::Zero, 1, 8),
            (Player::One, 8, 2),
            (Player::Zero, 2, 6),
            (Player::One, 6, 2),
            (Player::Zero, 2, 7),
            (Player::One, 7, 2),
            (Player::Zero, 2, 8),
        ];
        for (player, board, cell) in moves {
            game.apply_move(player, board, cell).unwrap();
        }
        assert_eq!(game.phase(), GamePhase::Decided);
        game
    }

    #[test]
    fn new_game_awaits_second_player() {
        let game = Game::new();
        assert_eq!(game.phase(), GamePhase::AwaitingSecondPlayer);
        assert_eq!(game.turn(), Player::Zero);
        assert_eq!(game.next_board(), None);
        assert!(game.big_board().iter().flatten().all(|cell| cell.is_none()));
    }

    #[test]
    fn moves_rejected_before_second_player_joins() {
        let mut game = Game::new();
        assert_eq!(
            game.apply_move(Player::Zero, 4, 4),
            Err(IllegalMove::NotInProgress)
        );
        assert!(game.big_board()[4][4].is_none());
    }

    #[test]
    fn legal_move_marks_cell_flips_turn_and_routes() {
        let mut game = started_game();
        game.apply_move(Player::Zero, 4, 7).unwrap();

        assert_eq!(game.big_board()[4][7], Some(Player::Zero));
        assert_eq!(game.turn(), Player::One);
        assert_eq!(game.next_board(), Some(7));

        // Only the targeted cell changed.
        let marked = game
            .big_board()
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count();
        assert_eq!(marked, 1);
    }

    #[test]
    fn out_of_turn_move_is_rejected() {
        let mut game = started_game();
        assert_eq!(
            game.apply_move(Player::One, 0, 0),
            Err(IllegalMove::NotYourTurn)
        );
    }

    #[test]
    fn active_board_constraint_is_enforced() {
        let mut game = started_game();
        game.apply_move(Player::Zero, 4, 2).unwrap();
        assert_eq!(
            game.apply_move(Player::One, 5, 0),
            Err(IllegalMove::WrongBoard)
        );
        game.apply_move(Player::One, 2, 5).unwrap();
        assert_eq!(game.next_board(), Some(5));
    }

    #[test]
    fn occupied_cell_is_rejected() {
        let mut game = started_game();
        game.apply_move(Player::Zero, 4, 4).unwrap();
        assert_eq!(
            game.apply_move(Player::One, 4, 4),
            Err(IllegalMove::CellOccupied)
        );
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut game = started_game();
        assert_eq!(game.apply_move(Player::Zero, 9, 0), Err(IllegalMove::OutOfRange));
        assert_eq!(game.apply_move(Player::Zero, 0, 9), Err(IllegalMove::OutOfRange));
    }

    #[test]
    fn rejected_move_leaves_no_state_drift() {
        let mut game = started_game();
        game.apply_move(Player::Zero, 4, 4).unwrap();

        let before = game.clone();
        for _ in 0..2 {
            assert_eq!(
                game.apply_move(Player::Zero, 4, 5),
                Err(IllegalMove::NotYourTurn)
            );
            assert_eq!(game.big_board(), before.big_board());
            assert_eq!(game.turn(), before.turn());
            assert_eq!(game.next_board(), before.next_board());
            assert_eq!(game.phase(), before.phase());
        }
    }

    #[test]
    fn routing_to_a_decided_board_opens_the_whole_meta_board() {
        let mut game = started_game();
        // Pre-win sub-board 7 for player one without deciding the game.
        game.apply_move(Player::Zero, 8, 7).unwrap();
        game.apply_move(Player::One, 7, 0).unwrap();
        game.apply_move(Player::Zero, 0, 7).unwrap();
        game.apply_move(Player::One, 7, 1).unwrap();
        game.apply_move(Player::Zero, 1, 7).unwrap();
        game.apply_move(Player::One, 7, 2).unwrap();
        assert!(evaluate_board(&game.big_board()[7]).is_decided());
        assert_eq!(game.next_board(), Some(2));

        // A move landing on cell 7 would route to the decided board; the
        // constraint must open instead.
        game.apply_move(Player::Zero, 2, 7).unwrap();
        assert_eq!(game.next_board(), None);
        game.apply_move(Player::One, 6, 6).unwrap();
        assert_eq!(game.next_board(), Some(6));
    }

    #[test]
    fn moves_into_a_decided_board_are_rejected() {
        let mut game = started_game();
        game.apply_move(Player::Zero, 8, 7).unwrap();
        game.apply_move(Player::One, 7, 0).unwrap();
        game.apply_move(Player::Zero, 0, 7).unwrap();
        game.apply_move(Player::One, 7, 1).unwrap();
        game.apply_move(Player::Zero, 1, 7).unwrap();
        game.apply_move(Player::One, 7, 2).unwrap();
        game.apply_move(Player::Zero, 2, 7).unwrap();
        assert_eq!(game.next_board(), None);

        // Board 7 is won; playing into its remaining empty cells is illegal.
        assert_eq!(
            game.apply_move(Player::One, 7, 8),
            Err(IllegalMove::BoardDecided)
        );
    }

    #[test]
    fn decided_game_stops_accepting_moves() {
        let mut game = decided_game();
        assert_eq!(game.phase(), GamePhase::Decided);
        let before = game.clone();
        let turn = game.turn();
        assert_eq!(
            game.apply_move(turn, 8, 8),
            Err(IllegalMove::NotInProgress)
        );
        assert_eq!(game.big_board(), before.big_board());
    }

    #[test]
    fn rematch_vote_requires_a_decided_game() {
        let mut game = started_game();
        assert_eq!(
            game.vote_rematch(Player::Zero),
            Err(RematchError::NotDecided)
        );
        assert_eq!(game.rematch(), None);
    }

    #[test]
    fn first_vote_is_recorded_and_repeat_votes_are_idempotent() {
        let mut game = decided_game();
        assert_eq!(game.vote_rematch(Player::One), Ok(RematchOutcome::Recorded));
        assert_eq!(game.rematch(), Some(Player::One));
        assert_eq!(
            game.vote_rematch(Player::One),
            Ok(RematchOutcome::AlreadyVoted)
        );
        assert_eq!(game.rematch(), Some(Player::One));
        assert_eq!(game.phase(), GamePhase::Decided);
    }

    #[test]
    fn mutual_votes_reset_the_game() {
        let mut game = decided_game();
        let turn_at_decision = game.turn();

        assert_eq!(game.vote_rematch(Player::Zero), Ok(RematchOutcome::Recorded));
        assert_eq!(game.vote_rematch(Player::One), Ok(RematchOutcome::Reset));

        assert_eq!(game.phase(), GamePhase::InProgress);
        assert_eq!(game.rematch(), None);
        assert_eq!(game.next_board(), None);
        assert!(game.big_board().iter().flatten().all(|cell| cell.is_none()));
        // First move passes to the player who was not on turn at decision.
        assert_eq!(game.turn(), turn_at_decision.other());
    }
}
