//! Board primitives: cells, players, and the win/draw evaluators for both
//! nesting levels of the meta-board.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// One of the two participants of a match, identified by their slot number.
///
/// Serializes as the bare numbers `0`/`1` so board cells and turn markers on
/// the wire stay `null | 0 | 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// The room creator.
    Zero,
    /// The player who joined second.
    One,
}

impl Player {
    /// The opposing player.
    pub fn other(self) -> Self {
        match self {
            Player::Zero => Player::One,
            Player::One => Player::Zero,
        }
    }

    /// Slot number used for indexing and on the wire.
    pub fn index(self) -> usize {
        match self {
            Player::Zero => 0,
            Player::One => 1,
        }
    }

    /// Parse a slot number, accepting only `0` or `1`.
    pub fn from_index(value: u8) -> Option<Self> {
        match value {
            0 => Some(Player::Zero),
            1 => Some(Player::One),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

impl Serialize for Player {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index() as u8)
    }
}

impl<'de> Deserialize<'de> for Player {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Player::from_index(value)
            .ok_or_else(|| de::Error::invalid_value(de::Unexpected::Unsigned(value.into()), &"0 or 1"))
    }
}

/// A single square: empty or marked by one of the players.
pub type Cell = Option<Player>;

/// One 3x3 grid of cells, row-major.
pub type SubBoard = [Cell; 9];

/// The 3x3 grid of sub-boards making up the whole game board, row-major.
pub type BigBoard = [SubBoard; 9];

/// A fresh, fully empty big board.
pub fn empty_big_board() -> BigBoard {
    [[None; 9]; 9]
}

/// Index triples of the 8 winning lines (3 rows, 3 columns, 2 diagonals).
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Result of evaluating a board at either nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The board can still be played on.
    Undecided,
    /// A player completed a line.
    Won(Player),
    /// The board is exhausted with no winner.
    Drawn,
}

impl Outcome {
    /// Whether the board accepts no further marks (won or drawn).
    pub fn is_decided(self) -> bool {
        !matches!(self, Outcome::Undecided)
    }

    /// The winning player, if any.
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Won(player) => Some(player),
            _ => None,
        }
    }
}

/// Evaluate one sub-board from scratch.
///
/// A line of three identical marks wins; a full board with no winning line is
/// drawn; anything else is still undecided. The board is tiny, so outcomes are
/// always re-derived rather than tracked incrementally.
pub fn evaluate_board(board: &SubBoard) -> Outcome {
    for [a, b, c] in LINES {
        if let Some(mark) = board[a] {
            if board[b] == Some(mark) && board[c] == Some(mark) {
                return Outcome::Won(mark);
            }
        }
    }
    if board.iter().all(|cell| cell.is_some()) {
        return Outcome::Drawn;
    }
    Outcome::Undecided
}

/// Evaluate the whole game from the nine sub-board outcomes.
///
/// The same line check runs one level up, with each sub-board contributing its
/// winner as the "mark". Drawn sub-boards carry no mark, so three drawn boards
/// in a row win nothing. The game is drawn once every sub-board is decided and
/// no meta-level line exists.
pub fn evaluate_big_board(big_board: &BigBoard) -> Outcome {
    for [a, b, c] in LINES {
        if let Some(mark) = evaluate_board(&big_board[a]).winner() {
            if evaluate_board(&big_board[b]).winner() == Some(mark)
                && evaluate_board(&big_board[c]).winner() == Some(mark)
            {
                return Outcome::Won(mark);
            }
        }
    }
    if big_board
        .iter()
        .all(|board| evaluate_board(board).is_decided())
    {
        return Outcome::Drawn;
    }
    Outcome::Undecided
}
