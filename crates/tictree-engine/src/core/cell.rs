use serde::{Deserialize, Serialize};

/// Contents of a single board cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    PlayerA,
    PlayerB,
}

impl CellState {
    pub const LEN: usize = 3;
    pub const ALL: [Self; Self::LEN] = [Self::Empty, Self::PlayerA, Self::PlayerB];

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Character used when rendering a board: `.` for empty, `X` for A, `O` for B.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Empty => '.',
            Self::PlayerA => 'X',
            Self::PlayerB => 'O',
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Empty => 0,
            Self::PlayerA => 1,
            Self::PlayerB => 2,
        }
    }
}

/// One of the two sides of a game. `A` always moves first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Player {
    #[display("A")]
    A,
    #[display("B")]
    B,
}

impl Player {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// The mark this player leaves on the board.
    #[must_use]
    pub const fn mark(self) -> CellState {
        match self {
            Self::A => CellState::PlayerA,
            Self::B => CellState::PlayerB,
        }
    }

    /// Rewrites `cell` from this player's point of view.
    ///
    /// The player's own mark becomes [`CellState::PlayerA`], the opponent's
    /// mark becomes [`CellState::PlayerB`] and empty cells stay empty, so a
    /// strategy written for the first player works unchanged for the second.
    #[must_use]
    pub const fn perspective(self, cell: CellState) -> CellState {
        match (self, cell) {
            (_, CellState::Empty) => CellState::Empty,
            (Self::A, cell) => cell,
            (Self::B, CellState::PlayerA) => CellState::PlayerB,
            (Self::B, CellState::PlayerB) => CellState::PlayerA,
        }
    }
}
