//! Tic-tac-toe board model.
//!
//! - [`CellState`] / [`Player`] - cell contents and the two sides
//! - [`BoardPosition`] - a validated 0-8 row-major cell index
//! - [`Board`] - 9 cells plus turn and outcome tracking
//!
//! # Example
//!
//! ```
//! use tictree_engine::{Board, BoardPosition, Player};
//!
//! let mut board = Board::new();
//! let center = BoardPosition::new(4).unwrap();
//! board.apply(center, Player::A).unwrap();
//!
//! assert!(board.apply(center, Player::B).is_err());
//! ```

pub use self::core::*;

pub mod core;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum IllegalMoveError {
    #[display("position {position} is already occupied")]
    Occupied { position: BoardPosition },
    #[display("game is already over")]
    GameOver,
    #[display("it is player {expected}'s turn")]
    OutOfTurn { expected: Player },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("board position {index} is out of range (must be 0-8)")]
pub struct InvalidPositionError {
    pub index: u8,
}

/// A deserialized board whose recorded status disagrees with its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("board status {recorded:?} does not match its cells ({actual:?})")]
pub struct InconsistentBoardError {
    pub recorded: BoardStatus,
    pub actual: BoardStatus,
}
