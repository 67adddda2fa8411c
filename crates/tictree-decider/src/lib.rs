//! Binary decision trees that play tic-tac-toe.
//!
//! A [`DecisionTree`] asks a chain of yes/no questions about the board ("is
//! cell 4 empty?", "is cell 0 mine?") and ends in a [`Leaf`] holding a ranked
//! list of preferred moves. The first preferred cell that is still empty is
//! played.
//!
//! # Operations
//!
//! - [`DecisionTree::random`] - grow a random tree
//! - [`DecisionTree::decide`] - pick a move for a board
//! - [`DecisionTree::mutate`] - perturb tests and leaf orders in place
//! - [`DecisionTree::breed`] - combine the tests of two parent trees
//! - [`DecisionTree::duplicate`] - deep copy
//! - [`DecisionTree::render`] - human readable dump
//!
//! # Path Constraints
//!
//! Every node is reached through a chain of test outcomes. Taking the true
//! branch of `(position, value)` pins the cell, so no later test on that path
//! may look at the position again; taking the false branch only rules out
//! `value`. Construction, mutation and crossover all track these constraints
//! top-down, which guarantees that:
//!
//! - no test on a path is redundant or contradictory, and
//! - each leaf prefers exactly the cells whose emptiness the path has not
//!   already decided against.
//!
//! Tests are always written from the acting player's perspective:
//! [`CellState::PlayerA`](tictree_engine::CellState::PlayerA) means "my mark"
//! and [`CellState::PlayerB`](tictree_engine::CellState::PlayerB) means "the
//! opponent's mark".
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64Mcg;
//! use tictree_decider::DecisionTree;
//! use tictree_engine::{Board, Player};
//!
//! let mut rng = Pcg64Mcg::seed_from_u64(7);
//! let tree = DecisionTree::random(0.9, &mut rng);
//!
//! let board = Board::new();
//! let position = tree.decide(&board, Player::A).unwrap();
//! assert!(board.cell(position).is_empty());
//! ```

pub use self::{constraint::PositionSet, node::*, tree::*};

mod breed;
mod constraint;
mod construct;
mod mutate;
mod node;
mod render;
mod tree;

#[cfg(test)]
mod test_util;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DecideError {
    #[display("no position in the leaf's preference order is empty")]
    NoLegalMove,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum MalformedTreeError {
    #[display("top node of a tree must be a root")]
    RootNotAtTop,
    #[display("root node found below the top of the tree")]
    NestedRoot,
    #[display("child in the {expected} slot is flagged as the other branch")]
    BranchSideMismatch { expected: bool },
    #[display("position {position} appears more than once in a preference order")]
    DuplicatePreference {
        position: tictree_engine::BoardPosition,
    },
    #[display("invalid preference position: {_0}")]
    #[from]
    InvalidPosition(tictree_engine::InvalidPositionError),
}
