use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use tictree_engine::{Board, BoardPosition, CellState, Player};

use crate::{MalformedTreeError, constraint::PositionSet};

/// A yes/no question about one cell: "does `position` hold `value`?"
///
/// `value` is read from the acting player's perspective, see
/// [`Player::perspective`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Test {
    pub position: BoardPosition,
    pub value: CellState,
}

impl Test {
    #[must_use]
    pub const fn new(position: BoardPosition, value: CellState) -> Self {
        Self { position, value }
    }

    #[must_use]
    pub fn evaluate(self, board: &Board, player: Player) -> bool {
        player.perspective(board.cell(self.position)) == self.value
    }
}

/// Ranked list of candidate moves held by a leaf. Never contains a position
/// twice.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BoardPosition>", into = "Vec<BoardPosition>")]
pub struct PreferenceOrder(ArrayVec<BoardPosition, { BoardPosition::LEN }>);

impl PreferenceOrder {
    pub fn new<I>(positions: I) -> Result<Self, MalformedTreeError>
    where
        I: IntoIterator<Item = BoardPosition>,
    {
        let mut seen = PositionSet::EMPTY;
        let mut order = ArrayVec::new();
        for position in positions {
            if seen.contains(position) {
                return Err(MalformedTreeError::DuplicatePreference { position });
            }
            seen.insert(position);
            order.push(position);
        }
        Ok(Self(order))
    }

    /// Builds an order from raw indices, as found in hand-written trees.
    pub fn from_indices(indices: &[u8]) -> Result<Self, MalformedTreeError> {
        let positions = indices
            .iter()
            .map(|&i| BoardPosition::try_from(i))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(positions)
    }

    pub(crate) fn from_unique(order: ArrayVec<BoardPosition, { BoardPosition::LEN }>) -> Self {
        debug_assert_eq!(
            order.iter().copied().collect::<PositionSet>().len(),
            order.len()
        );
        Self(order)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[BoardPosition] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = BoardPosition> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn position_set(&self) -> PositionSet {
        self.iter().collect()
    }

    /// The first preferred position that is empty on `board`.
    #[must_use]
    pub fn first_empty(&self, board: &Board) -> Option<BoardPosition> {
        self.iter().find(|p| board.cell(*p).is_empty())
    }
}

impl TryFrom<Vec<BoardPosition>> for PreferenceOrder {
    type Error = MalformedTreeError;

    fn try_from(positions: Vec<BoardPosition>) -> Result<Self, Self::Error> {
        Self::new(positions)
    }
}

impl From<PreferenceOrder> for Vec<BoardPosition> {
    fn from(order: PreferenceOrder) -> Self {
        order.0.into_iter().collect()
    }
}

/// The test of an interior node together with its two subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub test: Test,
    pub true_child: Box<DecisionNode>,
    pub false_child: Box<DecisionNode>,
}

impl Split {
    /// Joins two subtrees under `test`, flagging each child with the slot it
    /// is placed in.
    #[must_use]
    pub fn new(test: Test, mut true_child: DecisionNode, mut false_child: DecisionNode) -> Self {
        true_child.set_branch_side(true);
        false_child.set_branch_side(false);
        Self {
            test,
            true_child: Box::new(true_child),
            false_child: Box::new(false_child),
        }
    }

    #[must_use]
    pub fn child(&self, outcome: bool) -> &DecisionNode {
        if outcome {
            &*self.true_child
        } else {
            &*self.false_child
        }
    }

    pub(crate) fn children(&self) -> [(bool, &DecisionNode); 2] {
        [(true, &*self.true_child), (false, &*self.false_child)]
    }

    pub(crate) fn children_mut(&mut self) -> [(bool, &mut DecisionNode); 2] {
        [
            (true, &mut *self.true_child),
            (false, &mut *self.false_child),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Which outcome of the parent's test leads here.
    pub is_true_branch: bool,
    pub split: Split,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    /// Which outcome of the parent's test leads here.
    pub is_true_branch: bool,
    pub preference_order: PreferenceOrder,
}

/// One node of a decision tree.
///
/// Interior nodes own both of their children; nothing points back up the
/// tree. A well-formed tree has exactly one [`DecisionNode::Root`], at the
/// top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum DecisionNode {
    Root(Split),
    Branch(Branch),
    Leaf(Leaf),
}

impl DecisionNode {
    #[must_use]
    pub fn root(test: Test, true_child: Self, false_child: Self) -> Self {
        Self::Root(Split::new(test, true_child, false_child))
    }

    /// An interior node. Its `is_true_branch` flag is set when it is placed
    /// under a parent.
    #[must_use]
    pub fn branch(test: Test, true_child: Self, false_child: Self) -> Self {
        Self::Branch(Branch {
            is_true_branch: false,
            split: Split::new(test, true_child, false_child),
        })
    }

    /// A terminal node. Its `is_true_branch` flag is set when it is placed
    /// under a parent.
    #[must_use]
    pub fn leaf(preference_order: PreferenceOrder) -> Self {
        Self::Leaf(Leaf {
            is_true_branch: false,
            preference_order,
        })
    }

    #[must_use]
    pub fn split(&self) -> Option<&Split> {
        match self {
            Self::Root(split) | Self::Branch(Branch { split, .. }) => Some(split),
            Self::Leaf(_) => None,
        }
    }

    pub fn split_mut(&mut self) -> Option<&mut Split> {
        match self {
            Self::Root(split) | Self::Branch(Branch { split, .. }) => Some(split),
            Self::Leaf(_) => None,
        }
    }

    #[must_use]
    pub fn test(&self) -> Option<Test> {
        self.split().map(|s| s.test)
    }

    /// `None` for the root, which has no parent.
    #[must_use]
    pub fn is_true_branch(&self) -> Option<bool> {
        match self {
            Self::Root(_) => None,
            Self::Branch(Branch { is_true_branch, .. })
            | Self::Leaf(Leaf { is_true_branch, .. }) => Some(*is_true_branch),
        }
    }

    fn set_branch_side(&mut self, side: bool) {
        match self {
            Self::Root(_) => {}
            Self::Branch(Branch { is_true_branch, .. })
            | Self::Leaf(Leaf { is_true_branch, .. }) => *is_true_branch = side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_order_rejects_duplicates() {
        assert_eq!(
            PreferenceOrder::from_indices(&[1, 2, 1]),
            Err(MalformedTreeError::DuplicatePreference {
                position: BoardPosition::new(1).unwrap()
            })
        );
        assert!(matches!(
            PreferenceOrder::from_indices(&[9]),
            Err(MalformedTreeError::InvalidPosition(_))
        ));
        assert_eq!(PreferenceOrder::from_indices(&[]).unwrap().len(), 0);
    }

    #[test]
    fn test_preference_order_deserialize_validates() {
        let order: PreferenceOrder = serde_json::from_str("[4, 0, 8]").unwrap();
        assert_eq!(order, PreferenceOrder::from_indices(&[4, 0, 8]).unwrap());
        assert!(serde_json::from_str::<PreferenceOrder>("[4, 4]").is_err());
    }

    #[test]
    fn test_first_empty_skips_occupied_cells() {
        let mut board = Board::new();
        board.apply(BoardPosition::new(4).unwrap(), Player::A).unwrap();
        let order = PreferenceOrder::from_indices(&[4, 6, 8]).unwrap();
        assert_eq!(order.first_empty(&board), BoardPosition::new(6));
    }

    #[test]
    fn test_split_sets_child_sides() {
        let leaf = || DecisionNode::leaf(PreferenceOrder::default());
        let test = Test::new(BoardPosition::new(0).unwrap(), CellState::Empty);
        let node = DecisionNode::root(test, DecisionNode::branch(test, leaf(), leaf()), leaf());

        let split = node.split().unwrap();
        assert_eq!(split.true_child.is_true_branch(), Some(true));
        assert_eq!(split.false_child.is_true_branch(), Some(false));
        let inner = split.true_child.split().unwrap();
        assert_eq!(inner.child(true).is_true_branch(), Some(true));
        assert_eq!(inner.child(false).is_true_branch(), Some(false));
        assert_eq!(node.is_true_branch(), None);
    }

    #[test]
    fn test_evaluate_uses_player_perspective() {
        let mut board = Board::new();
        board.apply(BoardPosition::new(0).unwrap(), Player::A).unwrap();
        let mine = Test::new(BoardPosition::new(0).unwrap(), CellState::PlayerA);
        assert!(mine.evaluate(&board, Player::A));
        assert!(!mine.evaluate(&board, Player::B));
        let theirs = Test::new(BoardPosition::new(0).unwrap(), CellState::PlayerB);
        assert!(theirs.evaluate(&board, Player::B));
    }
}
