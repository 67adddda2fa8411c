use serde::{Deserialize, Serialize};
use tictree_engine::{Board, BoardPosition, Player};

use crate::{
    DecideError, MalformedTreeError,
    node::{Branch, DecisionNode, Leaf, Split, Test},
};

/// A complete decision tree: a [`DecisionNode::Root`] and everything below it.
///
/// Trees can only be created through [`Self::from_root`] (and the generating
/// operations), so every `DecisionTree` has a root at the top, no other root
/// below it, and children flagged with the branch they hang from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DecisionNode", into = "DecisionNode")]
pub struct DecisionTree {
    root: DecisionNode,
}

impl DecisionTree {
    /// Wraps a hand-built node structure, checking structural invariants.
    pub fn from_root(root: DecisionNode) -> Result<Self, MalformedTreeError> {
        let DecisionNode::Root(split) = &root else {
            return Err(MalformedTreeError::RootNotAtTop);
        };
        validate_children(split)?;
        Ok(Self { root })
    }

    pub(crate) fn from_split(split: Split) -> Self {
        Self {
            root: DecisionNode::Root(split),
        }
    }

    #[must_use]
    pub fn root(&self) -> &DecisionNode {
        &self.root
    }

    pub(crate) fn root_split(&self) -> &Split {
        match &self.root {
            DecisionNode::Root(split) => split,
            DecisionNode::Branch(_) | DecisionNode::Leaf(_) => {
                unreachable!("top of a decision tree is always a root")
            }
        }
    }

    pub(crate) fn root_node_mut(&mut self) -> &mut DecisionNode {
        &mut self.root
    }

    #[must_use]
    pub fn root_test(&self) -> Test {
        self.root_split().test
    }

    /// Follows the tests from the root down to the leaf that applies to
    /// `board` when `player` is about to move.
    #[must_use]
    pub fn leaf_for(&self, board: &Board, player: Player) -> &Leaf {
        let mut node = &self.root;
        loop {
            match node {
                DecisionNode::Root(split) | DecisionNode::Branch(Branch { split, .. }) => {
                    node = split.child(split.test.evaluate(board, player));
                }
                DecisionNode::Leaf(leaf) => return leaf,
            }
        }
    }

    /// Chooses a move for `player`.
    ///
    /// Returns the first empty cell in the reached leaf's preference order,
    /// or [`DecideError::NoLegalMove`] if every preferred cell is taken.
    pub fn decide(&self, board: &Board, player: Player) -> Result<BoardPosition, DecideError> {
        let leaf = self.leaf_for(board, player);
        let position = leaf.preference_order.first_empty(board);
        log::debug!(
            "decided {position:?} for player {player} from {:?}",
            leaf.preference_order.as_slice()
        );
        position.ok_or(DecideError::NoLegalMove)
    }

    /// Deep copy sharing nothing with `self`.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Number of edges on the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        fn depth(node: &DecisionNode) -> usize {
            node.split().map_or(0, |split| {
                1 + usize::max(depth(&split.true_child), depth(&split.false_child))
            })
        }
        depth(&self.root)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes().filter(|n| n.is_leaf()).count()
    }

    /// Iterates over every node, depth first, true branch before false.
    pub fn nodes(&self) -> impl Iterator<Item = &DecisionNode> {
        let mut stack = vec![&self.root];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            if let Some(split) = node.split() {
                stack.push(&split.false_child);
                stack.push(&split.true_child);
            }
            Some(node)
        })
    }
}

fn validate_children(split: &Split) -> Result<(), MalformedTreeError> {
    for (outcome, child) in split.children() {
        match child {
            DecisionNode::Root(_) => return Err(MalformedTreeError::NestedRoot),
            DecisionNode::Branch(Branch {
                is_true_branch,
                split,
            }) => {
                if *is_true_branch != outcome {
                    return Err(MalformedTreeError::BranchSideMismatch { expected: outcome });
                }
                validate_children(split)?;
            }
            DecisionNode::Leaf(Leaf { is_true_branch, .. }) => {
                if *is_true_branch != outcome {
                    return Err(MalformedTreeError::BranchSideMismatch { expected: outcome });
                }
            }
        }
    }
    Ok(())
}

impl TryFrom<DecisionNode> for DecisionTree {
    type Error = MalformedTreeError;

    fn try_from(root: DecisionNode) -> Result<Self, Self::Error> {
        Self::from_root(root)
    }
}

impl From<DecisionTree> for DecisionNode {
    fn from(tree: DecisionTree) -> Self {
        tree.root
    }
}
