use crate::{
    constraint::PathConstraints,
    node::{Branch, DecisionNode},
    tree::DecisionTree,
};

/// Asserts the path invariants every generated tree must hold: each test is
/// still informative where it sits, each child is flagged with its slot, and
/// each leaf prefers exactly the cells its path leaves undetermined.
pub(crate) fn assert_well_formed(tree: &DecisionTree) {
    fn walk(node: &DecisionNode, constraints: &PathConstraints, side: Option<bool>) {
        assert_eq!(node.is_true_branch(), side, "bad branch flag on {node:?}");
        match node {
            DecisionNode::Root(split) | DecisionNode::Branch(Branch { split, .. }) => {
                assert!(
                    constraints.admits(split.test),
                    "{:?} repeats a settled test",
                    split.test
                );
                for (outcome, child) in split.children() {
                    walk(child, &constraints.follow(split.test, outcome), Some(outcome));
                }
            }
            DecisionNode::Leaf(leaf) => {
                assert_eq!(
                    leaf.preference_order.position_set(),
                    constraints.eligible_positions()
                );
            }
        }
    }
    walk(tree.root(), &PathConstraints::new(), None);
}
