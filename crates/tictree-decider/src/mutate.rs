//! In-place mutation of tests and leaf preferences.

use rand::Rng;

use crate::{
    constraint::PathConstraints,
    node::{Branch, DecisionNode},
    tree::DecisionTree,
};

#[derive(Debug, Default)]
struct MutationStats {
    tests: usize,
    leaves: usize,
}

impl DecisionTree {
    /// Randomly perturbs the tree without changing its shape.
    ///
    /// The first pass visits every root and branch: with probability `rate`
    /// its test is replaced by a different one the path still admits. A test
    /// that an ancestor's change made redundant is replaced regardless.
    ///
    /// The second pass visits every leaf. With probability `rate` it gets a
    /// new ordering of its eligible cells, different from the old one when
    /// possible. A leaf whose eligible cells changed during the first pass
    /// is always reshuffled over the new set.
    ///
    /// `rate` is clamped to `[0, 1]`.
    pub fn mutate<R>(&mut self, rate: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        let mut stats = MutationStats::default();
        let root = self.root_node_mut();
        mutate_tests(root, &PathConstraints::new(), rate, rng, &mut stats);
        mutate_leaves(root, &PathConstraints::new(), rate, rng, &mut stats);
        log::debug!(
            "mutated at rate {rate}: {} tests, {} leaves changed",
            stats.tests,
            stats.leaves
        );
    }
}

fn mutate_tests<R>(
    node: &mut DecisionNode,
    constraints: &PathConstraints,
    rate: f64,
    rng: &mut R,
    stats: &mut MutationStats,
) where
    R: Rng + ?Sized,
{
    let Some(split) = node.split_mut() else {
        return;
    };

    let current = split.test;
    let replacement = if rng.random_bool(rate) {
        constraints.choose_test_excluding(Some(current), rng)
    } else {
        None
    };
    let test = match replacement {
        Some(test) => test,
        None if constraints.admits(current) => current,
        None => constraints.choose_test(rng).unwrap_or_else(|| {
            log::warn!("no informative test left to replace {current:?}, keeping it");
            current
        }),
    };
    if test != current {
        split.test = test;
        stats.tests += 1;
    }

    for (outcome, child) in split.children_mut() {
        mutate_tests(child, &constraints.follow(test, outcome), rate, rng, stats);
    }
}

fn mutate_leaves<R>(
    node: &mut DecisionNode,
    constraints: &PathConstraints,
    rate: f64,
    rng: &mut R,
    stats: &mut MutationStats,
) where
    R: Rng + ?Sized,
{
    match node {
        DecisionNode::Root(split) | DecisionNode::Branch(Branch { split, .. }) => {
            let test = split.test;
            for (outcome, child) in split.children_mut() {
                mutate_leaves(child, &constraints.follow(test, outcome), rate, rng, stats);
            }
        }
        DecisionNode::Leaf(leaf) => {
            let rolled = rng.random_bool(rate);
            let same_cells =
                leaf.preference_order.position_set() == constraints.eligible_positions();
            if !rolled && same_cells {
                return;
            }

            let mut order = constraints.shuffled_preferences(rng);
            if same_cells && order.len() >= 2 {
                while order == leaf.preference_order {
                    order = constraints.shuffled_preferences(rng);
                }
            }
            if order != leaf.preference_order {
                leaf.preference_order = order;
                stats.leaves += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;
    use tictree_engine::{BoardPosition, CellState};

    use super::*;
    use crate::{
        node::{PreferenceOrder, Test},
        test_util,
    };

    fn same_shape(a: &DecisionTree, b: &DecisionTree) -> bool {
        a.node_count() == b.node_count()
            && a.nodes().zip(b.nodes()).all(|(x, y)| {
                x.is_leaf() == y.is_leaf() && x.is_true_branch() == y.is_true_branch()
            })
    }

    /// Number of tests `constraints` still admits.
    fn admissible_tests(constraints: &PathConstraints) -> usize {
        BoardPosition::ALL
            .into_iter()
            .flat_map(|position| CellState::ALL.map(|value| Test::new(position, value)))
            .filter(|test| constraints.admits(*test))
            .count()
    }

    #[test]
    fn test_zero_rate_is_noop_on_generated_trees() {
        let mut rng = Pcg64Mcg::seed_from_u64(17);
        for _ in 0..100 {
            let tree = DecisionTree::random(0.98, &mut rng);
            let mut copy = tree.duplicate();
            copy.mutate(0.0, &mut rng);
            assert_eq!(copy, tree);
        }
    }

    #[test]
    fn test_full_rate_changes_every_changeable_node() {
        fn walk(before: &DecisionNode, after: &DecisionNode, constraints: &PathConstraints) {
            match (before, after) {
                (DecisionNode::Leaf(old), DecisionNode::Leaf(new)) => {
                    if constraints.eligible_positions().len() >= 2 {
                        assert_ne!(old.preference_order, new.preference_order);
                    }
                }
                _ => {
                    let (old, new) = (before.split().unwrap(), after.split().unwrap());
                    if admissible_tests(constraints) >= 2 {
                        assert_ne!(old.test, new.test);
                    }
                    for outcome in [true, false] {
                        walk(
                            old.child(outcome),
                            new.child(outcome),
                            &constraints.follow(new.test, outcome),
                        );
                    }
                }
            }
        }

        let mut rng = Pcg64Mcg::seed_from_u64(23);
        for _ in 0..100 {
            let tree = DecisionTree::random(0.98, &mut rng);
            let mut copy = tree.duplicate();
            copy.mutate(1.0, &mut rng);
            assert!(same_shape(&tree, &copy));
            test_util::assert_well_formed(&copy);
            walk(tree.root(), copy.root(), &PathConstraints::new());
        }
    }

    #[test]
    fn test_partial_rate_keeps_shape_and_invariants() {
        let mut rng = Pcg64Mcg::seed_from_u64(29);
        for _ in 0..200 {
            let tree = DecisionTree::random(0.98, &mut rng);
            let mut copy = tree.duplicate();
            copy.mutate(0.3, &mut rng);
            assert!(same_shape(&tree, &copy));
            test_util::assert_well_formed(&copy);
        }
    }

    #[test]
    fn test_out_of_range_rate_is_clamped() {
        let mut rng = Pcg64Mcg::seed_from_u64(31);
        let tree = DecisionTree::random(0.9, &mut rng);

        let mut copy = tree.duplicate();
        copy.mutate(-2.0, &mut rng);
        assert_eq!(copy, tree);

        copy.mutate(f64::NAN, &mut rng);
        assert_eq!(copy, tree);

        copy.mutate(7.5, &mut rng);
        assert_ne!(copy.root_test(), tree.root_test());
    }

    #[test]
    fn test_zero_rate_repairs_leaves_that_disagree_with_their_path() {
        let p = |i| BoardPosition::new(i).unwrap();
        let mut tree = DecisionTree::from_root(DecisionNode::root(
            Test::new(p(1), CellState::Empty),
            DecisionNode::leaf(PreferenceOrder::from_indices(&[1, 2, 3, 5, 7]).unwrap()),
            DecisionNode::leaf(PreferenceOrder::from_indices(&[4, 6, 8, 0]).unwrap()),
        ))
        .unwrap();

        tree.mutate(0.0, &mut Pcg64Mcg::seed_from_u64(0));
        assert_eq!(tree.root_test(), Test::new(p(1), CellState::Empty));
        test_util::assert_well_formed(&tree);
    }
}
