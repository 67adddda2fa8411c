//! Random tree generation.

use rand::Rng;

use crate::{
    constraint::PathConstraints,
    node::{DecisionNode, Split},
    tree::DecisionTree,
};

impl DecisionTree {
    /// Grows a random tree.
    ///
    /// The root always tests something. Below it, a node at depth `d` becomes
    /// a branch with probability `p_d`, where `p_0 = branch_probability` and
    /// `p_{d+1} = p_d²`; it becomes a leaf otherwise, or when the path leaves
    /// nothing worth testing. Each branch picks a test still admitted by its
    /// path, and each leaf prefers a random ordering of the cells the path has
    /// not ruled out.
    ///
    /// The quadratic decay keeps trees shallow for any `branch_probability`
    /// below 1. At exactly 1 the tree grows until every path is exhausted,
    /// which is exponentially large.
    #[must_use]
    pub fn random<R>(branch_probability: f64, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let constraints = PathConstraints::new();
        let test = constraints
            .choose_test(rng)
            .expect("unconstrained path always admits a test");
        let child_probability = branch_probability * branch_probability;
        let true_child = random_node(&constraints.follow(test, true), child_probability, rng);
        let false_child = random_node(&constraints.follow(test, false), child_probability, rng);
        let tree = Self::from_split(Split::new(test, true_child, false_child));
        log::debug!(
            "built random tree: depth {}, {} nodes",
            tree.depth(),
            tree.node_count()
        );
        tree
    }
}

fn random_node<R>(
    constraints: &PathConstraints,
    branch_probability: f64,
    rng: &mut R,
) -> DecisionNode
where
    R: Rng + ?Sized,
{
    let wants_leaf = rng.random::<f64>() > branch_probability;
    let test = if wants_leaf || constraints.is_exhausted() {
        None
    } else {
        constraints.choose_test(rng)
    };
    let Some(test) = test else {
        return DecisionNode::leaf(constraints.shuffled_preferences(rng));
    };

    let child_probability = branch_probability * branch_probability;
    let true_child = random_node(&constraints.follow(test, true), child_probability, rng);
    let false_child = random_node(&constraints.follow(test, false), child_probability, rng);
    DecisionNode::branch(test, true_child, false_child)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::test_util;

    #[test]
    fn test_random_trees_are_well_formed() {
        for seed in 0..200 {
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            let tree = DecisionTree::random(0.98, &mut rng);
            test_util::assert_well_formed(&tree);
            assert!(tree.root().is_root());
        }
    }

    #[test]
    fn test_zero_probability_gives_single_test() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        let tree = DecisionTree::random(0.0, &mut rng);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaf_count(), 2);
        test_util::assert_well_formed(&tree);
    }

    #[test]
    fn test_same_seed_same_tree() {
        let a = DecisionTree::random(0.9, &mut Pcg64Mcg::seed_from_u64(99));
        let b = DecisionTree::random(0.9, &mut Pcg64Mcg::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_high_probability_grows_deeper_trees() {
        let total_depth = |p: f64| -> usize {
            (0..100)
                .map(|seed| DecisionTree::random(p, &mut Pcg64Mcg::seed_from_u64(seed)).depth())
                .sum()
        };
        assert!(total_depth(0.98) > total_depth(0.3));
    }

    #[test]
    fn test_random_trees_always_find_a_move_on_reachable_boards() {
        use tictree_engine::Board;

        for seed in 0..50 {
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            let tree = DecisionTree::random(0.98, &mut rng);
            let mut board = Board::new();
            while let Some(player) = board.to_move() {
                let position = tree.decide(&board, player).unwrap();
                assert!(board.cell(position).is_empty());
                board.apply(position, player).unwrap();
            }
        }
    }
}
