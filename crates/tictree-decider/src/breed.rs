//! Crossover of two parent trees.

use arrayvec::ArrayVec;
use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    constraint::PathConstraints,
    node::{DecisionNode, Split, Test},
    tree::DecisionTree,
};

impl DecisionTree {
    /// Grows a child tree whose tests are borrowed from two parents.
    ///
    /// The child's root test is the root test of a parent picked by a fair
    /// coin. Every other node is built like in [`Self::random`], except that
    /// the root's children roll against `branch_probability` itself, squared
    /// only from the next level on, and that a branch copies its test from
    /// one of the parents: each parent is
    /// searched for the topmost test still informative on the child's path,
    /// and one of the candidates found is used. When neither parent offers
    /// one, the node becomes a leaf.
    #[must_use]
    pub fn breed<R>(first: &Self, second: &Self, branch_probability: f64, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let parents = [first, second];
        let test = if rng.random_bool(0.5) {
            first.root_test()
        } else {
            second.root_test()
        };

        let constraints = PathConstraints::new();
        let true_child = bred_node(
            parents,
            &constraints.follow(test, true),
            branch_probability,
            rng,
        );
        let false_child = bred_node(
            parents,
            &constraints.follow(test, false),
            branch_probability,
            rng,
        );
        Self::from_split(Split::new(test, true_child, false_child))
    }
}

fn bred_node<R>(
    parents: [&DecisionTree; 2],
    constraints: &PathConstraints,
    branch_probability: f64,
    rng: &mut R,
) -> DecisionNode
where
    R: Rng + ?Sized,
{
    let test = if rng.random::<f64>() > branch_probability {
        None
    } else {
        let found: ArrayVec<Test, 2> = parents
            .iter()
            .filter_map(|parent| suitable_test(parent.root(), constraints, rng))
            .collect();
        found.choose(rng).copied()
    };
    let Some(test) = test else {
        return DecisionNode::leaf(constraints.shuffled_preferences(rng));
    };

    let child_probability = branch_probability * branch_probability;
    let true_child = bred_node(
        parents,
        &constraints.follow(test, true),
        child_probability,
        rng,
    );
    let false_child = bred_node(
        parents,
        &constraints.follow(test, false),
        child_probability,
        rng,
    );
    DecisionNode::branch(test, true_child, false_child)
}

/// The test of `node` if `constraints` admit it, otherwise a random pick among
/// what each subtree yields.
fn suitable_test<R>(node: &DecisionNode, constraints: &PathConstraints, rng: &mut R) -> Option<Test>
where
    R: Rng + ?Sized,
{
    let split = node.split()?;
    if constraints.admits(split.test) {
        return Some(split.test);
    }
    let found: ArrayVec<Test, 2> = split
        .children()
        .into_iter()
        .filter_map(|(_, child)| suitable_test(child, constraints, rng))
        .collect();
    found.choose(rng).copied()
}
