//! Text dump of a tree.
//!
//! ```text
//! (1N)-----
//! |        \
//! [4 6 8 0] [1 2 3 5 7]
//! ```
//!
//! An interior node is drawn as `(<position><value>)`, with `N` for an empty
//! cell, `F` for the acting player's mark and `S` for the opponent's. The
//! false subtree hangs below on the left, the true subtree on the right.

use std::fmt;

use tictree_engine::CellState;

use crate::{
    node::{Branch, DecisionNode},
    tree::DecisionTree,
};

impl DecisionTree {
    #[must_use]
    pub fn render(&self) -> String {
        render_node(self.root()).join("\n")
    }
}

impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn value_letter(value: CellState) -> char {
    match value {
        CellState::Empty => 'N',
        CellState::PlayerA => 'F',
        CellState::PlayerB => 'S',
    }
}

fn render_node(node: &DecisionNode) -> Vec<String> {
    let split = match node {
        DecisionNode::Root(split) | DecisionNode::Branch(Branch { split, .. }) => split,
        DecisionNode::Leaf(leaf) => {
            let positions: Vec<String> =
                leaf.preference_order.iter().map(|p| p.to_string()).collect();
            return vec![format!("[{}]", positions.join(" "))];
        }
    };

    let left = render_node(&split.false_child);
    let right = render_node(&split.true_child);
    let label = format!(
        "({}{})",
        split.test.position,
        value_letter(split.test.value)
    );
    let width = left
        .iter()
        .map(String::len)
        .chain([label.len()])
        .max()
        .unwrap_or_default();

    let mut lines = Vec::with_capacity(2 + left.len().max(right.len()));
    lines.push(format!("{label:-<width$}"));
    lines.push(format!("|{:width$}\\", "", width = width - 1));
    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).map_or("", String::as_str);
        let line = match right.get(i) {
            Some(r) => format!("{l:<width$} {r}"),
            None => l.to_owned(),
        };
        lines.push(line.trim_end().to_owned());
    }
    lines
}

#[cfg(test)]
mod tests {
    use tictree_engine::BoardPosition;

    use super::*;
    use crate::node::{PreferenceOrder, Test};

    fn leaf(indices: &[u8]) -> DecisionNode {
        DecisionNode::leaf(PreferenceOrder::from_indices(indices).unwrap())
    }

    fn test(index: u8, value: CellState) -> Test {
        Test::new(BoardPosition::new(index).unwrap(), value)
    }

    #[test]
    fn test_render_single_split() {
        let tree = DecisionTree::from_root(DecisionNode::root(
            test(1, CellState::Empty),
            leaf(&[1, 2, 3, 5, 7]),
            leaf(&[4, 6, 8, 0]),
        ))
        .unwrap();
        assert_eq!(
            tree.render(),
            "(1N)-----\n|        \\\n[4 6 8 0] [1 2 3 5 7]"
        );
        assert_eq!(tree.to_string(), tree.render());
    }

    #[test]
    fn test_render_nested_and_narrow() {
        let tree = DecisionTree::from_root(DecisionNode::root(
            test(0, CellState::PlayerA),
            DecisionNode::branch(test(8, CellState::PlayerB), leaf(&[2]), leaf(&[])),
            leaf(&[3]),
        ))
        .unwrap();
        let expected = [
            "(0F)",
            "|   \\",
            "[3]  (8S)",
            "     |   \\",
            "     []   [2]",
        ]
        .join("\n");
        assert_eq!(tree.render(), expected);
    }
}
