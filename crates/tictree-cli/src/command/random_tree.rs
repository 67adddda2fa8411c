use tictree_decider::DecisionTree;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RandomTreeArg {
    /// Probability that a child of the root is a branch
    #[arg(long, default_value_t = 0.98)]
    branch_probability: f64,
    /// Seed for a reproducible tree
    #[arg(long)]
    seed: Option<u64>,
    /// Print the tree as JSON instead of a drawing
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(arg: &RandomTreeArg) -> anyhow::Result<()> {
    let RandomTreeArg {
        branch_probability,
        seed,
        json,
    } = arg;
    util::check_branch_probability("branch probability", *branch_probability)?;

    let mut rng = util::make_rng(*seed);
    let tree = DecisionTree::random(*branch_probability, &mut rng);
    eprintln!(
        "depth {}, {} nodes, {} leaves",
        tree.depth(),
        tree.node_count(),
        tree.leaf_count()
    );
    if *json {
        util::Output::save_json(&tree, None)?;
    } else {
        println!("{tree}");
    }
    Ok(())
}
