use std::path::PathBuf;

use crate::model::fighter_model::FighterModel;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ShowArg {
    /// Fighter model JSON file
    model: PathBuf,
}

pub(crate) fn run(arg: &ShowArg) -> anyhow::Result<()> {
    let model = FighterModel::open(&arg.model)?;
    let FighterModel {
        name,
        trained_at,
        generations,
        record,
        tree,
    } = &model;

    println!("Name:        {name}");
    println!("Trained at:  {trained_at}");
    println!("Generations: {generations}");
    println!(
        "Record:      {} wins, {} losses, {} draws (score {})",
        record.wins,
        record.losses,
        record.draws,
        record.score()
    );
    println!(
        "Tree:        depth {}, {} nodes, {} leaves",
        tree.depth(),
        tree.node_count(),
        tree.leaf_count()
    );
    println!();
    println!("{tree}");
    Ok(())
}
