use std::path::PathBuf;

use anyhow::Context;
use tictree_engine::{Board, Outcome, Player};

use crate::model::fighter_model::FighterModel;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DuelArg {
    /// Fighter playing X, moves first
    first: PathBuf,
    /// Fighter playing O
    second: PathBuf,
}

pub(crate) fn run(arg: &DuelArg) -> anyhow::Result<()> {
    let first = FighterModel::open(&arg.first)?;
    let second = FighterModel::open(&arg.second)?;
    let fighter = |player: Player| match player {
        Player::A => &first,
        Player::B => &second,
    };
    println!("{} (X) vs {} (O)", first.name, second.name);

    let mut board = Board::new();
    while let Some(player) = board.to_move() {
        let model = fighter(player);
        let position = model
            .tree
            .decide(&board, player)
            .with_context(|| format!("{} could not move", model.name))?;
        board.apply(position, player)?;
        println!();
        println!("{} plays {position}", model.name);
        print!("{board}");
    }

    println!();
    match board.outcome() {
        Some(Outcome::Win { winner, line }) => {
            let line = line.map(|p| p.to_string()).join(" ");
            println!("{} wins on {line}", fighter(winner).name);
        }
        Some(Outcome::Draw) | None => println!("Draw"),
    }
    Ok(())
}
