use clap::{ArgAction, Parser, Subcommand};

use self::{duel::DuelArg, evolve::EvolveArg, random_tree::RandomTreeArg, show::ShowArg};

mod duel;
mod evolve;
mod random_tree;
mod show;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a population of fighters and save the best one
    Evolve(#[clap(flatten)] EvolveArg),
    /// Build a random decision tree and print it
    RandomTree(#[clap(flatten)] RandomTreeArg),
    /// Print a saved fighter
    Show(#[clap(flatten)] ShowArg),
    /// Play one game between two saved fighters
    Duel(#[clap(flatten)] DuelArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(args.verbose);
    match args.mode {
        Mode::Evolve(arg) => evolve::run(&arg)?,
        Mode::RandomTree(arg) => random_tree::run(&arg)?,
        Mode::Show(arg) => show::run(&arg)?,
        Mode::Duel(arg) => duel::run(&arg)?,
    }
    Ok(())
}

fn init_logger(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.init();
}
