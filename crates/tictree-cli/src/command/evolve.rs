use std::path::PathBuf;

use anyhow::{Context, ensure};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use tictree_training::{NamePool, Pool, PoolConfig, parse_name_list};

use crate::{model::fighter_model::FighterModel, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvolveArg {
    /// Number of fighters, must be even
    #[arg(long, default_value_t = 20)]
    population: usize,
    /// Number of generations to play
    #[arg(long, default_value_t = 50)]
    generations: u32,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Pool configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the mutation rate of the configuration
    #[arg(long)]
    mutation_rate: Option<f64>,
    /// Overrides the branch probability of the configuration
    #[arg(long)]
    branch_probability: Option<f64>,
    /// Newline separated first names
    #[arg(long, requires = "last_names")]
    first_names: Option<PathBuf>,
    /// Newline separated last names
    #[arg(long, requires = "first_names")]
    last_names: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &EvolveArg) -> anyhow::Result<()> {
    let EvolveArg {
        population,
        generations,
        seed,
        config,
        mutation_rate,
        branch_probability,
        first_names,
        last_names,
        output,
    } = arg;
    ensure!(*generations > 0, "at least one generation is required");

    let mut config = match config {
        Some(path) => util::read_json_file::<PoolConfig, _>("pool config", path)?,
        None => PoolConfig::default(),
    };
    if let Some(rate) = mutation_rate {
        config.mutation_rate = *rate;
    }
    if let Some(p) = branch_probability {
        config.branch_probability = *p;
    }
    util::check_rate("mutation rate", config.mutation_rate)?;
    util::check_branch_probability("branch probability", config.branch_probability)?;
    util::check_branch_probability(
        "breed branch probability",
        config.breed_branch_probability,
    )?;

    let mut rng = util::make_rng(*seed);
    let name_rng = Pcg64Mcg::from_rng(&mut rng);
    let names = match (first_names, last_names) {
        (Some(first), Some(last)) => NamePool::new(
            parse_name_list(&util::read_text_file("first names", first)?),
            parse_name_list(&util::read_text_file("last names", last)?),
            name_rng,
        )?,
        _ => NamePool::bundled(name_rng),
    };

    let mut pool = Pool::new(*population, config, rng, names)?;
    for generation in 0..*generations {
        if generation > 0 {
            pool.advance_generation()?;
        }
        let summary = pool.run_generation()?;
        eprintln!(
            "Generation #{}: best {:3} ({}), worst {:3}, mean {:6.2}, W/L/D {}/{}/{}",
            summary.generation,
            summary.best_score,
            summary.best_name,
            summary.worst_score,
            summary.mean_score,
            summary.wins,
            summary.losses,
            summary.draws,
        );
    }

    let best = pool.best_fighter().context("pool has no fighters")?;
    eprintln!("Best fighter: {} ({:?})", best.name(), best.record());
    eprintln!("{}", best.tree());

    let model = FighterModel::from_fighter(best, pool.generation() + 1);
    let path = util::Output::save_json(&model, output.clone())?;
    eprintln!("Saved fighter model to {path}");
    Ok(())
}
