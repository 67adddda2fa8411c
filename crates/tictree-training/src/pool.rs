//! Population of fighters and the generation cycle.
//!
//! A [`Pool`] moves through two phases per generation:
//!
//! 1. [`PoolPhase::Playing`] - every fighter is in exactly one [`Game`];
//!    [`Pool::tick`] advances all unfinished games by one ply.
//! 2. [`PoolPhase::AllGamesComplete`] - [`Pool::advance_generation`] ranks the
//!    fighters, removes half of them, refills the pool with mutated and bred
//!    offspring and pairs everyone up for the next round.
//!
//! # Selection
//!
//! Fighters are ranked by [`Record::score`], best first. Removal is random
//! but weighted by rank: the fighter at rank `i` is removed with weight `i`,
//! recomputed after every removal, so the current best is never removed.
//! Parents are drawn from the survivors with the same rule, weight `i` for
//! the survivor at rank `i`, so the best survivor only becomes a parent when
//! it is the sole survivor.
//!
//! # Parallelism
//!
//! A tick splits the unfinished games across scoped threads. Games only read
//! fighters; records are updated on the calling thread once all threads have
//! joined.

use std::{cmp::Reverse, collections::HashMap, num::NonZeroUsize, thread};

use rand::{
    Rng,
    distr::{Distribution as _, weighted::WeightedIndex},
    seq::SliceRandom as _,
};
use serde::{Deserialize, Serialize};
use tictree_decider::{DecideError, DecisionTree};
use tictree_engine::{Board, IllegalMoveError, Outcome, Player};

use crate::{
    fighter::{Fighter, FighterId, Record},
    names::{NameSupply, merge_names},
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum PoolError {
    #[display("pool has no fighters")]
    EmptyPopulation,
    #[display("pool size must be even, got {size}")]
    OddPopulation { size: usize },
    #[display("games of the current generation are still in progress")]
    GamesInProgress,
    #[display("fighter could not move: {_0}")]
    #[from]
    Decide(DecideError),
    #[display("fighter made an illegal move: {_0}")]
    #[from]
    IllegalMove(IllegalMoveError),
}

/// Evolution parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Branch probability for trees of the initial population.
    pub branch_probability: f64,
    /// Branch probability used when breeding two trees.
    pub breed_branch_probability: f64,
    /// Per-node mutation probability for mutated offspring.
    pub mutation_rate: f64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            branch_probability: 0.98,
            breed_branch_probability: 0.98,
            mutation_rate: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PoolPhase {
    Playing,
    AllGamesComplete,
}

/// One game between two fighters of the same generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    player_a: FighterId,
    player_b: FighterId,
    board: Board,
}

impl Game {
    /// Seats `player_a` as A, moving first, and `player_b` as B on an empty
    /// board.
    #[must_use]
    pub fn new(player_a: FighterId, player_b: FighterId) -> Self {
        Self {
            player_a,
            player_b,
            board: Board::new(),
        }
    }

    /// The fighter playing as `player`.
    #[must_use]
    pub fn fighter(&self, player: Player) -> FighterId {
        match player {
            Player::A => self.player_a,
            Player::B => self.player_b,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.board.is_done()
    }

    /// Lets the fighter whose turn it is make one move. Does nothing on a
    /// finished game.
    fn play_ply(&mut self, fighters: &HashMap<FighterId, &Fighter>) -> Result<(), PoolError> {
        let Some(player) = self.board.to_move() else {
            return Ok(());
        };
        let fighter = fighters[&self.fighter(player)];
        let position = fighter.choose_move(&self.board, player)?;
        self.board.apply(position, player)?;
        log::trace!("{} played {position} as {player}", fighter.name());
        Ok(())
    }
}

/// Score statistics of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: u32,
    pub best_score: i64,
    pub worst_score: i64,
    pub mean_score: f64,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub best_name: String,
}

/// A population of fighters evolving generation by generation.
#[derive(Debug)]
pub struct Pool<R, N> {
    config: PoolConfig,
    rng: R,
    names: N,
    generation: u32,
    next_id: u64,
    fighters: Vec<Fighter>,
    games: Vec<Game>,
}

impl<R, N> Pool<R, N>
where
    R: Rng,
    N: NameSupply,
{
    /// Creates `size` random fighters and pairs them up for generation 0.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::EmptyPopulation`] for a size of 0 and
    /// [`PoolError::OddPopulation`] for an odd size.
    pub fn new(size: usize, config: PoolConfig, rng: R, names: N) -> Result<Self, PoolError> {
        if size == 0 {
            return Err(PoolError::EmptyPopulation);
        }
        if size % 2 != 0 {
            return Err(PoolError::OddPopulation { size });
        }

        let mut pool = Self {
            config,
            rng,
            names,
            generation: 0,
            next_id: 0,
            fighters: Vec::with_capacity(size),
            games: vec![],
        };
        for _ in 0..size {
            let tree = DecisionTree::random(config.branch_probability, &mut pool.rng);
            let name = pool.names.next_full_name();
            let fighter = pool.spawn_fighter(name, tree);
            pool.fighters.push(fighter);
        }
        pool.pair_fighters();
        log::info!("created pool of {size} fighters");
        Ok(pool)
    }

    /// Evolution parameters the pool was created with.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of completed generation changes; 0 for the initial population.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Current fighters. After a generation change the survivors come first,
    /// best first, followed by the offspring.
    #[must_use]
    pub fn fighters(&self) -> &[Fighter] {
        &self.fighters
    }

    /// Games of the current generation, one per pair of fighters.
    #[must_use]
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    #[must_use]
    pub fn phase(&self) -> PoolPhase {
        if self.games.iter().all(Game::is_done) {
            PoolPhase::AllGamesComplete
        } else {
            PoolPhase::Playing
        }
    }

    /// Highest scoring fighter; the earliest one on ties.
    #[must_use]
    pub fn best_fighter(&self) -> Option<&Fighter> {
        self.fighters
            .iter()
            .min_by_key(|fighter| Reverse(fighter.record().score()))
    }

    /// Advances every unfinished game by one ply and records the results of
    /// games that finish.
    ///
    /// Every unfinished game gets its ply even when another game fails, and
    /// the games that finished are recorded before the first error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Decide`] if a fighter finds no move and
    /// [`PoolError::IllegalMove`] if its move is rejected by the board.
    pub fn tick(&mut self) -> Result<(), PoolError> {
        let pending: Vec<usize> = (0..self.games.len())
            .filter(|&i| !self.games[i].is_done())
            .collect();
        if pending.is_empty() {
            return Ok(());
        }

        let played = {
            let fighters: HashMap<FighterId, &Fighter> =
                self.fighters.iter().map(|f| (f.id(), f)).collect();
            let mut unfinished: Vec<&mut Game> =
                self.games.iter_mut().filter(|g| !g.is_done()).collect();
            let threads = thread::available_parallelism().map_or(1, NonZeroUsize::get);
            let chunk_len = unfinished.len().div_ceil(threads);

            thread::scope(|s| {
                let handles: Vec<_> = unfinished
                    .chunks_mut(chunk_len)
                    .map(|chunk| {
                        let fighters = &fighters;
                        s.spawn(move || {
                            chunk.iter_mut().fold(Ok(()), |result, game| {
                                let ply = game.play_ply(fighters);
                                result.and(ply)
                            })
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| handle.join().expect("game thread panicked"))
                    .fold(Ok(()), |result, joined| result.and(joined))
            })
        };

        for i in pending {
            if let Some(outcome) = self.games[i].board.outcome() {
                let (a, b) = (self.games[i].player_a, self.games[i].player_b);
                self.record_result(a, b, outcome);
            }
        }
        played
    }

    /// Ticks if games are still running, otherwise moves on to the next
    /// generation. Returns the phase reached.
    pub fn cycle(&mut self) -> Result<PoolPhase, PoolError> {
        match self.phase() {
            PoolPhase::Playing => self.tick()?,
            PoolPhase::AllGamesComplete => self.advance_generation()?,
        }
        Ok(self.phase())
    }

    /// Plays the current generation's games to the end.
    pub fn run_generation(&mut self) -> Result<GenerationSummary, PoolError> {
        while self.phase().is_playing() {
            self.tick()?;
        }
        let summary = self.summary()?;
        log::info!(
            "generation {}: best {} ({}), mean {:.2}",
            summary.generation,
            summary.best_score,
            summary.best_name,
            summary.mean_score
        );
        Ok(summary)
    }

    /// Aggregates the fighters' records for the current generation.
    ///
    /// Records are cumulative for survivors, so the totals cover every game a
    /// current fighter has played.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::EmptyPopulation`] if the pool has no fighters.
    pub fn summary(&self) -> Result<GenerationSummary, PoolError> {
        let best = self.best_fighter().ok_or(PoolError::EmptyPopulation)?;
        let scores = self.fighters.iter().map(|f| f.record().score());
        let total = self.fighters.iter().fold(Record::default(), |acc, f| {
            let r = f.record();
            Record {
                wins: acc.wins + r.wins,
                losses: acc.losses + r.losses,
                draws: acc.draws + r.draws,
            }
        });
        #[expect(clippy::cast_precision_loss)]
        let mean_score = scores.clone().sum::<i64>() as f64 / self.fighters.len() as f64;
        Ok(GenerationSummary {
            generation: self.generation,
            best_score: best.record().score(),
            worst_score: scores.min().unwrap_or_default(),
            mean_score,
            wins: total.wins,
            losses: total.losses,
            draws: total.draws,
            best_name: best.name().to_owned(),
        })
    }

    /// Replaces the weaker half of the pool with offspring of the survivors
    /// and starts a new round of games.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::GamesInProgress`] if a game of the current
    /// generation is unfinished.
    pub fn advance_generation(&mut self) -> Result<(), PoolError> {
        if self.phase().is_playing() {
            return Err(PoolError::GamesInProgress);
        }
        if self.fighters.is_empty() {
            return Err(PoolError::EmptyPopulation);
        }

        let size = self.fighters.len();
        self.generation += 1;
        self.fighters
            .sort_by_key(|fighter| Reverse(fighter.record().score()));

        let survivors = size / 2;
        while self.fighters.len() > survivors {
            let rank = WeightedIndex::new(0..self.fighters.len())
                .expect("more than one fighter gives a positive weight")
                .sample(&mut self.rng);
            let removed = self.fighters.remove(rank);
            log::debug!(
                "removed {} (rank {rank}, score {})",
                removed.name(),
                removed.record().score()
            );
        }

        let parent_weights = WeightedIndex::new(0..survivors).ok();
        let pick_parent = |rng: &mut R| {
            parent_weights
                .as_ref()
                .map_or(0, |weights| weights.sample(rng))
        };
        let mut offspring = Vec::with_capacity(size - survivors);
        for _ in survivors..size {
            let fighter = if self.rng.random_bool(0.5) {
                let parent = &self.fighters[pick_parent(&mut self.rng)];
                let mut tree = parent.tree().duplicate();
                tree.mutate(self.config.mutation_rate, &mut self.rng);
                log::debug!("mutating {}", parent.name());
                let name = self.names.next_full_name();
                self.spawn_fighter(name, tree)
            } else {
                let first = &self.fighters[pick_parent(&mut self.rng)];
                let second = &self.fighters[pick_parent(&mut self.rng)];
                let tree = DecisionTree::breed(
                    first.tree(),
                    second.tree(),
                    self.config.breed_branch_probability,
                    &mut self.rng,
                );
                log::debug!("breeding {} with {}", first.name(), second.name());
                let name = merge_names(first.name(), second.name(), &mut self.rng);
                self.spawn_fighter(name, tree)
            };
            offspring.push(fighter);
        }
        self.fighters.extend(offspring);
        self.pair_fighters();

        log::info!("started generation {}", self.generation);
        Ok(())
    }

    fn spawn_fighter(&mut self, name: String, tree: DecisionTree) -> Fighter {
        let id = FighterId::new(self.next_id);
        self.next_id += 1;
        Fighter::new(id, name, tree)
    }

    /// Replaces the games with a fresh random pairing of all fighters. The
    /// first fighter of each pair plays A and moves first.
    fn pair_fighters(&mut self) {
        let mut ids: Vec<FighterId> = self.fighters.iter().map(Fighter::id).collect();
        ids.shuffle(&mut self.rng);
        self.games = ids
            .chunks_exact(2)
            .map(|pair| Game::new(pair[0], pair[1]))
            .collect();
    }

    fn record_result(&mut self, player_a: FighterId, player_b: FighterId, outcome: Outcome) {
        let mut update = |id: FighterId, apply: fn(&mut Record)| {
            if let Some(fighter) = self.fighters.iter_mut().find(|f| f.id() == id) {
                apply(fighter.record_mut());
            }
        };
        match outcome.winner() {
            Some(Player::A) => {
                update(player_a, Record::record_win);
                update(player_b, Record::record_loss);
            }
            Some(Player::B) => {
                update(player_b, Record::record_win);
                update(player_a, Record::record_loss);
            }
            None => {
                update(player_a, Record::record_draw);
                update(player_b, Record::record_draw);
            }
        }
        log::debug!("game {player_a} vs {player_b} ended: {outcome:?}");
    }
}
