//! Evolution of tic-tac-toe playing decision trees.
//!
//! A [`Pool`] holds an even number of [`Fighter`]s, each driven by a
//! [`DecisionTree`](tictree_decider::DecisionTree). Every generation the
//! fighters are paired up and play one game each; the results feed a
//! [`Record`] whose [`score`](Record::score) decides who survives into the
//! next generation.
//!
//! # Generation Cycle
//!
//! ```text
//! Pool::new ──► Playing ──tick──► ... ──► AllGamesComplete
//!                  ▲                              │
//!                  └──── advance_generation ◄─────┘
//! ```
//!
//! Half of the fighters are removed at random, weighted towards the bottom of
//! the ranking. The free slots are filled by offspring of the survivors, each
//! either a mutated copy of one parent or a crossover of two.
//!
//! # Names
//!
//! New fighters are named through the [`NameSupply`] capability.
//! [`NamePool`] draws from word lists, [`FixedNames`] hands out a fixed
//! sequence for reproducible runs.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64Mcg;
//! use tictree_training::{FixedNames, Pool, PoolConfig};
//!
//! let rng = Pcg64Mcg::seed_from_u64(0);
//! let mut pool = Pool::new(10, PoolConfig::default(), rng, FixedNames::default()).unwrap();
//! for _ in 0..3 {
//!     let summary = pool.run_generation().unwrap();
//!     assert_eq!(summary.wins, summary.losses);
//!     pool.advance_generation().unwrap();
//! }
//! assert_eq!(pool.generation(), 3);
//! ```

pub use self::{fighter::*, names::*, pool::*};

mod fighter;
mod names;
mod pool;
