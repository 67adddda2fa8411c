use serde::{Deserialize, Serialize};
use tictree_decider::{DecideError, DecisionTree};
use tictree_engine::{Board, BoardPosition, Player};

/// Identifier issued by a [`Pool`](crate::Pool), unique within it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("#{_0}")]
pub struct FighterId(u64);

impl FighterId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Win/loss/draw counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Record {
    /// Fitness used for ranking: `2 * wins - losses + draws`.
    #[must_use]
    pub fn score(self) -> i64 {
        2 * i64::from(self.wins) - i64::from(self.losses) + i64::from(self.draws)
    }

    #[must_use]
    pub fn games(self) -> u32 {
        self.wins + self.losses + self.draws
    }

    pub fn record_win(&mut self) {
        self.wins += 1;
    }

    pub fn record_loss(&mut self) {
        self.losses += 1;
    }

    pub fn record_draw(&mut self) {
        self.draws += 1;
    }
}

/// A decision tree with a name and a game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    id: FighterId,
    name: String,
    record: Record,
    tree: DecisionTree,
}

impl Fighter {
    #[must_use]
    pub fn new(id: FighterId, name: String, tree: DecisionTree) -> Self {
        Self {
            id,
            name,
            record: Record::default(),
            tree,
        }
    }

    #[must_use]
    pub fn id(&self) -> FighterId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn record(&self) -> Record {
        self.record
    }

    pub(crate) fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    #[must_use]
    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    /// The move this fighter makes when playing `player` on `board`.
    pub fn choose_move(&self, board: &Board, player: Player) -> Result<BoardPosition, DecideError> {
        self.tree.decide(board, player)
    }
}
