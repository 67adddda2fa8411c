use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tictree_decider::DecisionTree;
use tictree_training::{Fighter, Record};

use crate::util;

/// A trained fighter as saved by `tictree evolve`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FighterModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub generations: u32,
    pub record: Record,
    pub tree: DecisionTree,
}

impl FighterModel {
    pub fn from_fighter(fighter: &Fighter, generations: u32) -> Self {
        Self {
            name: fighter.name().to_owned(),
            trained_at: Utc::now(),
            generations,
            record: fighter.record(),
            tree: fighter.tree().duplicate(),
        }
    }

    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("fighter model", path)
    }
}
