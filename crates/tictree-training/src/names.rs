//! Fighter names.

use rand::{Rng, seq::SliceRandom as _};

const BUNDLED_FIRST_NAMES: &str = include_str!("../data/first_names.txt");
const BUNDLED_LAST_NAMES: &str = include_str!("../data/last_names.txt");

/// Most names drawn from one shuffle of a list before it is reshuffled.
const CACHE_LEN: usize = 100;

/// Source of display names for newly created fighters.
pub trait NameSupply {
    /// A `"First Last"` name.
    fn next_full_name(&mut self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NameListError {
    #[display("first name list is empty")]
    NoFirstNames,
    #[display("last name list is empty")]
    NoLastNames,
}

/// Draws random first and last names from two word lists.
///
/// Each list is shuffled and its first [`CACHE_LEN`] entries are handed out
/// one by one; once they are used up, the full list is shuffled again.
#[derive(Debug, Clone)]
pub struct NamePool<R> {
    first_names: Vec<String>,
    last_names: Vec<String>,
    first_cache: Vec<String>,
    last_cache: Vec<String>,
    rng: R,
}

impl<R> NamePool<R>
where
    R: Rng,
{
    pub fn new(
        first_names: Vec<String>,
        last_names: Vec<String>,
        rng: R,
    ) -> Result<Self, NameListError> {
        if first_names.is_empty() {
            return Err(NameListError::NoFirstNames);
        }
        if last_names.is_empty() {
            return Err(NameListError::NoLastNames);
        }
        Ok(Self {
            first_names,
            last_names,
            first_cache: vec![],
            last_cache: vec![],
            rng,
        })
    }

    /// A pool over the lists shipped with this crate.
    #[must_use]
    pub fn bundled(rng: R) -> Self {
        Self {
            first_names: parse_name_list(BUNDLED_FIRST_NAMES),
            last_names: parse_name_list(BUNDLED_LAST_NAMES),
            first_cache: vec![],
            last_cache: vec![],
            rng,
        }
    }
}

impl<R> NameSupply for NamePool<R>
where
    R: Rng,
{
    fn next_full_name(&mut self) -> String {
        let first = draw(&self.first_names, &mut self.first_cache, &mut self.rng);
        let last = draw(&self.last_names, &mut self.last_cache, &mut self.rng);
        format!("{first} {last}")
    }
}

fn draw<R>(list: &[String], cache: &mut Vec<String>, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    if cache.is_empty() {
        let mut shuffled = list.to_vec();
        shuffled.shuffle(rng);
        shuffled.truncate(CACHE_LEN);
        *cache = shuffled;
        log::debug!("refilled name cache with {} names", cache.len());
    }
    cache.pop().unwrap_or_default()
}

/// Splits a newline separated word list, skipping blank lines.
#[must_use]
pub fn parse_name_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Hands out a fixed list of names in order, starting over at the end.
///
/// An empty list yields `"Fighter <n>"`.
#[derive(Debug, Clone, Default)]
pub struct FixedNames {
    names: Vec<String>,
    next: usize,
}

impl FixedNames {
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self { names, next: 0 }
    }
}

impl NameSupply for FixedNames {
    fn next_full_name(&mut self) -> String {
        let n = self.next;
        self.next += 1;
        if self.names.is_empty() {
            format!("Fighter {n}")
        } else {
            self.names[n % self.names.len()].clone()
        }
    }
}

/// Name for the child of two fighters: one parent's first name with the
/// other parent's last name, picked by a coin flip.
pub fn merge_names<R>(first_parent: &str, second_parent: &str, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let (a_first, a_last) = split_name(first_parent);
    let (b_first, b_last) = split_name(second_parent);
    let (first, last) = if rng.random_bool(0.5) {
        (a_first, b_last)
    } else {
        (b_first, a_last)
    };
    if last.is_empty() {
        first.to_owned()
    } else {
        format!("{first} {last}")
    }
}

fn split_name(name: &str) -> (&str, &str) {
    name.trim().split_once(' ').unwrap_or((name.trim(), ""))
}
