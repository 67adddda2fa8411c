//! Per-path bookkeeping of which tests are still informative.

use arrayvec::ArrayVec;
use rand::{
    Rng,
    seq::{IndexedRandom as _, SliceRandom as _},
};
use tictree_engine::{BoardPosition, CellState};

use crate::node::{PreferenceOrder, Test};

/// Set of cell values still possible at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ValueSet(u8);

impl ValueSet {
    const FULL: Self = Self(0b111);

    const fn contains(self, value: CellState) -> bool {
        self.0 & (1 << value.index()) != 0
    }

    const fn without(self, value: CellState) -> Self {
        Self(self.0 & !(1 << value.index()))
    }

    const fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn iter(self) -> impl Iterator<Item = CellState> {
        CellState::ALL.into_iter().filter(move |v| self.contains(*v))
    }
}

/// A set of board positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PositionSet(u16);

impl PositionSet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self((1 << BoardPosition::LEN) - 1);

    #[must_use]
    pub const fn contains(self, position: BoardPosition) -> bool {
        self.0 & (1 << position.index()) != 0
    }

    pub const fn insert(&mut self, position: BoardPosition) {
        self.0 |= 1 << position.index();
    }

    pub const fn remove(&mut self, position: BoardPosition) {
        self.0 &= !(1 << position.index());
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = BoardPosition> {
        BoardPosition::ALL
            .into_iter()
            .filter(move |p| self.contains(*p))
    }
}

impl FromIterator<BoardPosition> for PositionSet {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = BoardPosition>,
    {
        let mut set = Self::EMPTY;
        for position in iter {
            set.insert(position);
        }
        set
    }
}

/// Constraints accumulated along a root-to-node path.
///
/// `values[p]` holds the cell values a test on `p` could still observe; an
/// empty set means the position is retired from testing. `positions` holds
/// the cells a leaf at the end of this path may still prefer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathConstraints {
    values: [ValueSet; BoardPosition::LEN],
    positions: PositionSet,
}

impl PathConstraints {
    pub(crate) const fn new() -> Self {
        Self {
            values: [ValueSet::FULL; BoardPosition::LEN],
            positions: PositionSet::ALL,
        }
    }

    /// Whether `test` may still appear at the end of this path.
    pub(crate) const fn admits(&self, test: Test) -> bool {
        self.values[test.position.index()].contains(test.value)
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.values.iter().all(|v| v.is_empty())
    }

    pub(crate) const fn eligible_positions(&self) -> PositionSet {
        self.positions
    }

    /// Constraints for the child reached when `test` evaluates to `outcome`.
    pub(crate) fn follow(&self, test: Test, outcome: bool) -> Self {
        let mut next = self.clone();
        let index = test.position.index();
        next.values[index] = if outcome {
            ValueSet(0)
        } else {
            next.values[index].without(test.value)
        };
        // The true branch of an "empty" test and the false branch of a
        // "marked" test leave the cell possibly empty.
        if outcome != test.value.is_empty() {
            next.positions.remove(test.position);
        }
        next
    }

    /// Picks a test uniformly by position, then uniformly by value.
    pub(crate) fn choose_test<R>(&self, rng: &mut R) -> Option<Test>
    where
        R: Rng + ?Sized,
    {
        self.choose_test_excluding(None, rng)
    }

    /// Like [`Self::choose_test`], but never returns `excluded`.
    pub(crate) fn choose_test_excluding<R>(
        &self,
        excluded: Option<Test>,
        rng: &mut R,
    ) -> Option<Test>
    where
        R: Rng + ?Sized,
    {
        let candidates = |position: BoardPosition| {
            let values = self.values[position.index()];
            match excluded {
                Some(test) if test.position == position => values.without(test.value),
                _ => values,
            }
        };

        let positions: ArrayVec<BoardPosition, { BoardPosition::LEN }> = BoardPosition::ALL
            .into_iter()
            .filter(|p| !candidates(*p).is_empty())
            .collect();
        let position = *positions.choose(rng)?;
        let values: ArrayVec<CellState, { CellState::LEN }> = candidates(position).iter().collect();
        let value = *values.choose(rng)?;
        Some(Test { position, value })
    }

    /// A uniformly random ordering of the eligible positions.
    pub(crate) fn shuffled_preferences<R>(&self, rng: &mut R) -> PreferenceOrder
    where
        R: Rng + ?Sized,
    {
        let mut order: ArrayVec<BoardPosition, { BoardPosition::LEN }> =
            self.positions.iter().collect();
        order.shuffle(rng);
        PreferenceOrder::from_unique(order)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn test(index: u8, value: CellState) -> Test {
        Test {
            position: BoardPosition::new(index).unwrap(),
            value,
        }
    }

    #[test]
    fn test_true_branch_retires_position() {
        let c = PathConstraints::new().follow(test(4, CellState::PlayerA), true);
        for value in CellState::ALL {
            assert!(!c.admits(test(4, value)));
        }
        assert!(c.admits(test(3, CellState::PlayerA)));
    }

    #[test]
    fn test_false_branch_removes_single_value() {
        let c = PathConstraints::new().follow(test(4, CellState::PlayerA), false);
        assert!(!c.admits(test(4, CellState::PlayerA)));
        assert!(c.admits(test(4, CellState::Empty)));
        assert!(c.admits(test(4, CellState::PlayerB)));

        let c = c
            .follow(test(4, CellState::Empty), false)
            .follow(test(4, CellState::PlayerB), false);
        assert!(CellState::ALL.iter().all(|v| !c.admits(test(4, *v))));
    }

    #[test]
    fn test_eligible_positions_follow_emptiness() {
        let p = BoardPosition::new(1).unwrap();
        let root = PathConstraints::new();

        // cell known empty: still playable
        let c = root.follow(test(1, CellState::Empty), true);
        assert!(c.eligible_positions().contains(p));
        // cell known non-empty: not playable
        let c = root.follow(test(1, CellState::Empty), false);
        assert!(!c.eligible_positions().contains(p));
        // cell holds a mark
        let c = root.follow(test(1, CellState::PlayerB), true);
        assert!(!c.eligible_positions().contains(p));
        // cell does not hold this mark: may still be empty
        let c = root.follow(test(1, CellState::PlayerB), false);
        assert!(c.eligible_positions().contains(p));
    }

    #[test]
    fn test_exhausted_after_pinning_every_position() {
        let mut c = PathConstraints::new();
        for index in 0..9 {
            assert!(!c.is_exhausted());
            c = c.follow(test(index, CellState::PlayerA), true);
        }
        assert!(c.is_exhausted());
        assert_eq!(c.choose_test(&mut Pcg64Mcg::seed_from_u64(0)), None);
        assert!(c.eligible_positions().is_empty());
    }

    #[test]
    fn test_choose_test_respects_constraints() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        let c = PathConstraints::new()
            .follow(test(0, CellState::Empty), true)
            .follow(test(1, CellState::PlayerA), false);
        for _ in 0..200 {
            let t = c.choose_test(&mut rng).unwrap();
            assert!(c.admits(t));
        }
    }

    #[test]
    fn test_choose_test_excluding_skips_only_choice() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let mut c = PathConstraints::new();
        for index in 1..9 {
            c = c.follow(test(index, CellState::Empty), true);
        }
        let c = c.follow(test(0, CellState::PlayerA), false);
        // only (0, Empty) and (0, PlayerB) remain
        let only = test(0, CellState::Empty);
        for _ in 0..50 {
            assert_eq!(
                c.choose_test_excluding(Some(only), &mut rng),
                Some(test(0, CellState::PlayerB))
            );
        }
        let c = c.follow(test(0, CellState::PlayerB), false);
        assert_eq!(c.choose_test_excluding(Some(only), &mut rng), None);
        assert_eq!(c.choose_test(&mut rng), Some(only));
    }

    #[test]
    fn test_shuffled_preferences_is_permutation_of_eligible() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let c = PathConstraints::new().follow(test(4, CellState::PlayerA), true);
        let order = c.shuffled_preferences(&mut rng);
        assert_eq!(order.len(), 8);
        assert_eq!(order.position_set(), c.eligible_positions());
    }
}
