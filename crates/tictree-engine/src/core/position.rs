use serde::{Deserialize, Serialize};

use crate::InvalidPositionError;

/// A cell index on the 3×3 board, numbered row-major from the top left.
///
/// ```text
/// 0 | 1 | 2
/// 3 | 4 | 5
/// 6 | 7 | 8
/// ```
///
/// The index is validated on construction, so any `BoardPosition` can be used
/// to index a `[T; 9]` without bounds failures.
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
#[serde(try_from = "u8", into = "u8")]
#[display("{_0}")]
pub struct BoardPosition(u8);

impl BoardPosition {
    pub const LEN: usize = 9;
    pub const ALL: [Self; Self::LEN] = [
        Self(0),
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
        Self(8),
    ];

    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < Self::LEN {
            Some(Self(index))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn row(self) -> usize {
        self.index() / 3
    }

    #[must_use]
    pub const fn col(self) -> usize {
        self.index() % 3
    }
}

impl TryFrom<u8> for BoardPosition {
    type Error = InvalidPositionError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or(InvalidPositionError { index })
    }
}

impl From<BoardPosition> for u8 {
    fn from(position: BoardPosition) -> Self {
        position.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(BoardPosition::new(8).is_some());
        assert!(BoardPosition::new(9).is_none());
        assert_eq!(
            BoardPosition::try_from(12),
            Err(InvalidPositionError { index: 12 })
        );
    }

    #[test]
    fn test_row_and_col() {
        let p = BoardPosition::new(5).unwrap();
        assert_eq!((p.row(), p.col()), (1, 2));
    }

    #[test]
    fn test_deserialize_validates_index() {
        let p: BoardPosition = serde_json::from_str("7").unwrap();
        assert_eq!(p.index(), 7);
        assert!(serde_json::from_str::<BoardPosition>("9").is_err());
    }
}
