use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    IllegalMoveError, InconsistentBoardError,
    core::{cell::CellState, cell::Player, position::BoardPosition},
};

const fn pos(index: u8) -> BoardPosition {
    BoardPosition::ALL[index as usize]
}

/// The 8 winning triples: rows, columns, main diagonal, anti-diagonal.
pub const WIN_LINES: [[BoardPosition; 3]; 8] = [
    [pos(0), pos(1), pos(2)],
    [pos(3), pos(4), pos(5)],
    [pos(6), pos(7), pos(8)],
    [pos(0), pos(3), pos(6)],
    [pos(1), pos(4), pos(7)],
    [pos(2), pos(5), pos(8)],
    [pos(0), pos(4), pos(8)],
    [pos(6), pos(4), pos(2)],
];

/// Resolved result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum Outcome {
    Win {
        winner: Player,
        line: [BoardPosition; 3],
    },
    Draw,
}

impl Outcome {
    #[must_use]
    pub const fn winner(self) -> Option<Player> {
        match self {
            Self::Win { winner, .. } => Some(winner),
            Self::Draw => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum BoardStatus {
    InProgress { to_move: Player },
    Done(Outcome),
}

/// A tic-tac-toe board with turn and outcome tracking.
///
/// Player A always moves first on a new board. After every move the board
/// checks the 8 [`WIN_LINES`] for the mover, then for a full board, and
/// otherwise passes the turn.
///
/// Deserialization re-evaluates the cells and rejects a recorded status that
/// disagrees with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardData", into = "BoardData")]
pub struct Board {
    cells: [CellState; BoardPosition::LEN],
    status: BoardStatus,
}

#[derive(Serialize, Deserialize)]
struct BoardData {
    cells: [CellState; BoardPosition::LEN],
    status: BoardStatus,
}

impl TryFrom<BoardData> for Board {
    type Error = InconsistentBoardError;

    fn try_from(data: BoardData) -> Result<Self, Self::Error> {
        // the side to move after a win is the loser
        let to_move = match data.status {
            BoardStatus::InProgress { to_move } => to_move,
            BoardStatus::Done(Outcome::Win { winner, .. }) => winner.opponent(),
            BoardStatus::Done(Outcome::Draw) => Player::A,
        };
        let board = Self::from_cells(data.cells, to_move);
        if board.status != data.status {
            return Err(InconsistentBoardError {
                recorded: data.status,
                actual: board.status,
            });
        }
        Ok(board)
    }
}

impl From<Board> for BoardData {
    fn from(board: Board) -> Self {
        let Board { cells, status } = board;
        Self { cells, status }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [CellState::Empty; BoardPosition::LEN],
            status: BoardStatus::InProgress { to_move: Player::A },
        }
    }

    /// Builds a board from raw cells, evaluating whether the position is
    /// already finished.
    ///
    /// No check is made that the mark counts are reachable in a real game.
    #[must_use]
    pub fn from_cells(cells: [CellState; BoardPosition::LEN], to_move: Player) -> Self {
        let mut board = Self {
            cells,
            status: BoardStatus::InProgress { to_move },
        };
        for player in [to_move.opponent(), to_move] {
            if let Some(outcome) = board.winning_outcome(player) {
                board.status = BoardStatus::Done(outcome);
                return board;
            }
        }
        if board.is_full() {
            board.status = BoardStatus::Done(Outcome::Draw);
        }
        board
    }

    #[must_use]
    pub const fn cell(&self, position: BoardPosition) -> CellState {
        self.cells[position.index()]
    }

    #[must_use]
    pub const fn cells(&self) -> &[CellState; BoardPosition::LEN] {
        &self.cells
    }

    #[must_use]
    pub const fn status(&self) -> BoardStatus {
        self.status
    }

    #[must_use]
    pub const fn to_move(&self) -> Option<Player> {
        match self.status {
            BoardStatus::InProgress { to_move } => Some(to_move),
            BoardStatus::Done(_) => None,
        }
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        match self.status {
            BoardStatus::InProgress { .. } => None,
            BoardStatus::Done(outcome) => Some(outcome),
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    pub fn empty_positions(&self) -> impl Iterator<Item = BoardPosition> + '_ {
        BoardPosition::ALL
            .into_iter()
            .filter(|p| self.cell(*p).is_empty())
    }

    /// Places `player`'s mark at `position` and re-evaluates the game state.
    ///
    /// Fails without touching the board if the game is over, it is not
    /// `player`'s turn, or the cell is taken.
    pub fn apply(
        &mut self,
        position: BoardPosition,
        player: Player,
    ) -> Result<BoardStatus, IllegalMoveError> {
        let to_move = match self.status {
            BoardStatus::Done(_) => return Err(IllegalMoveError::GameOver),
            BoardStatus::InProgress { to_move } => to_move,
        };
        if to_move != player {
            return Err(IllegalMoveError::OutOfTurn { expected: to_move });
        }
        if !self.cell(position).is_empty() {
            return Err(IllegalMoveError::Occupied { position });
        }

        self.cells[position.index()] = player.mark();

        self.status = if let Some(outcome) = self.winning_outcome(player) {
            BoardStatus::Done(outcome)
        } else if self.is_full() {
            BoardStatus::Done(Outcome::Draw)
        } else {
            BoardStatus::InProgress {
                to_move: player.opponent(),
            }
        };
        Ok(self.status)
    }

    fn winning_outcome(&self, player: Player) -> Option<Outcome> {
        let mark = player.mark();
        WIN_LINES
            .into_iter()
            .find(|line| line.iter().all(|p| self.cell(*p) == mark))
            .map(|line| Outcome::Win {
                winner: player,
                line,
            })
    }

    fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(3) {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(index: u8) -> BoardPosition {
        BoardPosition::new(index).unwrap()
    }

    fn play(moves: &[u8]) -> Board {
        let mut board = Board::new();
        for &m in moves {
            let player = board.to_move().unwrap();
            board.apply(p(m), player).unwrap();
        }
        board
    }

    #[test]
    fn test_new_board_is_empty_with_a_to_move() {
        let board = Board::new();
        assert_eq!(board.empty_positions().count(), 9);
        assert_eq!(board.to_move(), Some(Player::A));
        assert_eq!(board.outcome(), None);
    }

    #[test]
    fn test_turn_alternates() {
        let mut board = Board::new();
        assert_eq!(
            board.apply(p(0), Player::A),
            Ok(BoardStatus::InProgress { to_move: Player::B })
        );
        assert_eq!(
            board.apply(p(1), Player::B),
            Ok(BoardStatus::InProgress { to_move: Player::A })
        );
        assert_eq!(board.cell(p(0)), CellState::PlayerA);
        assert_eq!(board.cell(p(1)), CellState::PlayerB);
    }

    #[test]
    fn test_occupied_cell_is_rejected() {
        let mut board = play(&[4]);
        let before = board.clone();
        assert_eq!(
            board.apply(p(4), Player::B),
            Err(IllegalMoveError::Occupied { position: p(4) })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_out_of_turn_is_rejected() {
        let mut board = Board::new();
        assert_eq!(
            board.apply(p(0), Player::B),
            Err(IllegalMoveError::OutOfTurn {
                expected: Player::A
            })
        );
    }

    #[test]
    fn test_row_win() {
        // A: 0 1 2, B: 3 4
        let board = play(&[0, 3, 1, 4, 2]);
        assert_eq!(
            board.outcome(),
            Some(Outcome::Win {
                winner: Player::A,
                line: [p(0), p(1), p(2)],
            })
        );
        assert_eq!(board.to_move(), None);
    }

    #[test]
    fn test_anti_diagonal_win_for_b() {
        // A: 0 1 8, B: 6 4 2
        let board = play(&[0, 6, 1, 4, 8, 2]);
        assert_eq!(
            board.outcome(),
            Some(Outcome::Win {
                winner: Player::B,
                line: [p(6), p(4), p(2)],
            })
        );
    }

    #[test]
    fn test_draw_when_full_without_line() {
        // X O X
        // X O O
        // O X X
        let board = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(board.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_win_on_last_cell_is_not_a_draw() {
        // X O X
        // O X O
        // O X X  <- A completes the main diagonal with the ninth mark
        let board = play(&[0, 1, 2, 3, 4, 5, 7, 6, 8]);
        assert_eq!(board.outcome().and_then(Outcome::winner), Some(Player::A));
    }

    #[test]
    fn test_move_after_game_over_is_rejected() {
        let mut board = play(&[0, 3, 1, 4, 2]);
        assert_eq!(
            board.apply(p(8), Player::B),
            Err(IllegalMoveError::GameOver)
        );
    }

    #[test]
    fn test_every_alternating_game_terminates_consistently() {
        // Exhaustively play every move order; each terminal board must agree
        // with the win-line rule.
        fn explore(board: &Board, count: &mut usize) {
            let Some(player) = board.to_move() else {
                *count += 1;
                match board.outcome().unwrap() {
                    Outcome::Win { winner, line } => {
                        assert!(line.iter().all(|q| board.cell(*q) == winner.mark()));
                    }
                    Outcome::Draw => {
                        assert_eq!(board.empty_positions().count(), 0);
                        for line in WIN_LINES {
                            let first = board.cell(line[0]);
                            assert!(line.iter().any(|q| board.cell(*q) != first));
                        }
                    }
                }
                return;
            };
            for position in board.empty_positions() {
                let mut next = board.clone();
                next.apply(position, player).unwrap();
                explore(&next, count);
            }
        }

        let mut count = 0;
        explore(&Board::new(), &mut count);
        assert_eq!(count, 255_168);
    }

    #[test]
    fn test_from_cells_detects_finished_positions() {
        use CellState::{Empty as E, PlayerA as A, PlayerB as B};
        let board = Board::from_cells([A, A, A, B, B, E, E, E, E], Player::B);
        assert_eq!(board.outcome().and_then(Outcome::winner), Some(Player::A));

        let board = Board::from_cells([A, B, E, E, E, E, E, E, E], Player::A);
        assert_eq!(board.to_move(), Some(Player::A));
    }

    #[test]
    fn test_serde_keeps_consistent_boards() {
        let games: [&[u8]; 4] = [&[], &[4, 0, 8], &[0, 3, 1, 4, 2], &[0, 1, 2, 4, 3, 5, 7, 6, 8]];
        for moves in games {
            let board = play(moves);
            let json = serde_json::to_string(&board).unwrap();
            assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);
        }
    }

    #[test]
    fn test_serde_rejects_status_that_contradicts_cells() {
        let won = play(&[0, 3, 1, 4, 2]);
        let mut value = serde_json::to_value(&won).unwrap();
        let in_progress = BoardStatus::InProgress { to_move: Player::B };
        value["status"] = serde_json::to_value(in_progress).unwrap();
        assert!(serde_json::from_value::<Board>(value).is_err());

        let mut value = serde_json::to_value(Board::new()).unwrap();
        value["status"] = serde_json::to_value(BoardStatus::Done(Outcome::Draw)).unwrap();
        assert!(serde_json::from_value::<Board>(value).is_err());
    }

    #[test]
    fn test_display() {
        let board = play(&[4, 0]);
        assert_eq!(board.to_string(), "O..\n.X.\n...\n");
    }
}
