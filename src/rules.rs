//! Game rules: legal-move enumeration, move application, and scoring.
//!
//! The search engine talks to the game only through the [`Rules`] trait, so
//! any pure, side-effect-free implementation can drive it. [`Othello`] is the
//! disk-flipping territory game played by the manager:
//! - A move places a disk on an empty cell.
//! - It must bracket at least one contiguous run of opponent disks between
//!   the new disk and an existing own disk, in any of the 8 directions.
//! - Every bracketed run is flipped.
//! - The score is the number of disks each side owns.

use std::cell::Cell;

use thiserror::Error;

use crate::board::{Board, Color, Move};
use crate::constants::DIRECTIONS;

/// Why a move was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("illegal move {mv}: outside the {size}x{size} board")]
    OutOfBounds { mv: Move, size: usize },

    #[error("illegal move {mv}: cell not empty")]
    Occupied { mv: Move },

    #[error("illegal move {mv}: flips nothing for {color}")]
    NoFlips { mv: Move, color: Color },
}

/// The contract the search engine relies on.
///
/// Implementations must be pure: the same inputs always produce the same
/// outputs, and no call observes or changes shared state.
pub trait Rules {
    /// Legal moves for `color`, in a fixed enumeration order. Empty means the
    /// position is terminal for that side.
    fn legal_moves(&self, board: &Board, color: Color) -> Vec<Move>;

    /// The board after `color` plays `mv`.
    fn apply_move(&self, board: &Board, color: Color, mv: Move) -> Result<Board, MoveError>;

    /// Territory counts as `(dark, light)`.
    fn score(&self, board: &Board) -> (usize, usize);
}

/// Standard Othello/Reversi rules on a square board of any size.
#[derive(Copy, Clone, Debug, Default)]
pub struct Othello;

impl Othello {
    /// Cells flipped if `color` plays at (x, y). Empty when the move is illegal.
    fn flips(board: &Board, color: Color, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut flipped = Vec::new();
        if board.get(x, y).is_some() {
            return flipped;
        }
        let opp = color.opponent();
        let mut run: Vec<(usize, usize)> = Vec::new();
        for (dx, dy) in DIRECTIONS {
            run.clear();
            let (mut cx, mut cy) = (x, y);
            loop {
                let (Some(nx), Some(ny)) = (cx.checked_add_signed(dx), cy.checked_add_signed(dy))
                else {
                    break;
                };
                if !board.contains(nx, ny) {
                    break;
                }
                match board.get(nx, ny) {
                    Some(c) if c == opp => run.push((nx, ny)),
                    Some(_) => {
                        // Own disk closes the run.
                        flipped.extend_from_slice(&run);
                        break;
                    }
                    None => break,
                }
                cx = nx;
                cy = ny;
            }
        }
        flipped
    }

    /// Cheaper than `flips` when only legality matters.
    fn brackets_any(board: &Board, color: Color, x: usize, y: usize) -> bool {
        if board.get(x, y).is_some() {
            return false;
        }
        let opp = color.opponent();
        DIRECTIONS.iter().any(|&(dx, dy)| {
            let mut seen_opp = false;
            let (mut cx, mut cy) = (x, y);
            loop {
                let (Some(nx), Some(ny)) = (cx.checked_add_signed(dx), cy.checked_add_signed(dy))
                else {
                    return false;
                };
                match board.get(nx, ny) {
                    Some(c) if c == opp => seen_opp = true,
                    Some(_) => return seen_opp,
                    None => return false,
                }
                cx = nx;
                cy = ny;
            }
        })
    }
}

impl Rules for Othello {
    fn legal_moves(&self, board: &Board, color: Color) -> Vec<Move> {
        let n = board.size();
        let mut moves = Vec::new();
        for y in 0..n {
            for x in 0..n {
                if Self::brackets_any(board, color, x, y) {
                    moves.push(Move::new(x, y));
                }
            }
        }
        moves
    }

    fn apply_move(&self, board: &Board, color: Color, mv: Move) -> Result<Board, MoveError> {
        if !board.contains(mv.column, mv.row) {
            return Err(MoveError::OutOfBounds {
                mv,
                size: board.size(),
            });
        }
        if board.get(mv.column, mv.row).is_some() {
            return Err(MoveError::Occupied { mv });
        }
        let flipped = Self::flips(board, color, mv.column, mv.row);
        if flipped.is_empty() {
            return Err(MoveError::NoFlips { mv, color });
        }

        let mut next = board.clone();
        next.set(mv.column, mv.row, Some(color));
        for (fx, fy) in flipped {
            next.set(fx, fy, Some(color));
        }
        Ok(next)
    }

    fn score(&self, board: &Board) -> (usize, usize) {
        (board.count(Color::Dark), board.count(Color::Light))
    }
}

/// Number of calls made through a [`CountingRules`] wrapper.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleCalls {
    pub legal_moves: u64,
    pub apply_move: u64,
    pub score: u64,
}

impl RuleCalls {
    pub fn total(&self) -> u64 {
        self.legal_moves + self.apply_move + self.score
    }
}

/// Wraps a [`Rules`] implementation and counts every call made through it,
/// including the ones made by evaluation and move ordering.
pub struct CountingRules<'a, R: Rules + ?Sized> {
    inner: &'a R,
    legal_moves: Cell<u64>,
    apply_move: Cell<u64>,
    score: Cell<u64>,
}

impl<'a, R: Rules + ?Sized> CountingRules<'a, R> {
    pub fn new(inner: &'a R) -> Self {
        Self {
            inner,
            legal_moves: Cell::new(0),
            apply_move: Cell::new(0),
            score: Cell::new(0),
        }
    }

    pub fn calls(&self) -> RuleCalls {
        RuleCalls {
            legal_moves: self.legal_moves.get(),
            apply_move: self.apply_move.get(),
            score: self.score.get(),
        }
    }
}

impl<R: Rules + ?Sized> Rules for CountingRules<'_, R> {
    fn legal_moves(&self, board: &Board, color: Color) -> Vec<Move> {
        self.legal_moves.set(self.legal_moves.get() + 1);
        self.inner.legal_moves(board, color)
    }

    fn apply_move(&self, board: &Board, color: Color, mv: Move) -> Result<Board, MoveError> {
        self.apply_move.set(self.apply_move.get() + 1);
        self.inner.apply_move(board, color, mv)
    }

    fn score(&self, board: &Board) -> (usize, usize) {
        self.score.set(self.score.get() + 1);
        self.inner.score(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_opening_moves() {
        let start = Board::starting(8).unwrap();
        let moves = Othello.legal_moves(&start, Color::Dark);
        assert_eq!(
            moves,
            vec![
                Move::new(3, 2),
                Move::new(2, 3),
                Move::new(5, 4),
                Move::new(4, 5)
            ]
        );
    }

    #[test]
    fn test_apply_flips_bracketed_run() {
        let start = Board::starting(8).unwrap();
        let next = Othello.apply_move(&start, Color::Dark, Move::new(3, 2)).unwrap();
        assert_eq!(next.get(3, 2), Some(Color::Dark));
        assert_eq!(next.get(3, 3), Some(Color::Dark));
        assert_eq!(Othello.score(&next), (4, 1));
        // The input board is untouched.
        assert_eq!(start.get(3, 3), Some(Color::Light));
    }

    #[test]
    fn test_flips_in_several_directions() {
        let b = board(
            "[[1, 1, 1],
              [2, 2, 2],
              [0, 0, 0]]",
        );
        // Dark at (0, 2) closes the run north and the diagonal through (1, 1).
        let next = Othello.apply_move(&b, Color::Dark, Move::new(0, 2)).unwrap();
        assert_eq!(next.get(0, 1), Some(Color::Dark));
        assert_eq!(next.get(1, 1), Some(Color::Dark));
        assert_eq!(next.get(2, 1), Some(Color::Light));
        assert_eq!(Othello.score(&next), (6, 1));
    }

    #[test]
    fn test_apply_rejects_illegal_moves() {
        let start = Board::starting(4).unwrap();
        assert_eq!(
            Othello.apply_move(&start, Color::Dark, Move::new(1, 1)),
            Err(MoveError::Occupied { mv: Move::new(1, 1) })
        );
        assert_eq!(
            Othello.apply_move(&start, Color::Dark, Move::new(0, 0)),
            Err(MoveError::NoFlips {
                mv: Move::new(0, 0),
                color: Color::Dark
            })
        );
        assert_eq!(
            Othello.apply_move(&start, Color::Dark, Move::new(4, 0)),
            Err(MoveError::OutOfBounds {
                mv: Move::new(4, 0),
                size: 4
            })
        );
    }

    #[test]
    fn test_every_legal_move_applies() {
        let start = Board::starting(6).unwrap();
        for color in [Color::Dark, Color::Light] {
            for mv in Othello.legal_moves(&start, color) {
                assert!(Othello.apply_move(&start, color, mv).is_ok(), "{mv}");
            }
        }
    }

    #[test]
    fn test_no_moves_on_one_sided_board() {
        let b = board("[[1, 1], [1, 0]]");
        assert!(Othello.legal_moves(&b, Color::Light).is_empty());
        assert!(Othello.legal_moves(&b, Color::Dark).is_empty());
    }

    #[test]
    fn test_counting_rules_tracks_calls() {
        let start = Board::starting(4).unwrap();
        let counted = CountingRules::new(&Othello);
        let moves = counted.legal_moves(&start, Color::Dark);
        let next = counted.apply_move(&start, Color::Dark, moves[0]).unwrap();
        let _ = counted.apply_move(&next, Color::Dark, Move::new(0, 0));
        counted.score(&next);

        let calls = counted.calls();
        assert_eq!(calls.legal_moves, 1);
        assert_eq!(calls.apply_move, 2);
        assert_eq!(calls.score, 1);
        assert_eq!(calls.total(), 4);
    }
}
