//! Move ordering for alpha-beta search.
//!
//! Each candidate is scored by the static [`utility`] of the board it leads
//! to and sorted best-first for the side choosing at that node: descending
//! for the maximizing side, ascending for the minimizing side. The sort is
//! stable, so equally scored moves keep their enumeration order. Every
//! candidate remembers its enumeration index; the search uses it to break
//! ties the same way whether ordering is on or off.

use crate::board::{Board, Color, Move};
use crate::eval::utility;
use crate::rules::{MoveError, Rules};

/// A move queued for expansion.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// Position in the rules' enumeration order.
    pub index: usize,
    pub mv: Move,
    /// The resulting board, when it was already built while ordering.
    pub child: Option<Board>,
}

/// Candidates in enumeration order, children not yet built.
pub fn natural_order(moves: Vec<Move>) -> Vec<Candidate> {
    moves
        .into_iter()
        .enumerate()
        .map(|(index, mv)| Candidate {
            index,
            mv,
            child: None,
        })
        .collect()
}

/// Candidates sorted most promising first for the side choosing at this node.
///
/// `expand` builds the child board for a move; it is called once per move and
/// the boards are kept on the candidates so the search does not rebuild them.
pub fn order_moves<R, F>(
    rules: &R,
    moves: Vec<Move>,
    perspective: Color,
    maximizing: bool,
    mut expand: F,
) -> Result<Vec<Candidate>, MoveError>
where
    R: Rules + ?Sized,
    F: FnMut(Move) -> Result<Board, MoveError>,
{
    let mut scored = Vec::with_capacity(moves.len());
    for (index, mv) in moves.into_iter().enumerate() {
        let child = expand(mv)?;
        let value = utility(rules, &child, perspective);
        scored.push((
            value,
            Candidate {
                index,
                mv,
                child: Some(child),
            },
        ));
    }

    if maximizing {
        scored.sort_by(|a, b| b.0.cmp(&a.0));
    } else {
        scored.sort_by(|a, b| a.0.cmp(&b.0));
    }
    Ok(scored.into_iter().map(|(_, c)| c).collect())
}
