//! Position evaluation.
//!
//! [`utility`] is the exact territory differential and is used at terminal
//! nodes. [`heuristic`] is an approximate estimate of the same quantity for
//! positions cut off by the depth limit; it is never consulted once the game
//! is over.

use crate::board::{Board, Color};
use crate::constants::{
    WEIGHT_C_SQUARE, WEIGHT_CORNER, WEIGHT_EDGE, WEIGHT_MOBILITY, WEIGHT_X_SQUARE,
};
use crate::rules::Rules;

/// Own disks minus opponent disks, positive when `perspective` is ahead.
pub fn utility<R: Rules + ?Sized>(rules: &R, board: &Board, perspective: Color) -> i32 {
    let (dark, light) = rules.score(board);
    let diff = dark as i32 - light as i32;
    match perspective {
        Color::Dark => diff,
        Color::Light => -diff,
    }
}

/// Approximate final differential for a non-terminal position.
///
/// Combines the current disk differential, a positional term that rewards
/// corners and edges and penalises cells that hand an empty corner to the
/// opponent, and the mobility differential. The weights are tuned by hand;
/// the value is an estimate, not a bound.
pub fn heuristic<R: Rules + ?Sized>(rules: &R, board: &Board, perspective: Color) -> i32 {
    let material = utility(rules, board, perspective);
    let positional = positional_score(board, perspective);
    let own = rules.legal_moves(board, perspective).len() as i32;
    let theirs = rules.legal_moves(board, perspective.opponent()).len() as i32;
    material + positional + WEIGHT_MOBILITY * (own - theirs)
}

/// Sum of cell weights, own cells counted positive and opponent cells negative.
pub fn positional_score(board: &Board, perspective: Color) -> i32 {
    let n = board.size();
    let mut score = 0;
    for y in 0..n {
        for x in 0..n {
            let Some(owner) = board.get(x, y) else {
                continue;
            };
            let w = cell_weight(board, x, y);
            score += if owner == perspective { w } else { -w };
        }
    }
    score
}

/// Weight of a single cell. Cells next to a corner are only penalised while
/// that corner is still empty.
fn cell_weight(board: &Board, x: usize, y: usize) -> i32 {
    let last = board.size() - 1;
    if last < 2 {
        // No interior to speak of on tiny boards.
        return 0;
    }
    let is_edge = |v: usize| v == 0 || v == last;
    if is_edge(x) && is_edge(y) {
        return WEIGHT_CORNER;
    }

    // Nearest corner, and how far (x, y) is from it on each axis.
    let cx = if x < board.size() / 2 { 0 } else { last };
    let cy = if y < board.size() / 2 { 0 } else { last };
    let dx = x.abs_diff(cx);
    let dy = y.abs_diff(cy);
    let corner_empty = board.get(cx, cy).is_none();

    match (dx, dy) {
        (1, 1) if corner_empty => WEIGHT_X_SQUARE,
        (0, 1) | (1, 0) if corner_empty => WEIGHT_C_SQUARE,
        _ if is_edge(x) || is_edge(y) => WEIGHT_EDGE,
        _ => 0,
    }
}
