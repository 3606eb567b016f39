//! Integration tests for claim-ai
//!
//! These exercise the search through the public API: the fixed scenarios a
//! game manager produces, and the equivalences that must hold between
//! minimax, alpha-beta, caching, and move ordering. Positions for the
//! equivalence checks come from seeded random play so every run sees the same
//! boards.

use claim_ai::board::{Board, Color, Move};
use claim_ai::rules::{Othello, Rules};
use claim_ai::search::{
    Algorithm, DepthLimit, SearchConfig, SearchError, Searcher, decide,
};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// A board filled with `fill`, then patched with `(column, row, value)` cells.
fn filled(size: usize, fill: u8, cells: &[(usize, usize, u8)]) -> Board {
    let mut rows = vec![vec![fill; size]; size];
    for &(x, y, v) in cells {
        rows[y][x] = v;
    }
    Board::from_rows(&rows).unwrap()
}

/// Play `plies` random legal moves from the opening. Returns the board and
/// the side to move, or `None` if the game ended early.
fn random_position(size: usize, plies: usize, seed: u64) -> Option<(Board, Color)> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut board = Board::starting(size).unwrap();
    let mut to_move = Color::Dark;
    for _ in 0..plies {
        let moves = Othello.legal_moves(&board, to_move);
        if moves.is_empty() {
            return None;
        }
        let mv = moves[rng.usize(..moves.len())];
        board = Othello.apply_move(&board, to_move, mv).unwrap();
        to_move = to_move.opponent();
    }
    if Othello.legal_moves(&board, to_move).is_empty() {
        return None;
    }
    Some((board, to_move))
}

/// Seeded positions that still have a move for the side to play.
fn sample_positions(size: usize, plies: usize, count: usize) -> Vec<(Board, Color)> {
    (0..200u64)
        .filter_map(|seed| random_position(size, plies, seed))
        .take(count)
        .collect()
}

fn config(algorithm: Algorithm, depth: DepthLimit) -> SearchConfig {
    SearchConfig::default()
        .with_algorithm(algorithm)
        .with_depth(depth)
}

fn all_configs(depth: DepthLimit) -> Vec<SearchConfig> {
    let mut configs = Vec::new();
    for algorithm in [Algorithm::Minimax, Algorithm::AlphaBeta] {
        for caching in [false, true] {
            for ordering in [false, true] {
                configs.push(
                    config(algorithm, depth)
                        .with_caching(caching)
                        .with_ordering(ordering),
                );
            }
        }
    }
    configs
}

// =============================================================================
// Fixed scenarios
// =============================================================================

#[test]
fn test_only_move_on_near_full_board() {
    // Everything is light except a dark disk at (0, 5) and the hole at (2, 5).
    let board = filled(8, 2, &[(0, 5, 1), (2, 5, 0)]);
    assert_eq!(Othello.legal_moves(&board, Color::Dark), vec![Move::new(2, 5)]);

    for cfg in all_configs(DepthLimit::Plies(1)) {
        let d = decide(&Othello, &board, Color::Dark, &cfg).unwrap();
        assert_eq!(d.mv, Move::new(2, 5), "{cfg:?}");
    }
}

#[test]
fn test_side_without_moves_gets_an_error() {
    // Light is wiped out; it cannot bracket anything.
    let board = filled(4, 1, &[(3, 3, 0)]);
    for cfg in all_configs(DepthLimit::Plies(3)) {
        let err = decide(&Othello, &board, Color::Light, &cfg).unwrap_err();
        assert_eq!(err, SearchError::NoLegalMove { color: Color::Light });
    }
}

#[test]
fn test_transposition_served_from_cache() {
    // Four independent corners of play: dark can play a or b, light x or y,
    // and none of these moves interferes with another.
    let board = filled(
        8,
        0,
        &[
            (0, 0, 1),
            (1, 0, 2),
            (0, 7, 1),
            (1, 7, 2),
            (7, 0, 2),
            (6, 0, 1),
            (7, 7, 2),
            (6, 7, 1),
        ],
    );
    let a = Move::new(2, 0);
    let b = Move::new(2, 7);
    let x = Move::new(5, 0);

    let play = |moves: &[(Color, Move)]| {
        moves.iter().fold(board.clone(), |acc, &(color, mv)| {
            Othello.apply_move(&acc, color, mv).unwrap()
        })
    };
    let first = play(&[(Color::Dark, a), (Color::Light, x), (Color::Dark, b)]);
    let second = play(&[(Color::Dark, b), (Color::Light, x), (Color::Dark, a)]);
    assert_eq!(first, second);

    let cfg = config(Algorithm::Minimax, DepthLimit::Plies(2)).with_caching(true);
    let mut searcher = Searcher::new(&Othello, cfg, Color::Dark);
    let one = searcher
        .minimax(&first, Color::Light, DepthLimit::Plies(2))
        .unwrap();
    let before = searcher.stats();
    let two = searcher
        .minimax(&second, Color::Light, DepthLimit::Plies(2))
        .unwrap();
    let after = searcher.stats();

    assert_eq!(one, two);
    assert_eq!(after.adapter_calls(), before.adapter_calls());
    assert_eq!(after.cache_hits, before.cache_hits + 1);
}

#[test]
fn test_transpositions_are_hit_inside_one_search() {
    let board = filled(
        8,
        0,
        &[
            (0, 0, 1),
            (1, 0, 2),
            (0, 7, 1),
            (1, 7, 2),
            (7, 0, 2),
            (6, 0, 1),
            (7, 7, 2),
            (6, 7, 1),
        ],
    );
    let plain = decide(
        &Othello,
        &board,
        Color::Dark,
        &config(Algorithm::Minimax, DepthLimit::Plies(4)),
    )
    .unwrap();
    let cached = decide(
        &Othello,
        &board,
        Color::Dark,
        &config(Algorithm::Minimax, DepthLimit::Plies(4)).with_caching(true),
    )
    .unwrap();

    assert_eq!((plain.mv, plain.value), (cached.mv, cached.value));
    assert!(cached.stats.cache_hits > 0);
    assert!(cached.stats.adapter_calls() < plain.stats.adapter_calls());
}

// =============================================================================
// Equivalences
// =============================================================================

#[test]
fn test_unlimited_minimax_matches_alphabeta() {
    for (board, to_move) in sample_positions(4, 3, 12) {
        let mm = decide(
            &Othello,
            &board,
            to_move,
            &config(Algorithm::Minimax, DepthLimit::Unlimited),
        )
        .unwrap();
        let ab = decide(
            &Othello,
            &board,
            to_move,
            &config(Algorithm::AlphaBeta, DepthLimit::Unlimited),
        )
        .unwrap();
        assert_eq!((mm.mv, mm.value), (ab.mv, ab.value), "\n{board}");
        assert_eq!(mm.stats.heuristic_evals, 0);
        assert_eq!(ab.stats.heuristic_evals, 0);
    }
}

#[test]
fn test_every_configuration_agrees() {
    for (board, to_move) in sample_positions(6, 4, 8) {
        let configs = all_configs(DepthLimit::Plies(3));
        let reference = decide(&Othello, &board, to_move, &configs[0]).unwrap();
        for cfg in &configs[1..] {
            let d = decide(&Othello, &board, to_move, cfg).unwrap();
            assert_eq!(
                (d.mv, d.value),
                (reference.mv, reference.value),
                "{cfg:?}\n{board}"
            );
        }
    }
}

#[test]
fn test_caching_never_adds_rules_calls() {
    for (board, to_move) in sample_positions(6, 2, 6) {
        for algorithm in [Algorithm::Minimax, Algorithm::AlphaBeta] {
            for ordering in [false, true] {
                let cfg = config(algorithm, DepthLimit::Plies(3)).with_ordering(ordering);
                let off = decide(&Othello, &board, to_move, &cfg).unwrap();
                let on = decide(&Othello, &board, to_move, &cfg.with_caching(true)).unwrap();
                assert_eq!((on.mv, on.value), (off.mv, off.value), "{cfg:?}\n{board}");
                assert!(
                    on.stats.adapter_calls() <= off.stats.adapter_calls(),
                    "{cfg:?}\n{board}"
                );
            }
        }
    }
}

#[test]
fn test_ordering_visits_fewer_nodes_overall() {
    // Static ordering can lose on a single position, so compare totals.
    let mut positions = sample_positions(6, 4, 10);
    positions.extend(sample_positions(8, 6, 10));

    let cfg = config(Algorithm::AlphaBeta, DepthLimit::Plies(4));
    let (mut plain_nodes, mut ordered_nodes) = (0u64, 0u64);
    for (board, to_move) in &positions {
        let plain = decide(&Othello, board, *to_move, &cfg).unwrap();
        let ordered = decide(&Othello, board, *to_move, &cfg.with_ordering(true)).unwrap();
        assert_eq!((ordered.mv, ordered.value), (plain.mv, plain.value), "\n{board}");
        plain_nodes += plain.stats.nodes;
        ordered_nodes += ordered.stats.nodes;
    }
    assert!(
        ordered_nodes <= plain_nodes,
        "ordered {ordered_nodes} > plain {plain_nodes}"
    );
}

#[test]
fn test_decide_is_deterministic() {
    for (board, to_move) in sample_positions(6, 5, 4) {
        for cfg in all_configs(DepthLimit::Plies(2)) {
            let first = decide(&Othello, &board, to_move, &cfg).unwrap();
            let second = decide(&Othello, &board, to_move, &cfg).unwrap();
            assert_eq!(first, second);
        }
    }
}

#[test]
fn test_chosen_move_is_always_legal() {
    for (board, to_move) in sample_positions(8, 6, 6) {
        let cfg = config(Algorithm::AlphaBeta, DepthLimit::Plies(3))
            .with_caching(true)
            .with_ordering(true);
        let d = decide(&Othello, &board, to_move, &cfg).unwrap();
        assert!(Othello.legal_moves(&board, to_move).contains(&d.mv));
    }
}
