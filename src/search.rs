//! Depth-limited minimax and alpha-beta search.
//!
//! Both algorithms share the same node policy:
//! - a node whose side to move has no legal move is terminal and scores the
//!   exact [`utility`] from the root perspective;
//! - a node reached with no remaining depth is a cutoff and scores the
//!   [`heuristic`] instead;
//! - every other node maximizes when the root side is to move and minimizes
//!   otherwise, recursing into each child with the colors swapped.
//!
//! Ties always resolve to the earliest move in the rules' enumeration order,
//! so minimax, alpha-beta, caching and move ordering all agree on the chosen
//! move. Alpha-beta windows start unbounded at the root.
//!
//! ## Example
//!
//! ```
//! use claim_ai::board::{Board, Color};
//! use claim_ai::rules::Othello;
//! use claim_ai::search::{decide, Algorithm, DepthLimit, SearchConfig};
//!
//! let board = Board::starting(6).unwrap();
//! let config = SearchConfig::default()
//!     .with_algorithm(Algorithm::AlphaBeta)
//!     .with_depth(DepthLimit::Plies(3))
//!     .with_caching(true);
//! let decision = decide(&Othello, &board, Color::Dark, &config).unwrap();
//! println!("play {}", decision.mv);
//! ```

use std::fmt;

use thiserror::Error;
use tracing::{debug, trace};

use crate::board::{Board, Color, Move};
use crate::cache::{CacheKey, TranspositionCache};
use crate::constants::{DEFAULT_DEPTH, INF};
use crate::eval::{heuristic, utility};
use crate::ordering::{natural_order, order_moves};
use crate::rules::{CountingRules, MoveError, RuleCalls, Rules};

/// How many plies the search may look ahead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DepthLimit {
    /// Search every branch to the end of the game.
    Unlimited,
    /// Stop after this many plies and estimate.
    Plies(u32),
}

impl DepthLimit {
    /// True when no lookahead is left.
    #[inline]
    pub fn is_exhausted(self) -> bool {
        self == DepthLimit::Plies(0)
    }

    /// The limit one ply further down.
    #[inline]
    pub fn child(self) -> Self {
        match self {
            DepthLimit::Unlimited => DepthLimit::Unlimited,
            DepthLimit::Plies(n) => DepthLimit::Plies(n.saturating_sub(1)),
        }
    }
}

impl fmt::Display for DepthLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthLimit::Unlimited => write!(f, "unlimited"),
            DepthLimit::Plies(n) => write!(f, "{n} plies"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Minimax,
    AlphaBeta,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Minimax => write!(f, "minimax"),
            Algorithm::AlphaBeta => write!(f, "alpha-beta"),
        }
    }
}

/// Everything that shapes a single decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    pub depth: DepthLimit,
    pub caching: bool,
    /// Only affects alpha-beta.
    pub ordering: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::AlphaBeta,
            depth: DepthLimit::Plies(DEFAULT_DEPTH),
            caching: false,
            ordering: false,
        }
    }
}

impl SearchConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_depth(mut self, depth: DepthLimit) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }

    pub fn with_ordering(mut self, ordering: bool) -> Self {
        self.ordering = ordering;
        self
    }
}

/// Best move at a node (none for terminal and cutoff nodes) and its value
/// from the root perspective.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub mv: Option<Move>,
    pub value: i32,
}

/// Counters collected during one search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Search calls, including ones answered from the cache.
    pub nodes: u64,
    pub terminal_evals: u64,
    pub heuristic_evals: u64,
    pub cache_hits: u64,
    pub cache_stores: u64,
    /// Sibling loops abandoned by an alpha-beta cutoff.
    pub prunes: u64,
    /// Calls made to the rules.
    pub rules: RuleCalls,
}

impl SearchStats {
    pub fn adapter_calls(&self) -> u64 {
        self.rules.total()
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes={} terminal={} heuristic={} cache_hits={} cache_stores={} prunes={} \
             legal_moves={} apply_move={} score={}",
            self.nodes,
            self.terminal_evals,
            self.heuristic_evals,
            self.cache_hits,
            self.cache_stores,
            self.prunes,
            self.rules.legal_moves,
            self.rules.apply_move,
            self.rules.score
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The side to move cannot play; the position is already terminal for it.
    #[error("{color} has no legal move")]
    NoLegalMove { color: Color },

    /// The rules rejected a move the search produced. Indicates a rules
    /// implementation whose enumeration and application disagree.
    #[error(transparent)]
    InvalidMove(#[from] MoveError),
}

/// Outcome of a top-level decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub mv: Move,
    /// Root value from the mover's perspective.
    pub value: i32,
    pub stats: SearchStats,
}

/// Pick a move for `to_move`.
///
/// The side to move is both the acting color and the maximizing
/// perspective. A fresh cache is built for this call and dropped afterwards.
/// A depth limit of zero still expands the root so there is a move to return.
///
/// # Errors
/// - [`SearchError::NoLegalMove`] when `to_move` has no legal move.
/// - [`SearchError::InvalidMove`] when the rules reject one of their own moves.
pub fn decide<R: Rules + ?Sized>(
    rules: &R,
    board: &Board,
    to_move: Color,
    config: &SearchConfig,
) -> Result<Decision, SearchError> {
    let depth = match config.depth {
        DepthLimit::Plies(0) => DepthLimit::Plies(1),
        other => other,
    };

    let mut searcher = Searcher::new(rules, *config, to_move);
    let result = match config.algorithm {
        Algorithm::Minimax => searcher.minimax(board, to_move, depth)?,
        Algorithm::AlphaBeta => searcher.alphabeta(board, to_move, depth, -INF, INF)?,
    };
    let stats = searcher.stats();

    let mv = result
        .mv
        .ok_or(SearchError::NoLegalMove { color: to_move })?;
    debug!(
        algorithm = %config.algorithm,
        depth = %config.depth,
        caching = config.caching,
        ordering = config.ordering,
        %mv,
        value = result.value,
        %stats,
        "decision"
    );
    Ok(Decision {
        mv,
        value: result.value,
        stats,
    })
}

/// Search state for one decision: the counted rules, the cache and the stats.
pub struct Searcher<'a, R: Rules + ?Sized> {
    rules: CountingRules<'a, R>,
    config: SearchConfig,
    /// The root side; values are always reported from its point of view.
    perspective: Color,
    cache: TranspositionCache,
    stats: SearchStats,
}

impl<'a, R: Rules + ?Sized> Searcher<'a, R> {
    pub fn new(rules: &'a R, config: SearchConfig, perspective: Color) -> Self {
        Self {
            rules: CountingRules::new(rules),
            config,
            perspective,
            cache: TranspositionCache::new(config.caching),
            stats: SearchStats::default(),
        }
    }

    /// Counters so far, including rules calls.
    pub fn stats(&self) -> SearchStats {
        SearchStats {
            rules: self.rules.calls(),
            ..self.stats
        }
    }

    pub fn cache(&self) -> &TranspositionCache {
        &self.cache
    }

    /// Plain minimax from `board` with `to_move` to play.
    pub fn minimax(
        &mut self,
        board: &Board,
        to_move: Color,
        depth: DepthLimit,
    ) -> Result<SearchResult, SearchError> {
        self.stats.nodes += 1;
        let key = self.cache_key(board, to_move, depth);
        if let Some(hit) = self.probe(key.as_ref()) {
            return Ok(hit);
        }

        let moves = self.rules.legal_moves(board, to_move);
        let result = if moves.is_empty() {
            self.terminal(board)
        } else if depth.is_exhausted() {
            self.cutoff(board)
        } else {
            let maximizing = to_move == self.perspective;
            let mut best_mv = None;
            let mut best_value = if maximizing { -INF } else { INF };
            for mv in moves {
                let child = self.rules.apply_move(board, to_move, mv)?;
                let value = self.minimax(&child, to_move.opponent(), depth.child())?.value;
                let improves = if maximizing {
                    value > best_value
                } else {
                    value < best_value
                };
                if best_mv.is_none() || improves {
                    best_mv = Some(mv);
                    best_value = value;
                }
            }
            SearchResult {
                mv: best_mv,
                value: best_value,
            }
        };

        self.remember(key, result);
        Ok(result)
    }

    /// Alpha-beta from `board` within the window (`alpha`, `beta`).
    ///
    /// Fail-soft: a value at or below `alpha` is an upper bound and a value at
    /// or above `beta` a lower bound. Only values strictly inside the window
    /// are exact, and only those are cached.
    pub fn alphabeta(
        &mut self,
        board: &Board,
        to_move: Color,
        depth: DepthLimit,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<SearchResult, SearchError> {
        self.stats.nodes += 1;
        let key = self.cache_key(board, to_move, depth);
        if let Some(hit) = self.probe(key.as_ref()) {
            return Ok(hit);
        }

        let moves = self.rules.legal_moves(board, to_move);
        if moves.is_empty() {
            let result = self.terminal(board);
            self.remember(key, result);
            return Ok(result);
        }
        if depth.is_exhausted() {
            let result = self.cutoff(board);
            self.remember(key, result);
            return Ok(result);
        }

        let (alpha_orig, beta_orig) = (alpha, beta);
        let maximizing = to_move == self.perspective;
        let candidates = if self.config.ordering {
            let rules = &self.rules;
            order_moves(rules, moves, self.perspective, maximizing, |mv| {
                rules.apply_move(board, to_move, mv)
            })?
        } else {
            natural_order(moves)
        };

        let mut best_mv = None;
        let mut best_index = usize::MAX;
        let mut best_value = if maximizing { -INF } else { INF };
        for candidate in candidates {
            let child = match candidate.child {
                Some(child) => child,
                None => self.rules.apply_move(board, to_move, candidate.mv)?,
            };

            // A move enumerated before the current best wins a tie, so search
            // it with the window widened by one to see an equal value exactly.
            let precedes = candidate.index < best_index;
            let value = if maximizing {
                let floor = if precedes { alpha.saturating_sub(1) } else { alpha };
                self.alphabeta(&child, to_move.opponent(), depth.child(), floor, beta)?
                    .value
            } else {
                let ceiling = if precedes { beta.saturating_add(1) } else { beta };
                self.alphabeta(&child, to_move.opponent(), depth.child(), alpha, ceiling)?
                    .value
            };

            let improves = if maximizing {
                value > best_value
            } else {
                value < best_value
            };
            if best_mv.is_none() || improves || (value == best_value && precedes) {
                best_mv = Some(candidate.mv);
                best_index = candidate.index;
                best_value = value;
            }

            if maximizing {
                alpha = alpha.max(best_value);
            } else {
                beta = beta.min(best_value);
            }
            if alpha >= beta {
                self.stats.prunes += 1;
                break;
            }
        }

        let result = SearchResult {
            mv: best_mv,
            value: best_value,
        };
        if alpha_orig < best_value && best_value < beta_orig {
            self.remember(key, result);
        }
        Ok(result)
    }

    fn cache_key(&self, board: &Board, to_move: Color, depth: DepthLimit) -> Option<CacheKey> {
        self.cache
            .is_enabled()
            .then(|| CacheKey::new(board, to_move, depth))
    }

    fn probe(&mut self, key: Option<&CacheKey>) -> Option<SearchResult> {
        let hit = self.cache.lookup(key?)?;
        self.stats.cache_hits += 1;
        trace!(value = hit.value, "cache hit");
        Some(hit)
    }

    fn remember(&mut self, key: Option<CacheKey>, result: SearchResult) {
        if let Some(key) = key {
            if self.cache.store(key, result) {
                self.stats.cache_stores += 1;
            }
        }
    }

    fn terminal(&mut self, board: &Board) -> SearchResult {
        self.stats.terminal_evals += 1;
        SearchResult {
            mv: None,
            value: utility(&self.rules, board, self.perspective),
        }
    }

    fn cutoff(&mut self, board: &Board) -> SearchResult {
        self.stats.heuristic_evals += 1;
        SearchResult {
            mv: None,
            value: heuristic(&self.rules, board, self.perspective),
        }
    }
}
