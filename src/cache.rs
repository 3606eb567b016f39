//! Transposition cache for search results.
//!
//! Keys are the full board plus the side to move and the remaining depth, so
//! two move orders that reach the same position at the same depth share one
//! entry. A lookup only succeeds on an exact depth match: a result computed
//! with less lookahead never answers a deeper query, and a deeper result is not
//! substituted for a shallower one either, so enabling the cache never
//! changes what the search returns.
//!
//! The cache lives for a single decision. A disabled cache turns both
//! operations into no-ops.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::board::{Board, Color};
use crate::search::{DepthLimit, SearchResult};

/// Identity of a search node for caching purposes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub board: Board,
    pub to_move: Color,
    pub depth: DepthLimit,
}

impl CacheKey {
    pub fn new(board: &Board, to_move: Color, depth: DepthLimit) -> Self {
        Self {
            board: board.clone(),
            to_move,
            depth,
        }
    }
}

/// Cache of resolved node values, scoped to one top-level search.
#[derive(Debug, Default)]
pub struct TranspositionCache {
    enabled: bool,
    entries: HashMap<CacheKey, SearchResult>,
}

impl TranspositionCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: HashMap::new(),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Previously stored result for exactly this key.
    pub fn lookup(&self, key: &CacheKey) -> Option<SearchResult> {
        if !self.enabled {
            return None;
        }
        self.entries.get(key).copied()
    }

    /// Record a resolved result. The first result stored for a key is kept;
    /// returns whether a new entry was created.
    pub fn store(&mut self, key: CacheKey, result: SearchResult) -> bool {
        if !self.enabled {
            return false;
        }
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(result);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
