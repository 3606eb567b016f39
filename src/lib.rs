//! Claim AI: adversarial search for a two-player territory game.
//!
//! This crate picks moves for a perfect-information, zero-sum board game in
//! which each side claims cells and flips bracketed runs of opponent disks.
//! The engine is depth-limited minimax or alpha-beta, with optional
//! per-decision transposition caching and static move ordering.
//!
//! ## Modules
//!
//! - [`constants`] - Wire encoding, search bounds, heuristic weights
//! - [`board`] - Board, color, and move types, board parsing
//! - [`rules`] - Legal moves, move application, scoring
//! - [`eval`] - Exact utility and cutoff heuristic
//! - [`cache`] - Transposition cache keyed on board, side, and depth
//! - [`ordering`] - Move ordering for alpha-beta
//! - [`search`] - Minimax, alpha-beta, and the top-level decision
//! - [`protocol`] - Line protocol spoken with the game manager
//!
//! ## Example
//!
//! ```
//! use claim_ai::board::{Board, Color};
//! use claim_ai::rules::Othello;
//! use claim_ai::search::{decide, SearchConfig};
//!
//! let board = Board::starting(8).unwrap();
//! let decision = decide(&Othello, &board, Color::Dark, &SearchConfig::default()).unwrap();
//! println!("Best move: {}", decision.mv);
//! ```

pub mod board;
pub mod cache;
pub mod constants;
pub mod eval;
pub mod ordering;
pub mod protocol;
pub mod rules;
pub mod search;
