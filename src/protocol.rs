//! Line protocol spoken with the game manager.
//!
//! The exchange is strictly line based:
//!
//! 1. The agent prints its name.
//! 2. The manager sends `color,limit,minimax,caching,ordering`, for example
//!    `1,4,0,1,1`: play dark, look 4 plies ahead, use alpha-beta (minimax is
//!    `1`), caching on, ordering on. A limit of `-1` disables the depth limit.
//! 3. The manager repeatedly sends a status line, `SCORE <dark> <light>` or
//!    `FINAL <dark> <light>`. After `SCORE` comes one board line
//!    (`[[0, 1, 2], ...]`) and the agent answers `<column> <row>`. `FINAL`
//!    ends the game without a reply.
//!
//! ## Example
//!
//! ```
//! use claim_ai::protocol::Agent;
//! use claim_ai::rules::Othello;
//!
//! let input = "2,2,0,0,0\nSCORE 2 2\n[[0,0,0,0],[0,2,1,0],[0,1,2,0],[0,0,0,0]]\nFINAL 3 1\n";
//! let mut output = Vec::new();
//! Agent::new(Othello).run(input.as_bytes(), &mut output).unwrap();
//! assert!(String::from_utf8(output).unwrap().starts_with("Bidding AI\n"));
//! ```

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::{Board, Color};
use crate::constants::UNLIMITED_DEPTH;
use crate::rules::Rules;
use crate::search::{Algorithm, DepthLimit, SearchConfig, decide};

/// Identity line printed before anything else.
pub const AGENT_NAME: &str = "Bidding AI";

/// Malformed configuration or status lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("expected 5 comma-separated fields, got {0}")]
    FieldCount(usize),

    #[error("field `{field}` is not an integer: {value:?}")]
    NotAnInteger { field: &'static str, value: String },

    #[error("color must be 1 or 2, got {0}")]
    BadColor(i64),

    #[error("depth limit must be -1 or non-negative, got {0}")]
    BadDepth(i64),

    #[error("flag `{field}` must be 0 or 1, got {value}")]
    BadFlag { field: &'static str, value: i64 },

    #[error("malformed status line: {0:?}")]
    BadStatus(String),
}

/// The manager's configuration line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AgentConfig {
    pub color: Color,
    pub search: SearchConfig,
}

impl FromStr for AgentConfig {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const FIELDS: [&str; 5] = ["color", "limit", "minimax", "caching", "ordering"];

        let parts: Vec<&str> = s.trim().split(',').map(str::trim).collect();
        if parts.len() != FIELDS.len() {
            return Err(ProtocolError::FieldCount(parts.len()));
        }
        let mut values = [0i64; 5];
        for (i, (field, text)) in FIELDS.into_iter().zip(&parts).enumerate() {
            values[i] = text.parse().map_err(|_| ProtocolError::NotAnInteger {
                field,
                value: text.to_string(),
            })?;
        }
        let [color, limit, minimax, caching, ordering] = values;

        let color = u8::try_from(color)
            .ok()
            .and_then(Color::from_wire)
            .ok_or(ProtocolError::BadColor(color))?;
        let depth = match limit {
            UNLIMITED_DEPTH => DepthLimit::Unlimited,
            n => DepthLimit::Plies(u32::try_from(n).map_err(|_| ProtocolError::BadDepth(n))?),
        };
        let flag = |field: &'static str, value: i64| match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ProtocolError::BadFlag { field, value }),
        };
        let algorithm = if flag("minimax", minimax)? {
            Algorithm::Minimax
        } else {
            Algorithm::AlphaBeta
        };

        Ok(AgentConfig {
            color,
            search: SearchConfig {
                algorithm,
                depth,
                caching: flag("caching", caching)?,
                ordering: flag("ordering", ordering)?,
            },
        })
    }
}

/// One status line from the manager.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// Game in progress; a board line follows.
    Score { dark: u32, light: u32 },
    /// Game over.
    Final { dark: u32, light: u32 },
}

impl FromStr for Status {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ProtocolError::BadStatus(s.to_string());
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [tag, dark, light] = parts.as_slice() else {
            return Err(bad());
        };
        let dark = dark.parse().map_err(|_| bad())?;
        let light = light.parse().map_err(|_| bad())?;
        match *tag {
            "SCORE" => Ok(Status::Score { dark, light }),
            "FINAL" => Ok(Status::Final { dark, light }),
            _ => Err(bad()),
        }
    }
}

/// A protocol session driven by a set of rules.
pub struct Agent<R: Rules> {
    rules: R,
}

impl<R: Rules> Agent<R> {
    pub fn new(rules: R) -> Self {
        Self { rules }
    }

    /// Run a full session. Returns the final `(dark, light)` score.
    ///
    /// # Errors
    /// Any malformed line, an early end of input, an I/O failure, or a board
    /// on which the agent has no legal move.
    pub fn run<I: BufRead, O: Write>(&self, input: I, mut output: O) -> Result<(u32, u32)> {
        let mut lines = input.lines();
        let mut next_line = |what: &str| -> Result<String> {
            match lines.next() {
                Some(line) => line.with_context(|| format!("failed to read {what}")),
                None => bail!("input ended while waiting for {what}"),
            }
        };

        writeln!(output, "{AGENT_NAME}")?;
        output.flush()?;

        let config: AgentConfig = next_line("configuration")?
            .parse()
            .context("invalid configuration line")?;
        log_config(&config);

        let mut turn = 0usize;
        loop {
            let status: Status = next_line("status")?
                .parse()
                .context("invalid status line")?;
            let (dark, light) = match status {
                Status::Final { dark, light } => {
                    info!(dark, light, "game over");
                    return Ok((dark, light));
                }
                Status::Score { dark, light } => (dark, light),
            };

            turn += 1;
            let board: Board = next_line("board")?
                .parse()
                .with_context(|| format!("invalid board on turn {turn}"))?;
            debug!(turn, dark, light, "board received");

            let decision = decide(&self.rules, &board, config.color, &config.search)
                .with_context(|| format!("no move on turn {turn}"))?;
            writeln!(output, "{}", decision.mv)?;
            output.flush()?;
        }
    }
}

fn log_config(config: &AgentConfig) {
    let search = &config.search;
    info!(color = %config.color, "playing");
    info!(algorithm = %search.algorithm, "search algorithm");
    info!(caching = search.caching, "state caching");
    info!(ordering = search.ordering, "node ordering");
    info!(depth = %search.depth, "depth limit");
    if search.algorithm == Algorithm::Minimax && search.ordering {
        warn!("node ordering has no effect on minimax");
    }
}
