//! Claim AI: a minimax / alpha-beta agent for the disk-flipping territory game.
//!
//! ## Usage
//!
//! - `claim-ai` or `claim-ai agent` - Speak the line protocol on stdin/stdout
//! - `claim-ai decide --board <rows> --color 1` - Choose one move and explain it
//! - `claim-ai demo` - Watch the engine play a seeded random opponent
//!
//! Logs go to stderr; set `--log-level` or `RUST_LOG` to see them.

use std::io;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use claim_ai::board::{Board, Color};
use claim_ai::constants::{DEFAULT_DEPTH, DEFAULT_SIZE, UNLIMITED_DEPTH};
use claim_ai::protocol::Agent;
use claim_ai::rules::{Othello, Rules};
use claim_ai::search::{Algorithm, DepthLimit, SearchConfig, decide};

/// Claim AI: adversarial search for a two-player territory game
#[derive(Parser)]
#[command(name = "claim-ai")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game against the manager over stdin/stdout
    Agent,
    /// Choose a single move for a board
    Decide {
        /// Board as a list of rows, e.g. "[[0,1],[2,0]]"
        #[arg(long)]
        board: String,
        /// Side to move: 1 (dark) or 2 (light)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
        color: u8,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Play the engine (dark) against a seeded random opponent
    Demo {
        /// Board side length
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,
        /// Random opponent seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Depth limit in plies; -1 searches to the end of the game
    #[arg(long, default_value_t = DEFAULT_DEPTH as i64, allow_negative_numbers = true)]
    depth: i64,
    /// Use plain minimax instead of alpha-beta
    #[arg(long)]
    minimax: bool,
    /// Cache search results within a decision
    #[arg(long)]
    caching: bool,
    /// Order moves by static utility (alpha-beta only)
    #[arg(long)]
    ordering: bool,
}

impl SearchArgs {
    fn to_config(&self) -> Result<SearchConfig> {
        let depth = match self.depth {
            UNLIMITED_DEPTH => DepthLimit::Unlimited,
            n => DepthLimit::Plies(
                u32::try_from(n).with_context(|| format!("invalid depth limit {n}"))?,
            ),
        };
        let algorithm = if self.minimax {
            Algorithm::Minimax
        } else {
            Algorithm::AlphaBeta
        };
        Ok(SearchConfig::default()
            .with_algorithm(algorithm)
            .with_depth(depth)
            .with_caching(self.caching)
            .with_ordering(self.ordering))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::Agent) | None => {
            let stdin = io::stdin();
            Agent::new(Othello).run(stdin.lock(), io::stdout())?;
        }
        Some(Commands::Decide {
            board,
            color,
            search,
        }) => run_decide(&board, color, &search.to_config()?)?,
        Some(Commands::Demo { size, seed, search }) => run_demo(size, seed, &search.to_config()?)?,
    }
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_decide(encoded: &str, color: u8, config: &SearchConfig) -> Result<()> {
    let board: Board = encoded.parse().context("invalid board")?;
    let color = Color::from_wire(color).context("color must be 1 or 2")?;

    let decision = decide(&Othello, &board, color, config)?;
    println!("{board}");
    println!("move:  {}", decision.mv);
    println!("value: {}", decision.value);
    println!("stats: {}", decision.stats);
    Ok(())
}

fn run_demo(size: usize, seed: u64, config: &SearchConfig) -> Result<()> {
    println!("Claim AI: engine (X) against random play (O)\n");

    let mut rng = fastrand::Rng::with_seed(seed);
    let mut board = Board::starting(size).context("invalid board size")?;
    let mut to_move = Color::Dark;
    let mut passes = 0;

    println!("{board}");
    while passes < 2 {
        let moves = Othello.legal_moves(&board, to_move);
        if moves.is_empty() {
            println!("{to_move} passes\n");
            passes += 1;
            to_move = to_move.opponent();
            continue;
        }
        passes = 0;

        let mv = match to_move {
            Color::Dark => decide(&Othello, &board, to_move, config)?.mv,
            Color::Light => moves[rng.usize(..moves.len())],
        };
        board = Othello.apply_move(&board, to_move, mv)?;
        println!("{to_move} plays {mv}");
        println!("{board}");
        to_move = to_move.opponent();
    }

    let (dark, light) = Othello.score(&board);
    println!("Final score: X {dark} - O {light}");
    Ok(())
}
