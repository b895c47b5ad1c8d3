//! Computer move selection.
//!
//! A turn runs through three states:
//!
//! ```text
//! CheckMandatoryCapture ──capture──> CaptureSearch ──┐
//!          │                                         ├──> Commit (think delay)
//!          └──────no capture──────> SimpleSearch ────┘
//! ```
//!
//! CaptureSearch plans one chain per computer piece in parallel. Each worker
//! walks its chain on a private copy of the board, so workers never observe
//! each other. Only the caller's board is canonical, and it is replaced once
//! by the winning chain's result.

use std::thread;
use std::time::Duration;

use log::{debug, warn};
use rayon::prelude::*;

use crate::{Board, Chain, Move, Player, Square};

/// Which worker's chain is played when several pieces can capture.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Arbitration {
    /// The first capturing piece in row-major scan order. Reproducible.
    #[default]
    ScanOrder,
    /// Whichever worker finishes first.
    FirstFinished,
}

/// Tuning for [`computer_turn`].
#[derive(Clone, Debug)]
pub struct SelectorConfig {
    /// Pause after the move is made, to pace the console game.
    pub think_delay: Duration,
    pub arbitration: Arbitration,
    /// Size of a dedicated worker pool. None uses rayon's global pool.
    pub threads: Option<usize>,
}

impl SelectorConfig {
    /// No delay, deterministic arbitration.
    pub fn instant() -> SelectorConfig {
        SelectorConfig {
            think_delay: Duration::ZERO,
            ..SelectorConfig::default()
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            think_delay: Duration::from_millis(500),
            arbitration: Arbitration::ScanOrder,
            threads: None,
        }
    }
}

/// What the computer played.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ComputerMove {
    /// A capture chain of one piece, jumps in order.
    Chain(Vec<Move>),
    /// A single non-capturing move.
    Step(Move),
}

impl ComputerMove {
    /// The moves as played, in order.
    pub fn moves(&self) -> &[Move] {
        match self {
            ComputerMove::Chain(jumps) => jumps,
            ComputerMove::Step(mov) => std::slice::from_ref(mov),
        }
    }
}

/// Play the computer's turn for `color` on `board`.
///
/// Returns None, leaving the board untouched, when `color` has no legal move.
/// Detecting that as a lost game is up to the caller.
pub fn computer_turn(
    board: &mut Board,
    color: Player,
    config: &SelectorConfig,
) -> Option<ComputerMove> {
    let played = if board.has_capture(color) {
        debug!("{color} must capture, planning chains");
        capture_search(board, color, config)
    } else {
        simple_search(board, color)
    };

    match &played {
        Some(ComputerMove::Chain(jumps)) => {
            debug!("{color} plays a {}-jump chain from {}", jumps.len(), jumps[0].from)
        }
        Some(ComputerMove::Step(mov)) => debug!("{color} plays {mov}"),
        None => debug!("{color} has no legal move"),
    }

    if !config.think_delay.is_zero() {
        thread::sleep(config.think_delay);
    }

    played
}

/// Plan every piece's chain concurrently and commit the winner.
fn capture_search(
    board: &mut Board,
    color: Player,
    config: &SelectorConfig,
) -> Option<ComputerMove> {
    let snapshot = *board;
    let pieces: Vec<Square> = snapshot.pieces(color).collect();

    let winner = match config.threads {
        Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(|| plan_chains(&snapshot, color, &pieces, config.arbitration)),
            Err(e) => {
                warn!("could not build a {threads}-thread pool ({e}), using the global pool");
                plan_chains(&snapshot, color, &pieces, config.arbitration)
            }
        },
        None => plan_chains(&snapshot, color, &pieces, config.arbitration),
    }?;

    *board = winner.board;
    Some(ComputerMove::Chain(winner.jumps))
}

/// One worker per piece; pieces that cannot capture yield nothing.
fn plan_chains(
    board: &Board,
    color: Player,
    pieces: &[Square],
    arbitration: Arbitration,
) -> Option<Chain> {
    let plan = |from: &Square| {
        let chain = board.plan_chain(color, *from);
        (!chain.is_empty()).then_some(chain)
    };

    match arbitration {
        Arbitration::ScanOrder => pieces.par_iter().find_map_first(plan),
        Arbitration::FirstFinished => pieces.par_iter().find_map_any(plan),
    }
}

/// Play the first legal move of a sequential board scan.
fn simple_search(board: &mut Board, color: Player) -> Option<ComputerMove> {
    let mov = board.find_any_legal_move(color)?;
    board.apply_move(mov, color);
    Some(ComputerMove::Step(mov))
}
