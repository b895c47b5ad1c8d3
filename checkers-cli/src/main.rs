//! Console checkers against the computer.
//!
//! Moves are typed as two squares, `A3 B4` or `a3-b4`. Type `quit` to leave.

mod game;
mod notation;
mod render;

use std::io;
use std::time::Duration;

use anyhow::Context;
use checkers_core::{Arbitration, Player, SelectorConfig};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use crate::game::{prompt, Game, Outcome};

#[derive(Parser)]
#[command(name = "checkers", about = "Play checkers against the computer", version)]
struct Args {
    /// Your color. Asked interactively when omitted.
    #[arg(short, long, value_enum)]
    color: Option<Color>,

    /// Pause after each computer move, in milliseconds
    #[arg(long = "think-ms", default_value_t = 500)]
    think_ms: u64,

    /// How to pick between several capturing pieces
    #[arg(long, value_enum, default_value_t = ArbitrationArg::ScanOrder)]
    arbitration: ArbitrationArg,

    /// Worker threads for the capture search (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Log level; overrides RUST_LOG
    #[arg(long = "log-level")]
    log_level: Option<LevelFilter>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Color {
    White,
    Black,
}

impl From<Color> for Player {
    fn from(color: Color) -> Player {
        match color {
            Color::White => Player::White,
            Color::Black => Player::Black,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ArbitrationArg {
    ScanOrder,
    FirstFinished,
}

impl From<ArbitrationArg> for Arbitration {
    fn from(arg: ArbitrationArg) -> Arbitration {
        match arg {
            ArbitrationArg::ScanOrder => Arbitration::ScanOrder,
            ArbitrationArg::FirstFinished => Arbitration::FirstFinished,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if let Some(level) = args.log_level {
        logger.filter_level(level);
    }
    logger.init();

    ctrlc::set_handler(|| {
        println!("\n\nInterrupted, leaving the game.");
        std::process::exit(130);
    })
    .context("Error setting Ctrl-C handler")?;

    println!("Checkers");
    println!("========");

    let mut input = io::stdin().lock();
    let human = match args.color {
        Some(color) => Player::from(color),
        None => match ask_color(&mut input)? {
            Some(player) => player,
            None => return Ok(()),
        },
    };

    let config = SelectorConfig {
        think_delay: Duration::from_millis(args.think_ms),
        arbitration: args.arbitration.into(),
        threads: args.threads,
    };
    info!("starting game: human plays {human}, {config:?}");

    println!("You play {human}. White moves first.");
    let mut game = Game::new(human, config);
    if game.play(&mut input)? == Outcome::Quit {
        println!("Bye.");
    }
    info!("final position:\n{}", game.board());
    Ok(())
}

/// Ask until the answer names a color. None if the player quits.
fn ask_color<R: io::BufRead>(input: &mut R) -> anyhow::Result<Option<Player>> {
    loop {
        let Some(answer) = prompt(input, "Play as (w)hite or (b)lack? ")? else {
            return Ok(None);
        };
        match answer.to_ascii_lowercase().as_str() {
            "w" | "white" => return Ok(Some(Player::White)),
            "b" | "black" => return Ok(Some(Player::Black)),
            _ => println!("Please answer w or b."),
        }
    }
}
