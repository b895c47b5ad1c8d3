//! The console turn loop: one human against the computer.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use checkers_core::{computer_turn, Applied, Board, ComputerMove, Player, SelectorConfig};
use log::info;

use crate::notation::{format_move, format_path, format_square, parse_move};
use crate::render::render;

/// How a game ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Won(Player),
    /// The human typed `quit` or input ran out.
    Quit,
}

enum Turn {
    Played,
    Quit,
}

pub struct Game {
    board: Board,
    human: Player,
    to_move: Player,
    config: SelectorConfig,
}

impl Game {
    /// A fresh game. White moves first.
    pub fn new(human: Player, config: SelectorConfig) -> Game {
        Game::from_position(Board::new_game(), human, Player::White, config)
    }

    pub fn from_position(
        board: Board,
        human: Player,
        to_move: Player,
        config: SelectorConfig,
    ) -> Game {
        Game {
            board,
            human,
            to_move,
            config,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Play until someone cannot move or the human quits.
    pub fn play<R: BufRead>(&mut self, input: &mut R) -> Result<Outcome> {
        loop {
            print!("\n{}", render(&self.board));

            if !self.board.has_any_move(self.to_move) {
                return Ok(self.game_over(self.to_move.opponent()));
            }

            if self.to_move == self.human {
                if let Turn::Quit = self.human_turn(input)? {
                    return Ok(Outcome::Quit);
                }
            } else if !self.computer_move() {
                return Ok(self.game_over(self.human));
            }

            self.to_move = self.to_move.opponent();
        }
    }

    fn game_over(&self, winner: Player) -> Outcome {
        info!("game over, {winner} wins");
        if winner == self.human {
            println!("{} cannot move. You win!", self.human.opponent());
        } else {
            println!("You ({}) cannot move. The computer wins.", self.human);
        }
        Outcome::Won(winner)
    }

    fn computer_move(&mut self) -> bool {
        let color = self.human.opponent();
        match computer_turn(&mut self.board, color, &self.config) {
            Some(ComputerMove::Chain(jumps)) => {
                println!("Computer ({color}) captures: {}", format_path(&jumps));
                true
            }
            Some(ComputerMove::Step(mov)) => {
                println!("Computer ({color}) moves: {}", format_move(mov));
                true
            }
            None => false,
        }
    }

    fn human_turn<R: BufRead>(&mut self, input: &mut R) -> Result<Turn> {
        if self.board.has_capture(self.human) {
            println!("You have a capture available and must take it.");
        }

        let question = format!(
            "Your move ({}), e.g. {}: ",
            self.human,
            example_move(self.human)
        );
        let applied = loop {
            let Some(line) = prompt(input, &question)? else {
                return Ok(Turn::Quit);
            };
            let mov = match parse_move(&line) {
                Ok(mov) => mov,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            };
            match self.board.submit_move(mov, self.human) {
                Ok(applied) => break applied,
                Err(e) => println!("Illegal move: {e}."),
            }
        };

        self.continue_chain(applied, input)
    }

    /// Keep prompting while the capturing piece can jump again.
    fn continue_chain<R: BufRead>(&mut self, mut applied: Applied, input: &mut R) -> Result<Turn> {
        while let Some(at) = applied.continue_from {
            print!("\n{}", render(&self.board));
            let question = format!("Keep jumping with the piece on {}: ", format_square(at));
            let Some(line) = prompt(input, &question)? else {
                return Ok(Turn::Quit);
            };
            let mov = match parse_move(&line) {
                Ok(mov) => mov,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            };
            match self.board.continue_chain(mov, self.human, at) {
                Ok(next) => applied = next,
                Err(e) => println!("Illegal move: {e}."),
            }
        }
        Ok(Turn::Played)
    }
}

/// An opening step for `player`, shown as an input example.
fn example_move(player: Player) -> &'static str {
    match player {
        Player::White => "B6 A5",
        Player::Black => "A3 B4",
    }
}

/// Print `question` and read one trimmed line. None on EOF or `quit`.
pub fn prompt<R: BufRead>(input: &mut R, question: &str) -> Result<Option<String>> {
    print!("{question}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        println!();
        return Ok(None);
    }
    let line = line.trim();
    if line.eq_ignore_ascii_case("quit") {
        return Ok(None);
    }
    Ok(Some(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkers_core::{Cell, Square};
    use std::io::Cursor;

    fn game(board: &str, human: Player, to_move: Player) -> Game {
        let board: Board = board.parse().unwrap();
        Game::from_position(board, human, to_move, SelectorConfig::instant())
    }

    #[test]
    fn test_example_move_is_a_legal_opening() {
        let board = Board::new_game();
        for player in [Player::White, Player::Black] {
            let mov = parse_move(example_move(player)).unwrap();
            assert!(board.is_legal(mov, player), "{player}");
        }
    }

    #[test]
    fn test_quit_and_eof() {
        let mut g = Game::new(Player::White, SelectorConfig::instant());
        assert_eq!(g.play(&mut Cursor::new("quit\n")).unwrap(), Outcome::Quit);

        let mut g = Game::new(Player::White, SelectorConfig::instant());
        assert_eq!(g.play(&mut Cursor::new("")).unwrap(), Outcome::Quit);
        assert_eq!(*g.board(), Board::new_game());
    }

    #[test]
    fn test_computer_opens_when_human_is_black() {
        let mut g = Game::new(Player::Black, SelectorConfig::instant());
        assert_eq!(g.play(&mut Cursor::new("quit\n")).unwrap(), Outcome::Quit);
        assert_eq!(g.board().cell(Square::new(3, 0)), Some(Cell::WhiteMan));
        assert_eq!(g.board().cell(Square::new(2, 1)), Some(Cell::Empty));
    }

    #[test]
    fn test_blocked_human_loses_without_input() {
        let mut g = game(
            "
            .W......
            B.B.....
            ...B....
            ........
            ........
            ........
            ........
            ........
            ",
            Player::White,
            Player::White,
        );
        assert_eq!(g.play(&mut Cursor::new("")).unwrap(), Outcome::Won(Player::Black));
    }

    #[test]
    fn test_bad_input_is_reprompted() {
        let mut g = Game::new(Player::White, SelectorConfig::instant());
        // Junk, a step onto an occupied square, then a legal step.
        let script = "hello\nB6 A7\nB6 A5\nquit\n";
        assert_eq!(g.play(&mut Cursor::new(script)).unwrap(), Outcome::Quit);
        assert_eq!(g.board().cell(Square::new(3, 0)), Some(Cell::WhiteMan));
        assert_eq!(g.board().count(Player::Black), 12);
    }

    #[test]
    fn test_human_double_jump_wins() {
        let mut g = game(
            "
            ........
            ........
            .W......
            ..B.....
            ........
            ....B...
            ........
            ........
            ",
            Player::White,
            Player::White,
        );
        // The second line tries to move another square mid-chain.
        let script = "b6 d4\nc5 d4\nd4 f2\n";
        assert_eq!(g.play(&mut Cursor::new(script)).unwrap(), Outcome::Won(Player::White));
        assert_eq!(g.board().count(Player::Black), 0);
        assert_eq!(g.board().cell(Square::new(6, 5)), Some(Cell::WhiteMan));
    }

    #[test]
    fn test_simple_move_refused_when_capture_exists() {
        let mut g = game(
            "
            .W......
            ........
            ........
            ........
            ...W....
            ....B...
            ........
            ........
            ",
            Player::White,
            Player::White,
        );
        // B8 C7 is a step while D4xF2 is available.
        let script = "b8 c7\nd4 f2\n";
        assert_eq!(g.play(&mut Cursor::new(script)).unwrap(), Outcome::Won(Player::White));
        assert_eq!(g.board().cell(Square::new(0, 1)), Some(Cell::WhiteMan));
    }
}
