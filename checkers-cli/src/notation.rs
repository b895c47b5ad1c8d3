//! Board coordinates as typed at the console.
//!
//! A square is a column letter `A`-`H` followed by a row digit `1`-`8`.
//! Digit `8` is board row 0, digit `1` is row 7, matching the rendered
//! board. A move is two squares separated by spaces or a dash.

use checkers_core::{Move, Square, BOARD_SIZE};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("enter a move as two squares, like `A3 B4` (got {0} parts)")]
    Arity(usize),
    #[error("`{0}` is not a square: use a column A-H and a row 1-8")]
    BadSquare(String),
}

pub fn parse_square(text: &str) -> Result<Square, NotationError> {
    let bad = || NotationError::BadSquare(text.to_string());

    let mut chars = text.chars();
    let (Some(letter), Some(digit), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(bad());
    };

    let letter = letter.to_ascii_uppercase();
    if !('A'..='H').contains(&letter) {
        return Err(bad());
    }
    let digit = digit.to_digit(10).filter(|d| (1..=8).contains(d)).ok_or_else(bad)?;

    let col = (letter as u8 - b'A') as i8;
    let row = BOARD_SIZE - digit as i8;
    Ok(Square::new(row, col))
}

pub fn parse_move(text: &str) -> Result<Move, NotationError> {
    let parts: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect();

    match parts.as_slice() {
        [from, to] => Ok(Move::new(parse_square(from)?, parse_square(to)?)),
        _ => Err(NotationError::Arity(parts.len())),
    }
}

/// Inverse of [`parse_square`]. Off-board squares print as `??`.
pub fn format_square(sq: Square) -> String {
    if !sq.in_bounds() {
        return "??".to_string();
    }
    let letter = char::from(b'A' + sq.col as u8);
    format!("{}{}", letter, BOARD_SIZE - sq.row)
}

pub fn format_move(mov: Move) -> String {
    format!("{}-{}", format_square(mov.from), format_square(mov.to))
}

/// A chain of jumps as the squares visited, e.g. `F2-D4-F6`.
pub fn format_path(moves: &[Move]) -> String {
    let Some(first) = moves.first() else {
        return String::new();
    };
    std::iter::once(first.from)
        .chain(moves.iter().map(|mov| mov.to))
        .map(format_square)
        .collect::<Vec<_>>()
        .join("-")
}
