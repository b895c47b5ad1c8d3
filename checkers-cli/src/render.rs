//! Text rendering of the board for the console.
//!
//! ```text
//! .|ABCDEFGH
//! 8|.W.W.W.W
//! 7|W.W.W.W.
//! ...
//! 1|B.B.B.B.
//! ```

use checkers_core::{Board, BOARD_SIZE};

const HEADER: &str = ".|ABCDEFGH";

/// The board with column letters on top and row numbers on the left,
/// one line per row, newline terminated.
pub fn render(board: &Board) -> String {
    let mut out = String::with_capacity(11 * (BOARD_SIZE as usize + 1));
    out.push_str(HEADER);
    out.push('\n');
    for (i, row) in board.rows().iter().enumerate() {
        let label = BOARD_SIZE as usize - i;
        out.push_str(&format!("{label}|{row}\n"));
    }
    out
}
