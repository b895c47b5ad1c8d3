//! Checkers (draughts) rules engine on an 8×8 board.
//!
//! # Board Layout
//!
//! ```text
//!        col 0 1 2 3 4 5 6 7
//!   row 0    . W . W . W . W    <- White's home rank, Black promotes here
//!   row 1    W . W . W . W .
//!   row 2    . W . W . W . W
//!   row 3    . . . . . . . .
//!   row 4    . . . . . . . .
//!   row 5    B . B . B . B .
//!   row 6    . B . B . B . B
//!   row 7    B . B . B . B .    <- Black's home rank, White promotes here
//! ```
//!
//! Pieces only ever stand on dark squares, where `(row + col)` is odd.
//! White men move towards higher rows, Black men towards lower rows.
//!
//! # Cell Characters
//!
//! ```text
//!   .  empty        W  white man     B  black man
//!                   w  white king    b  black king
//! ```
//!
//! The same characters make up the text layout accepted by [`Board::from_str`]
//! and produced by `Display`, one line per row starting at row 0.
//!
//! # Move Rules
//!
//! - A man steps one square diagonally forward.
//! - A man captures by jumping two squares diagonally, in any direction, over
//!   an opposing piece, which is removed.
//! - A king moves any distance along a diagonal to an empty square. The squares
//!   in between are not inspected. A 2-square king move over an opposing piece
//!   is a capture.
//! - Every 2-square move clears its midpoint, even a king's own piece there.
//! - Capturing is mandatory, and a piece that captured keeps jumping while it
//!   can ([`Board::plan_chain`]).
//! - A man reaching the far rank becomes a king, also in the middle of a chain.

use std::fmt;
use std::str::FromStr;

use log::trace;
use serde::{Deserialize, Serialize};

pub mod selector;

pub use selector::{computer_turn, Arbitration, ComputerMove, SelectorConfig};

/// Width and height of the board.
pub const BOARD_SIZE: i8 = 8;

/// The four capture jumps, in the order a chain tries them:
/// up-left, up-right, down-left, down-right.
pub const JUMP_OFFSETS: [(i8, i8); 4] = [(-2, -2), (-2, 2), (2, -2), (2, 2)];

/// Unit steps along the four diagonals, same order as [`JUMP_OFFSETS`].
const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Row delta of a forward step for this player's men.
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Player::White => 1,
            Player::Black => -1,
        }
    }

    /// The row on which this player's men are crowned.
    #[inline]
    pub fn promotion_row(self) -> i8 {
        match self {
            Player::White => BOARD_SIZE - 1,
            Player::Black => 0,
        }
    }

    /// This player's man.
    #[inline]
    pub fn man(self) -> Cell {
        match self {
            Player::White => Cell::WhiteMan,
            Player::Black => Cell::BlackMan,
        }
    }

    /// This player's king.
    #[inline]
    pub fn king(self) -> Cell {
        match self {
            Player::White => Cell::WhiteKing,
            Player::Black => Cell::BlackKing,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}

/// Contents of a single square. Pieces carry no identity beyond this tag.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    WhiteMan,
    BlackMan,
    WhiteKing,
    BlackKing,
}

impl Cell {
    /// The player owning the piece on this cell, if any.
    #[inline]
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::WhiteMan | Cell::WhiteKing => Some(Player::White),
            Cell::BlackMan | Cell::BlackKing => Some(Player::Black),
        }
    }

    /// Check if the cell holds a piece of `player`, man or king.
    #[inline]
    pub fn belongs_to(self, player: Player) -> bool {
        self.owner() == Some(player)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[inline]
    pub fn is_king(self) -> bool {
        matches!(self, Cell::WhiteKing | Cell::BlackKing)
    }

    /// Character used by the text layout.
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::WhiteMan => 'W',
            Cell::BlackMan => 'B',
            Cell::WhiteKing => 'w',
            Cell::BlackKing => 'b',
        }
    }

    /// Parse a text layout character.
    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            'W' => Some(Cell::WhiteMan),
            'B' => Some(Cell::BlackMan),
            'w' => Some(Cell::WhiteKing),
            'b' => Some(Cell::BlackKing),
            _ => None,
        }
    }
}

/// A square addressed by row and column.
///
/// Coordinates are signed and unchecked so that off-board candidates can be
/// expressed and then rejected by [`Board::check_move`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    #[inline]
    pub const fn new(row: i8, col: i8) -> Square {
        Square { row, col }
    }

    /// Check if the square lies on the 8×8 board.
    #[inline]
    pub fn in_bounds(self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// Dark squares are the only ones pieces may occupy.
    #[inline]
    pub fn is_dark(self) -> bool {
        (self.row as i16 + self.col as i16).rem_euclid(2) == 1
    }

    /// The square `dr` rows and `dc` columns away. May be off the board.
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Square {
        Square::new(self.row.saturating_add(dr), self.col.saturating_add(dc))
    }

    /// Iterate over all 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Square::new(row, col)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A candidate transition from one square to another.
///
/// Nothing is validated on construction; legality is decided by
/// [`Board::check_move`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Move {
        Move { from, to }
    }

    /// Row and column deltas (`to - from`).
    #[inline]
    pub fn delta(&self) -> (i8, i8) {
        (
            self.to.row.saturating_sub(self.from.row),
            self.to.col.saturating_sub(self.from.col),
        )
    }

    /// Length of the move if it runs along a diagonal.
    #[inline]
    pub fn diagonal_distance(&self) -> Option<u8> {
        let (dr, dc) = self.delta();
        (dr != 0 && dr.unsigned_abs() == dc.unsigned_abs()).then(|| dr.unsigned_abs())
    }

    /// The jumped-over square of a 2-square diagonal move.
    #[inline]
    pub fn midpoint(&self) -> Option<Square> {
        match self.diagonal_distance() {
            Some(2) => {
                let (dr, dc) = self.delta();
                Some(self.from.offset(dr / 2, dc / 2))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// How a legal move travels.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// One diagonal square.
    Step,
    /// Two diagonal squares over an opposing piece, which is removed.
    Capture,
    /// A king travelling two or more squares without capturing.
    Glide,
}

/// Why a submitted move was refused. Every variant is recoverable: the board
/// is left untouched and the player may try again.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum MoveError {
    #[error("square is off the board")]
    OutOfBounds,
    #[error("there is no piece of yours on the starting square")]
    NotOwnPiece,
    #[error("the destination square is occupied")]
    DestinationOccupied,
    #[error("that piece cannot move that way")]
    IllegalShape,
    #[error("a capture is available and must be taken")]
    CaptureMandatoryButNotTaken,
    #[error("the capturing piece on {0} must keep jumping")]
    MustContinueChain(Square),
}

/// What [`Board::apply_move`] did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Applied {
    pub mov: Move,
    pub kind: MoveKind,
    /// The moved man was crowned by this move.
    pub promoted: bool,
    /// Square of the removed opposing piece.
    pub captured: Option<Square>,
    /// Set by [`Board::submit_move`] and [`Board::continue_chain`] when the
    /// capturing piece can jump again from its landing square.
    pub continue_from: Option<Square>,
}

/// A capture chain planned by one piece: the jumps in order and the board
/// they lead to.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Chain {
    pub jumps: Vec<Move>,
    pub board: Board,
}

impl Chain {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jumps.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.jumps.len()
    }

    /// Square where the capturing piece ends up.
    pub fn landing(&self) -> Option<Square> {
        self.jumps.last().map(|jump| jump.to)
    }
}

/// Whether the game goes on for the player about to move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    InProgress,
    /// The side to move has no legal move and has lost.
    Won(Player),
}

/// Errors from parsing a board text layout.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum BoardParseError {
    #[error("expected 8 rows, found {0}")]
    RowCount(usize),
    #[error("row {row}: expected 8 cells, found {found}")]
    RowWidth { row: usize, found: usize },
    #[error("row {row}, col {col}: unknown cell character {ch:?}")]
    UnknownCell { row: usize, col: usize, ch: char },
    #[error("row {row}, col {col}: piece on a light square")]
    LightSquare { row: usize, col: usize },
}

/// The 8×8 grid. Small enough to copy freely.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Board {
    cells: [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    /// Create a board with no pieces.
    pub fn empty() -> Board {
        Board {
            cells: [[Cell::Empty; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// Create the standard starting position: White men on the dark squares
    /// of rows 0-2, Black men on rows 5-7.
    pub fn new_game() -> Board {
        let mut board = Board::empty();
        for sq in Square::all().filter(|sq| sq.is_dark()) {
            if sq.row < 3 {
                board.set(sq, Cell::WhiteMan);
            } else if sq.row > 4 {
                board.set(sq, Cell::BlackMan);
            }
        }
        board
    }

    /// Get the cell at `sq`, or None if it is off the board.
    #[inline]
    pub fn cell(&self, sq: Square) -> Option<Cell> {
        sq.in_bounds()
            .then(|| self.cells[sq.row as usize][sq.col as usize])
    }

    /// Cell lookup for squares already known to be on the board.
    #[inline]
    fn at(&self, sq: Square) -> Cell {
        self.cells[sq.row as usize][sq.col as usize]
    }

    /// Put `cell` on `sq`.
    ///
    /// Does NOT validate the rules - callers must keep pieces on dark squares.
    #[inline]
    pub fn set(&mut self, sq: Square, cell: Cell) {
        debug_assert!(sq.in_bounds(), "square {sq} is off the board");
        debug_assert!(cell.is_empty() || sq.is_dark(), "piece on light square {sq}");
        self.cells[sq.row as usize][sq.col as usize] = cell;
    }

    /// Squares holding `player`'s pieces, in row-major scan order.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = Square> + '_ {
        Square::all().filter(move |&sq| self.at(sq).belongs_to(player))
    }

    /// Count `player`'s pieces on the board.
    pub fn count(&self, player: Player) -> usize {
        self.pieces(player).count()
    }

    /// Text layout, one string per row.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.to_char()).collect())
            .collect()
    }

    /// Parse a text layout given as one string per row.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Board, BoardParseError> {
        if rows.len() != BOARD_SIZE as usize {
            return Err(BoardParseError::RowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (r, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let width = line.chars().count();
            if width != BOARD_SIZE as usize {
                return Err(BoardParseError::RowWidth { row: r, found: width });
            }
            for (c, ch) in line.chars().enumerate() {
                let cell = Cell::from_char(ch)
                    .ok_or(BoardParseError::UnknownCell { row: r, col: c, ch })?;
                let sq = Square::new(r as i8, c as i8);
                if !cell.is_empty() && !sq.is_dark() {
                    return Err(BoardParseError::LightSquare { row: r, col: c });
                }
                board.set(sq, cell);
            }
        }
        Ok(board)
    }

    // ========== Move Legality ==========

    /// Validate `mov` for `player` and classify it.
    ///
    /// Checks run in a fixed order and the first failure is reported:
    /// bounds, ownership of the origin, empty destination, then the shape
    /// rules for kings and men.
    pub fn check_move(&self, mov: Move, player: Player) -> Result<MoveKind, MoveError> {
        if !mov.from.in_bounds() || !mov.to.in_bounds() {
            return Err(MoveError::OutOfBounds);
        }

        let piece = self.at(mov.from);
        if !piece.belongs_to(player) {
            return Err(MoveError::NotOwnPiece);
        }

        if !self.at(mov.to).is_empty() {
            return Err(MoveError::DestinationOccupied);
        }

        let distance = mov.diagonal_distance().ok_or(MoveError::IllegalShape)?;

        // Kings fly along any diagonal; the path is not checked.
        if piece.is_king() {
            return Ok(match distance {
                1 => MoveKind::Step,
                2 if self.jumps_opponent(mov, player) => MoveKind::Capture,
                _ => MoveKind::Glide,
            });
        }

        match distance {
            1 if mov.delta().0 == player.forward() => Ok(MoveKind::Step),
            2 if self.jumps_opponent(mov, player) => Ok(MoveKind::Capture),
            _ => Err(MoveError::IllegalShape),
        }
    }

    /// Check if `mov` is legal for `player`. Pure, never mutates.
    #[inline]
    pub fn is_legal(&self, mov: Move, player: Player) -> bool {
        self.check_move(mov, player).is_ok()
    }

    /// The midpoint of a 2-square move holds an opposing piece.
    #[inline]
    fn jumps_opponent(&self, mov: Move, player: Player) -> bool {
        mov.midpoint()
            .and_then(|mid| self.cell(mid))
            .is_some_and(|cell| cell.belongs_to(player.opponent()))
    }

    /// Apply a move in place.
    ///
    /// Does NOT validate - gate it with [`Board::check_move`] or
    /// [`Board::is_legal`]. The moved piece is crowned when it lands on
    /// `player`'s promotion row. The midpoint of any 2-square move is
    /// cleared, whoever stands there; only an opposing piece counts as
    /// captured.
    pub fn apply_move(&mut self, mov: Move, player: Player) -> Applied {
        let piece = self.at(mov.from);
        self.set(mov.from, Cell::Empty);

        let landed = if mov.to.row == player.promotion_row() {
            player.king()
        } else {
            piece
        };
        self.set(mov.to, landed);

        let mut captured = None;
        if let Some(mid) = mov.midpoint() {
            if self.at(mid).belongs_to(player.opponent()) {
                captured = Some(mid);
            }
            self.set(mid, Cell::Empty);
        }

        let kind = if captured.is_some() {
            MoveKind::Capture
        } else if mov.diagonal_distance() == Some(1) {
            MoveKind::Step
        } else {
            MoveKind::Glide
        };

        Applied {
            mov,
            kind,
            promoted: !piece.is_king() && landed.is_king(),
            captured,
            continue_from: None,
        }
    }

    // ========== Captures ==========

    /// First capture available to the piece on `from`, trying the jumps in
    /// [`JUMP_OFFSETS`] order.
    pub fn capture_from(&self, player: Player, from: Square) -> Option<Move> {
        JUMP_OFFSETS
            .iter()
            .map(|&(dr, dc)| Move::new(from, from.offset(dr, dc)))
            .find(|&mov| self.check_move(mov, player) == Ok(MoveKind::Capture))
    }

    /// Check if any of `player`'s pieces can capture.
    pub fn has_capture(&self, player: Player) -> bool {
        self.find_any_capture(player).is_some()
    }

    /// First capture in board scan order.
    pub fn find_any_capture(&self, player: Player) -> Option<Move> {
        self.pieces(player)
            .find_map(|from| self.capture_from(player, from))
    }

    /// Plan the capture chain of the piece on `from` without touching this
    /// board.
    ///
    /// At each square the first available jump is taken and the walk
    /// continues from the landing square until no jump remains. The choice is
    /// greedy; a longer chain through another direction is not looked for.
    /// Each jump removes an opposing piece, so the walk always ends and never
    /// visits a captured square twice.
    pub fn plan_chain(&self, player: Player, from: Square) -> Chain {
        let mut board = *self;
        let mut jumps = Vec::new();
        let mut cursor = from;

        while let Some(jump) = board.capture_from(player, cursor) {
            let applied = board.apply_move(jump, player);
            trace!(
                "{player} jumps {jump}{}",
                if applied.promoted { " and is crowned" } else { "" }
            );
            jumps.push(jump);
            cursor = jump.to;
        }

        Chain { jumps, board }
    }

    /// Run the capture chain of the piece on `from` on this board.
    ///
    /// Returns whether at least one jump happened.
    pub fn resolve_chain(&mut self, player: Player, from: Square) -> bool {
        let chain = self.plan_chain(player, from);
        if chain.is_empty() {
            return false;
        }
        *self = chain.board;
        true
    }

    // ========== Move Enumeration ==========

    /// First legal move for `player`, or None if it has none.
    ///
    /// Pieces are visited in row-major order. For each piece the offsets
    /// `(dr, dc)` with `dr` and `dc` in `-2..=2` are tried in nested order,
    /// then kings try their long diagonals (distance 3 and more). The first
    /// legal candidate wins; there is no notion of a better move.
    pub fn find_any_legal_move(&self, player: Player) -> Option<Move> {
        self.pieces(player).find_map(|from| {
            let near = (-2..=2)
                .flat_map(|dr| (-2..=2).map(move |dc| (dr, dc)))
                .map(|(dr, dc)| Move::new(from, from.offset(dr, dc)));
            let is_king = self.at(from).is_king();
            let far = (3..BOARD_SIZE)
                .filter(move |_| is_king)
                .flat_map(|dist| DIAGONALS.iter().map(move |&(ur, uc)| (ur * dist, uc * dist)))
                .map(|(dr, dc)| Move::new(from, from.offset(dr, dc)));

            near.chain(far).find(|&mov| self.is_legal(mov, player))
        })
    }

    /// Check if `player` has any legal move, captures included.
    #[inline]
    pub fn has_any_move(&self, player: Player) -> bool {
        self.find_any_legal_move(player).is_some()
    }

    /// Every move `player` may currently play.
    ///
    /// When a capture exists only captures are returned.
    pub fn legal_moves(&self, player: Player) -> Vec<Move> {
        if self.has_capture(player) {
            return self
                .pieces(player)
                .flat_map(|from| {
                    JUMP_OFFSETS
                        .iter()
                        .map(move |&(dr, dc)| Move::new(from, from.offset(dr, dc)))
                })
                .filter(|&mov| self.check_move(mov, player) == Ok(MoveKind::Capture))
                .collect();
        }

        self.pieces(player)
            .flat_map(|from| {
                (1..BOARD_SIZE).flat_map(move |dist| {
                    DIAGONALS
                        .iter()
                        .map(move |&(ur, uc)| Move::new(from, from.offset(ur * dist, uc * dist)))
                })
            })
            .filter(|&mov| self.is_legal(mov, player))
            .collect()
    }

    // ========== Human Move Submission ==========

    /// Validate and play a move submitted by a human.
    ///
    /// On top of [`Board::check_move`] this enforces mandatory capture. The
    /// board is left untouched when the move is rejected. After a capture,
    /// `continue_from` tells whether the same piece must jump again.
    pub fn submit_move(&mut self, mov: Move, player: Player) -> Result<Applied, MoveError> {
        let kind = self.check_move(mov, player)?;
        if kind != MoveKind::Capture && self.has_capture(player) {
            return Err(MoveError::CaptureMandatoryButNotTaken);
        }
        Ok(self.commit_submitted(mov, player))
    }

    /// Play the next jump of a chain that must continue from `at`.
    pub fn continue_chain(
        &mut self,
        mov: Move,
        player: Player,
        at: Square,
    ) -> Result<Applied, MoveError> {
        if mov.from != at {
            return Err(MoveError::MustContinueChain(at));
        }
        if self.check_move(mov, player)? != MoveKind::Capture {
            return Err(MoveError::MustContinueChain(at));
        }
        Ok(self.commit_submitted(mov, player))
    }

    fn commit_submitted(&mut self, mov: Move, player: Player) -> Applied {
        let mut applied = self.apply_move(mov, player);
        if applied.kind == MoveKind::Capture {
            applied.continue_from = self.capture_from(player, mov.to).map(|_| mov.to);
        }
        applied
    }

    // ========== Game Status ==========

    /// The game is over for `to_move` when it has no legal move left.
    pub fn status(&self, to_move: Player) -> GameStatus {
        if self.has_any_move(to_move) {
            GameStatus::InProgress
        } else {
            GameStatus::Won(to_move.opponent())
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new_game()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Parse 8 lines of 8 cell characters. Blank lines and surrounding
    /// whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Board::from_rows(&rows)
    }
}

impl TryFrom<Vec<String>> for Board {
    type Error = BoardParseError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Board::from_rows(&rows)
    }
}

impl From<Board> for Vec<String> {
    fn from(board: Board) -> Self {
        board.rows()
    }
}
