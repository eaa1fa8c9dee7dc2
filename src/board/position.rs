/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Context, Result};

use super::{Cell, Move, MoveList, Side, Square, BOARD_SIZE, NEIGHBOR_OFFSETS};

/// Board notation of the starting position, without a side to move.
pub const BOARD_STARTPOS: &str = "BBBB/4/4/RRRR";

/// The grid of cells that pieces move around on.
///
/// A [`Board`] is a small `Copy` value, so making a move on it produces an independent board
/// and never disturbs the board it was made from.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`].
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            cells: [Cell::Empty; Square::COUNT],
        }
    }

    /// Creates a [`Board`] with every piece on its home row.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Side};
    /// let board = Board::startpos();
    /// assert_eq!(board.count(Side::Blue), 4);
    /// assert_eq!(board.count(Side::Red), 4);
    /// assert!(!board.is_terminal());
    /// ```
    pub fn startpos() -> Self {
        let mut board = Self::new();
        for side in Side::all() {
            for col in 0..BOARD_SIZE as u8 {
                board.place(side, Square::new(side.home_row(), col));
            }
        }
        board
    }

    /// Fetches the contents of `square`.
    #[inline(always)]
    pub const fn cell_at(&self, square: Square) -> Cell {
        self.cells[square.index()]
    }

    /// Returns the [`Side`] of the piece on `square`, if one exists.
    #[inline(always)]
    pub const fn side_at(&self, square: Square) -> Option<Side> {
        self.cell_at(square).side()
    }

    /// Returns `true` if `square` holds no piece.
    #[inline(always)]
    pub const fn is_empty(&self, square: Square) -> bool {
        self.cell_at(square).is_empty()
    }

    /// Places a piece of `side` on `square`, replacing whatever was there.
    #[inline(always)]
    pub fn place(&mut self, side: Side, square: Square) {
        self[square] = side.into();
    }

    /// Removes and returns the piece on `square`, if one exists.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Side> {
        let side = self.side_at(square);
        self[square] = Cell::Empty;
        side
    }

    /// The cells of a single row, left to right.
    #[inline(always)]
    pub fn row(&self, row: u8) -> &[Cell] {
        let start = row as usize * BOARD_SIZE;
        &self.cells[start..start + BOARD_SIZE]
    }

    /// Number of pieces belonging to `side`.
    #[inline(always)]
    pub fn count(&self, side: Side) -> usize {
        self.cells.iter().filter(|cell| cell.is(side)).count()
    }

    /// Number of cells with no piece in them.
    #[inline(always)]
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_empty()).count()
    }

    /// An iterator over every occupied square and the side occupying it, in row-major order.
    #[inline(always)]
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Side)> + '_ {
        Square::iter().filter_map(|square| self.side_at(square).map(|side| (square, side)))
    }

    /// An iterator over the squares occupied by `side`, in row-major order.
    #[inline(always)]
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = Square> + '_ {
        Square::iter().filter(move |&square| self.cell_at(square).is(side))
    }

    /// Returns `true` if `side` has filled its goal row.
    #[inline(always)]
    pub fn has_crossed(&self, side: Side) -> bool {
        self.row(side.goal_row()).iter().all(|cell| cell.is(side))
    }

    /// Returns `true` if the game is over: either Red fills row `0` or Blue fills the last row.
    ///
    /// Nothing else ends the game. In particular, a side with no legal moves has *not* lost.
    ///
    /// # Example
    /// ```
    /// # use newt::Board;
    /// let blue_crossed: Board = "4/4/4/BBBB".parse().unwrap();
    /// assert!(blue_crossed.is_terminal());
    ///
    /// let almost: Board = "4/4/R3/BBB.".parse().unwrap();
    /// assert!(!almost.is_terminal());
    /// ```
    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// The side that has crossed the board, if any.
    ///
    /// Red's goal row is checked first.
    #[inline(always)]
    pub fn winner(&self) -> Option<Side> {
        [Side::Red, Side::Blue]
            .into_iter()
            .find(|&side| self.has_crossed(side))
    }

    /// Applies `mv` to this board in place.
    ///
    /// The destination takes whatever was on the source, and the source becomes empty.
    /// No checks are made on the legality of `mv`.
    #[inline(always)]
    pub fn make_move(&mut self, mv: Move) {
        self[mv.to] = self[mv.from];
        self[mv.from] = Cell::Empty;
    }

    /// Copies this board and applies `mv` to the copy.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Cell, Move, Square};
    /// let board = Board::startpos();
    /// let mv = Move::new(Square::new(3, 0), Square::new(2, 0));
    /// let after = board.with_move_made(mv);
    /// assert_eq!(after.cell_at(mv.to), Cell::Red);
    /// assert_eq!(after.cell_at(mv.from), Cell::Empty);
    /// assert_eq!(board, Board::startpos());
    /// ```
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut copied = *self;
        copied.make_move(mv);
        copied
    }

    /// Generates all legal moves for `side`.
    ///
    /// Sources are visited in row-major order and, for each source, destinations follow [`NEIGHBOR_OFFSETS`].
    pub fn legal_moves(&self, side: Side) -> MoveList {
        let mut moves = MoveList::new();
        for from in self.pieces_of(side) {
            self.generate_moves_from(from, &mut moves);
        }
        moves
    }

    /// Generates all legal moves for the piece on `square`.
    ///
    /// If `square` is empty, there are no moves.
    pub fn legal_moves_from(&self, square: Square) -> MoveList {
        let mut moves = MoveList::new();
        if !self.is_empty(square) {
            self.generate_moves_from(square, &mut moves);
        }
        moves
    }

    /// Legal moves for `side` that step one row closer to its goal row.
    #[inline(always)]
    pub fn advancing_moves(&self, side: Side) -> impl Iterator<Item = Move> {
        self.legal_moves(side)
            .into_iter()
            .filter(move |mv| mv.row_delta() == side.forward())
    }

    /// Returns `true` if `mv` is legal for `side` on this board.
    pub fn is_legal(&self, mv: Move, side: Side) -> bool {
        self.cell_at(mv.from).is(side) && self.is_empty(mv.to) && mv.from.is_adjacent(mv.to)
    }

    /// Pushes a move onto every empty neighbour of `from`.
    #[inline(always)]
    fn generate_moves_from(&self, from: Square, moves: &mut MoveList) {
        for (row_delta, col_delta) in NEIGHBOR_OFFSETS {
            if let Some(to) = from.offset(row_delta, col_delta) {
                if self.is_empty(to) {
                    // Cannot overflow: each move uses a distinct edge of the board
                    moves.push(Move::new(from, to));
                }
            }
        }
    }

    /// Generates the notation string of this board, without a side to move.
    ///
    /// Runs of empty cells are compressed into digits.
    ///
    /// # Example
    /// ```
    /// # use newt::Board;
    /// assert_eq!(Board::startpos().to_notation(), "BBBB/4/4/RRRR");
    /// ```
    pub fn to_notation(&self) -> String {
        let mut notation = String::with_capacity(Square::COUNT + BOARD_SIZE);

        for row in 0..BOARD_SIZE as u8 {
            let mut empty = 0;
            for cell in self.row(row) {
                if cell.is_empty() {
                    empty += 1;
                } else {
                    if empty > 0 {
                        notation.push_str(&empty.to_string());
                        empty = 0;
                    }
                    notation.push(cell.char());
                }
            }

            if empty > 0 {
                notation.push_str(&empty.to_string());
            }

            if (row as usize) < BOARD_SIZE - 1 {
                notation.push('/');
            }
        }

        notation
    }

    /// Parses a board from its notation string.
    ///
    /// Rows are listed from row `0` downwards, separated by `/`.
    /// Each cell is `B`, `R`, or `.`, and a digit stands for that many empty cells.
    pub fn from_notation(notation: &str) -> Result<Self> {
        let notation = notation.trim();
        let rows = notation.split('/').collect::<Vec<_>>();
        if rows.len() != BOARD_SIZE {
            bail!(
                "Invalid board {notation:?}: expected {BOARD_SIZE} rows separated by '/', found {}",
                rows.len()
            );
        }

        let mut board = Self::new();
        for (row, contents) in rows.into_iter().enumerate() {
            let mut col = 0;
            for c in contents.chars() {
                if let Some(empty) = c.to_digit(10) {
                    col += empty as usize;
                    continue;
                }

                if col >= BOARD_SIZE {
                    bail!("Invalid board {notation:?}: row {row} ({contents:?}) has more than {BOARD_SIZE} cells");
                }

                let cell = Cell::from_char(c)
                    .with_context(|| format!("Invalid board {notation:?} at row {row}"))?;
                board.cells[row * BOARD_SIZE + col] = cell;
                col += 1;
            }

            if col != BOARD_SIZE {
                bail!("Invalid board {notation:?}: row {row} ({contents:?}) has {col} cells, expected {BOARD_SIZE}");
            }
        }

        Ok(board)
    }
}

impl Index<Square> for Board {
    type Output = Cell;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.cells[index.index()]
    }
}

impl IndexMut<Square> for Board {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.cells[index.index()]
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_notation(s)
    }
}

impl fmt::Display for Board {
    /// Renders the board as a grid with row and column labels.
    ///
    /// Using the alternate formatter (`{:#}`) hides the labels.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            write!(f, "   ")?;
            for col in 0..BOARD_SIZE {
                write!(f, "{col} ")?;
            }
            writeln!(f)?;
        }

        for row in 0..BOARD_SIZE as u8 {
            if !f.alternate() {
                write!(f, "{row}| ")?;
            }

            for cell in self.row(row) {
                write!(f, "{cell} ")?;
            }

            if (row as usize) < BOARD_SIZE - 1 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation())
    }
}
