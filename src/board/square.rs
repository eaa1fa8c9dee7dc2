/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Not, str::FromStr};

use anyhow::{anyhow, bail, Result};

use super::BOARD_SIZE;

/// One of the two players of the game.
///
/// Blue starts on row `0` and tries to fill the last row. Red starts on the last row and tries to fill row `0`.
///
/// By convention, scores are measured from Blue's perspective: Blue is the maximizing side during search, and Red is the minimizing side.
/// Red moves first from the starting position, and therefore [`Side`] defaults to [`Side::Red`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum Side {
    Blue,
    #[default]
    Red,
}

impl Side {
    /// Number of side variants.
    pub const COUNT: usize = 2;

    /// An array of both sides, starting with Blue.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::Blue, Self::Red]
    }

    /// Creates a [`Side`] from the maximizing flag used during search.
    ///
    /// # Example
    /// ```
    /// # use newt::Side;
    /// assert_eq!(Side::from_maximizing(true), Side::Blue);
    /// assert_eq!(Side::from_maximizing(false), Side::Red);
    /// ```
    #[inline(always)]
    pub const fn from_maximizing(maximizing: bool) -> Self {
        if maximizing {
            Self::Blue
        } else {
            Self::Red
        }
    }

    /// Returns `true` if this side is the one trying to maximize the score.
    #[inline(always)]
    pub const fn is_maximizing(&self) -> bool {
        matches!(self, Self::Blue)
    }

    /// Returns this [`Side`]'s opponent.
    ///
    /// # Example
    /// ```
    /// # use newt::Side;
    /// assert_eq!(Side::Blue.opponent(), Side::Red);
    /// assert_eq!(Side::Red.opponent(), Side::Blue);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::Blue => Self::Red,
            Self::Red => Self::Blue,
        }
    }

    /// The row this side starts on.
    #[inline(always)]
    pub const fn home_row(&self) -> u8 {
        match self {
            Self::Blue => 0,
            Self::Red => BOARD_SIZE as u8 - 1,
        }
    }

    /// The row this side must fill to win. This is its opponent's home row.
    #[inline(always)]
    pub const fn goal_row(&self) -> u8 {
        self.opponent().home_row()
    }

    /// The row delta of a single step towards this side's goal row.
    ///
    /// # Example
    /// ```
    /// # use newt::Side;
    /// assert_eq!(Side::Blue.forward(), 1);
    /// assert_eq!(Side::Red.forward(), -1);
    /// ```
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::Blue => 1,
            Self::Red => -1,
        }
    }

    /// Human-readable name of this side.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Blue => "Blue",
            Self::Red => "Red",
        }
    }

    /// Converts this [`Side`] to the char used in board notation (`b` or `r`).
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Blue => 'b',
            Self::Red => 'r',
        }
    }

    /// Creates a [`Side`] from a char, case-insensitive.
    ///
    /// # Example
    /// ```
    /// # use newt::Side;
    /// assert_eq!(Side::from_char('B').unwrap(), Side::Blue);
    /// assert_eq!(Side::from_char('r').unwrap(), Side::Red);
    /// assert!(Side::from_char('x').is_err());
    /// ```
    #[inline(always)]
    pub fn from_char(side: char) -> Result<Self> {
        match side {
            'b' | 'B' => Ok(Self::Blue),
            'r' | 'R' => Ok(Self::Red),
            _ => bail!("Side must be either 'b' or 'r' (case-insensitive). Found {side:?}"),
        }
    }
}

impl Not for Side {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl FromStr for Side {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "blue" => Ok(Self::Blue),
            "r" | "red" => Ok(Self::Red),
            _ => bail!("Invalid side {s:?}: expected one of `blue`, `red`, `b`, `r`"),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "{}", self.char())
        }
    }
}

/// The contents of a single cell on the board.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty,
    Blue,
    Red,
}

impl Cell {
    /// Returns `true` if there is no piece in this cell.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The [`Side`] owning the piece in this cell, if there is one.
    ///
    /// # Example
    /// ```
    /// # use newt::{Cell, Side};
    /// assert_eq!(Cell::Blue.side(), Some(Side::Blue));
    /// assert_eq!(Cell::Empty.side(), None);
    /// ```
    #[inline(always)]
    pub const fn side(&self) -> Option<Side> {
        match self {
            Self::Empty => None,
            Self::Blue => Some(Side::Blue),
            Self::Red => Some(Side::Red),
        }
    }

    /// Returns `true` if this cell holds a piece belonging to `side`.
    #[inline(always)]
    pub const fn is(&self, side: Side) -> bool {
        matches!(
            (self, side),
            (Self::Blue, Side::Blue) | (Self::Red, Side::Red)
        )
    }

    /// Char used for this cell in board notation.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Empty => '.',
            Self::Blue => 'B',
            Self::Red => 'R',
        }
    }

    /// Parses a cell from its board notation char.
    #[inline(always)]
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '.' => Ok(Self::Empty),
            'B' => Ok(Self::Blue),
            'R' => Ok(Self::Red),
            _ => bail!("Invalid cell {c:?}: expected one of '.', 'B', 'R', or a digit"),
        }
    }
}

impl From<Side> for Cell {
    #[inline(always)]
    fn from(value: Side) -> Self {
        match value {
            Side::Blue => Self::Blue,
            Side::Red => Self::Red,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// Represents a single cell of the board, as an index in `[0, Square::COUNT)`.
///
/// Squares are indexed row-major, with row `0` at the top of the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Square(pub(crate) u8);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = BOARD_SIZE * BOARD_SIZE;

    /// Creates a new [`Square`] from a row and column.
    ///
    /// # Panics
    /// If `row` or `col` are out of bounds and debug assertions are enabled.
    #[inline(always)]
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!((row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE);
        Self(row * BOARD_SIZE as u8 + col)
    }

    /// Creates a new [`Square`] from a row and column, returning an error if either is out of bounds.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert!(Square::from_coords(3, 0).is_ok());
    /// assert!(Square::from_coords(4, 0).is_err());
    /// ```
    #[inline(always)]
    pub fn from_coords(row: u8, col: u8) -> Result<Self> {
        if row as usize >= BOARD_SIZE || col as usize >= BOARD_SIZE {
            bail!(
                "Square ({row},{col}) is off the board: rows and columns must be in [0, {}]",
                BOARD_SIZE - 1
            );
        }

        Ok(Self::new(row, col))
    }

    /// An iterator over all squares, in row-major order.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Fetches the row of this [`Square`].
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::new(2, 1).row(), 2);
    /// ```
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.0 / BOARD_SIZE as u8
    }

    /// Fetches the column of this [`Square`].
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.0 % BOARD_SIZE as u8
    }

    /// Returns this square's index, for indexing into arrays.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Attempt to offset this [`Square`] by the row and column deltas.
    ///
    /// If the result would leave the board, `None` is returned.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::new(1, 1).offset(1, 1), Some(Square::new(2, 2)));
    /// assert_eq!(Square::new(0, 0).offset(-1, 0), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, row_delta: i8, col_delta: i8) -> Option<Self> {
        let row = self.row() as i8 + row_delta;
        let col = self.col() as i8 + col_delta;

        if row < 0 || col < 0 || row >= BOARD_SIZE as i8 || col >= BOARD_SIZE as i8 {
            return None;
        }

        Some(Self::new(row as u8, col as u8))
    }

    /// Returns `true` if `other` is one of the (up to) 8 cells surrounding this one.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert!(Square::new(1, 1).is_adjacent(Square::new(0, 2)));
    /// assert!(!Square::new(1, 1).is_adjacent(Square::new(1, 1)));
    /// assert!(!Square::new(1, 1).is_adjacent(Square::new(3, 1)));
    /// ```
    #[inline(always)]
    pub const fn is_adjacent(&self, other: Self) -> bool {
        let rows = self.row().abs_diff(other.row());
        let cols = self.col().abs_diff(other.col());

        rows <= 1 && cols <= 1 && (rows | cols) != 0
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    /// Parses a square written as `row,col`, such as `3,0`.
    ///
    /// Two bare digits (`30`) are also accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('(').trim_end_matches(')');

        let (row, col) = match s.split_once(',') {
            Some(parts) => parts,
            None if s.len() == 2 && s.is_char_boundary(1) => s.split_at(1),
            None => bail!("Invalid Square {s:?}: expected `row,col`"),
        };

        let row = row
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid row {row:?} in Square {s:?}: {e}"))?;
        let col = col
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid column {col:?} in Square {s:?}: {e}"))?;

        Self::from_coords(row, col)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row(), self.col())
    }
}

impl fmt::Debug for Square {
    /// Displays the coordinates and the internal index.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_parsing() {
        assert_eq!("3,0".parse::<Square>().unwrap(), Square::new(3, 0));
        assert_eq!("(1, 2)".parse::<Square>().unwrap(), Square::new(1, 2));
        assert_eq!("21".parse::<Square>().unwrap(), Square::new(2, 1));

        assert!("4,0".parse::<Square>().is_err());
        assert!("0,-1".parse::<Square>().is_err());
        assert!("a1".parse::<Square>().is_err());
        assert!("".parse::<Square>().is_err());
    }

    #[test]
    fn test_square_display_round_trip() {
        for square in Square::iter() {
            assert_eq!(square.to_string().parse::<Square>().unwrap(), square);
        }
    }

    #[test]
    fn test_rows_and_goals() {
        assert_eq!(Side::Blue.home_row(), 0);
        assert_eq!(Side::Blue.goal_row(), BOARD_SIZE as u8 - 1);
        assert_eq!(Side::Red.home_row(), BOARD_SIZE as u8 - 1);
        assert_eq!(Side::Red.goal_row(), 0);
    }

    #[test]
    fn test_adjacency_matches_offsets() {
        for a in Square::iter() {
            for b in Square::iter() {
                let by_offset = (-1..=1)
                    .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
                    .filter(|&d| d != (0, 0))
                    .any(|(dr, dc)| a.offset(dr, dc) == Some(b));
                assert_eq!(a.is_adjacent(b), by_offset, "{a:?} vs {b:?}");
            }
        }
    }
}
