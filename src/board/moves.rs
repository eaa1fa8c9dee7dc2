/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

use super::{Square, BOARD_SIZE};

/// Maximum possible number of moves in a given position.
///
/// Every move slides a piece along one edge of the board's king-move graph, from an occupied cell to an empty one,
/// so no position can have more moves than the graph has edges.
pub const MAX_NUM_MOVES: usize =
    2 * BOARD_SIZE * (BOARD_SIZE - 1) + 2 * (BOARD_SIZE - 1) * (BOARD_SIZE - 1);

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// `(row, col)` deltas of the neighbours a piece may step onto, in the order moves are generated.
///
/// The search keeps the first of several equally-scored moves, so this order decides ties.
pub const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (1, 1),
    (0, 1),
    (1, 0),
    (-1, -1),
    (-1, 1),
    (-1, 0),
    (0, -1),
    (1, -1),
];

/// A single step of a piece from one [`Square`] onto a neighbouring one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    /// Square the piece starts on.
    pub from: Square,

    /// Square the piece ends on.
    pub to: Square,
}

impl Move {
    /// Creates a new [`Move`] from `from` to `to`.
    ///
    /// No checks are made on the legality of this move.
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// The move that undoes this one.
    ///
    /// # Example
    /// ```
    /// # use newt::{Move, Square};
    /// let mv = Move::new(Square::new(3, 0), Square::new(2, 1));
    /// assert_eq!(mv.inverse(), Move::new(Square::new(2, 1), Square::new(3, 0)));
    /// ```
    #[inline(always)]
    pub const fn inverse(&self) -> Self {
        Self::new(self.to, self.from)
    }

    /// Number of rows this move travels, signed so that moving down the board is positive.
    #[inline(always)]
    pub const fn row_delta(&self) -> i8 {
        self.to.row() as i8 - self.from.row() as i8
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;
    /// Parses a move from two coordinate pairs.
    ///
    /// Any non-digit characters separate the numbers, so `3 0 2 1`, `3,0 2,1` and `3,0-2,1` are all the same move.
    /// A `-` is only a separator directly after a digit. Anywhere else it would negate a coordinate, which is an error.
    ///
    /// # Example
    /// ```
    /// # use newt::{Move, Square};
    /// let mv: Move = "3,0 2,1".parse().unwrap();
    /// assert_eq!(mv, Move::new(Square::new(3, 0), Square::new(2, 1)));
    /// assert!("3 0 2".parse::<Move>().is_err());
    /// assert!("3 -1 2 0".parse::<Move>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((i, _)) = s
            .match_indices('-')
            .find(|(i, _)| !s[..*i].ends_with(|c: char| c.is_ascii_digit()))
        {
            bail!("Invalid Move {s:?}: coordinates cannot be negative (found '-' at position {i})");
        }

        let coords = s
            .split(|c: char| !c.is_ascii_digit())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u8>())
            .collect::<Result<Vec<_>, _>>()?;

        let [from_row, from_col, to_row, to_col] = coords[..] else {
            bail!(
                "Invalid Move {s:?}: expected two coordinate pairs, but found {} numbers",
                coords.len()
            );
        };

        Ok(Self::new(
            Square::from_coords(from_row, from_col)?,
            Square::from_coords(to_row, to_col)?,
        ))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_moves_for_4x4() {
        // 12 horizontal, 12 vertical, 18 diagonal edges
        assert_eq!(MAX_NUM_MOVES, 42);
    }

    #[test]
    fn test_offsets_are_distinct_neighbours() {
        for (i, a) in NEIGHBOR_OFFSETS.iter().enumerate() {
            assert_ne!(*a, (0, 0));
            assert!(a.0.abs() <= 1 && a.1.abs() <= 1);
            assert!(!NEIGHBOR_OFFSETS[i + 1..].contains(a));
        }
    }

    #[test]
    fn test_move_parsing() {
        let expected = Move::new(Square::new(3, 3), Square::new(2, 2));
        for input in ["3 3 2 2", "3,3 2,2", "3,3-2,2", "(3, 3) (2, 2)"] {
            assert_eq!(input.parse::<Move>().unwrap(), expected, "{input:?}");
        }

        assert_eq!(
            expected.to_string().parse::<Move>().unwrap(),
            expected,
            "Display output should parse back"
        );

        assert!("3 3 2 2 1".parse::<Move>().is_err());
        assert!("3 3 4 2".parse::<Move>().is_err());
        assert!("".parse::<Move>().is_err());
    }

    #[test]
    fn test_move_parsing_rejects_negative_coordinates() {
        for input in ["3 -1 2 0", "-3 1 2 0", "3,0 -2,1", "(3, 0) (2, -1)", "3,0--2,1"] {
            assert!(input.parse::<Move>().is_err(), "{input:?}");
        }
    }
}
