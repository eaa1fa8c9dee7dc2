/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use clap::{builder::PossibleValue, ValueEnum};

use crate::{Board, Score, Side, BOARD_SIZE, PIECES_PER_SIDE};

/// Largest value the simple heuristic can start from: every piece of both sides a full board away from crossing.
const SIMPLE_BASE: i32 = (PIECES_PER_SIDE * (BOARD_SIZE - 1)) as i32;

/// Weight of the simple score when Blue is to move, as a divisor.
const BLUE_PROGRESS_WEIGHT: f64 = 0.4;

/// Weight of the simple score when Red is to move.
const RED_PROGRESS_WEIGHT: f64 = 0.4;

/// Weight of the opponent's mobility towards its goal.
const MOBILITY_WEIGHT: f64 = 0.6;

/// Encapsulates the logic of scoring a position.
///
/// Scores are always from Blue's perspective, since Blue is the maximizing side:
/// a high score is good for Blue and a low score is good for Red.
/// `side` is the side to move on `board`. Some heuristics ignore it.
pub trait Evaluator {
    /// Statically scores `board` with `side` to move.
    fn eval(&self, board: &Board, side: Side) -> Score;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    #[inline(always)]
    fn eval(&self, board: &Board, side: Side) -> Score {
        (**self).eval(board, side)
    }
}

/// Scores a board by how far each side's pieces have travelled.
///
/// Every Blue piece subtracts its remaining distance to row `N-1`, and every Red piece subtracts the distance it has already covered.
/// The result rises as Blue advances and falls as Red advances.
/// The starting position scores 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Simple;

impl Simple {
    /// The simple score of `board`, as an integer.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Simple};
    /// assert_eq!(Simple::score(&Board::startpos()), 0);
    ///
    /// let board: Board = "4/1BR1/RR1R/BBB1".parse().unwrap();
    /// assert_eq!(Simple::score(&board), 5);
    /// ```
    pub fn score(board: &Board) -> i32 {
        let last_row = (BOARD_SIZE - 1) as i32;

        board.pieces().fold(SIMPLE_BASE, |score, (square, _)| {
            score - (last_row - square.row() as i32)
        })
    }
}

impl Evaluator for Simple {
    #[inline(always)]
    fn eval(&self, board: &Board, _side: Side) -> Score {
        Score::from(Self::score(board))
    }
}

/// Blends the simple score with how many ways the opponent can advance.
///
/// Let `h` be the simple score and `a` the number of advancing moves available to the opponent of the side to move.
/// With Blue to move, a non-zero `h` scores `1 / (h / 0.4 + 0.6a)` and a zero `h` scores `a / 0.6`.
/// With Red to move, the score is `-1 / (0.4h + 0.6a)`.
/// Whenever the denominator is exactly 0, the score is 0.
///
/// The result is unbounded, so callers must tolerate large magnitudes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Complex;

impl Complex {
    /// The complex score for a simple score of `h` when the opponent of `side` has `advancing` advancing moves.
    ///
    /// # Example
    /// ```
    /// # use newt::{Complex, Side};
    /// assert_eq!(Complex::score(0, 10, Side::Blue), 10.0 / 0.6);
    /// assert_eq!(Complex::score(0, 10, Side::Red), -1.0 / 6.0);
    /// assert_eq!(Complex::score(0, 0, Side::Red), 0.0);
    /// ```
    pub fn score(h: i32, advancing: usize, side: Side) -> f64 {
        let a = advancing as i32;

        // Denominators are tested for 0 on the integers: `h / 0.4 + 0.6a` is 0 iff `25h + 6a` is, and `0.4h + 0.6a` iff `2h + 3a`
        match side {
            Side::Blue if h == 0 => mobility_only(advancing),
            Side::Blue if 25 * h + 6 * a == 0 => 0.0,
            Side::Blue => 1.0 / (h as f64 / BLUE_PROGRESS_WEIGHT + MOBILITY_WEIGHT * a as f64),
            Side::Red if 2 * h + 3 * a == 0 => 0.0,
            Side::Red => -1.0 / (RED_PROGRESS_WEIGHT * h as f64 + MOBILITY_WEIGHT * a as f64),
        }
    }
}

impl Evaluator for Complex {
    fn eval(&self, board: &Board, side: Side) -> Score {
        let h = Simple::score(board);
        let advancing = board.advancing_moves(side.opponent()).count();

        Score::new(Self::score(h, advancing, side))
    }
}

/// `a / 0.6`, which is 0 when `a` is 0.
#[inline(always)]
fn mobility_only(advancing: usize) -> f64 {
    advancing as f64 / MOBILITY_WEIGHT
}

/// The heuristics a search can be configured with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// See [`Simple`].
    #[default]
    Simple,

    /// See [`Complex`].
    Complex,
}

impl Heuristic {
    /// All available heuristics.
    #[inline(always)]
    pub const fn all() -> [Self; 2] {
        [Self::Simple, Self::Complex]
    }

    /// Lowercase name of this heuristic.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Complex => "complex",
        }
    }
}

impl Evaluator for Heuristic {
    #[inline(always)]
    fn eval(&self, board: &Board, side: Side) -> Score {
        match self {
            Self::Simple => Simple.eval(board, side),
            Self::Complex => Complex.eval(board, side),
        }
    }
}

impl ValueEnum for Heuristic {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Simple, Self::Complex]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = PossibleValue::new(self.name());

        // The heuristics are also known by their number
        let value = match self {
            Self::Simple => value.alias("1"),
            Self::Complex => value.alias("2"),
        };

        Some(value)
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
