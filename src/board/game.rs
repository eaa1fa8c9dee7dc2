/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref, str::FromStr};

use anyhow::{bail, Context, Result};

use super::{Board, Move, MoveList, Side, Square};

/// Notation of the starting position, including the side to move.
pub const NOTATION_STARTPOS: &str = "BBBB/4/4/RRRR r";

/// A game in progress: a [`Board`] and the [`Side`] whose turn it is.
///
/// This is the type the engine's command loop works with.
/// The board-level operations are available through [`Deref`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Game {
    /// Current layout of the pieces.
    board: Board,

    /// The side that will make the next move.
    side_to_move: Side,
}

impl Game {
    /// Creates a new [`Game`] from a board and the side to move on it.
    #[inline(always)]
    pub const fn new(board: Board, side_to_move: Side) -> Self {
        Self {
            board,
            side_to_move,
        }
    }

    /// Parses a [`Game`] from notation: a board, optionally followed by whitespace and the side to move (`b` or `r`).
    ///
    /// If the side to move is omitted, it is Red.
    ///
    /// # Example
    /// ```
    /// # use newt::{Game, Side};
    /// let game = Game::from_notation("4/1BR1/RR1R/BBB1 b").unwrap();
    /// assert_eq!(game.side_to_move(), Side::Blue);
    ///
    /// assert!(Game::from_notation("4/1BR1/RR1R/BBB1 x").is_err());
    /// ```
    pub fn from_notation(notation: &str) -> Result<Self> {
        let mut parts = notation.split_ascii_whitespace();

        let Some(board) = parts.next() else {
            bail!("Invalid game notation {notation:?}: missing board");
        };
        let board = board.parse()?;

        let side_to_move = match parts.next() {
            Some(side) => side
                .parse()
                .with_context(|| format!("Invalid side to move in {notation:?}"))?,
            None => Side::default(),
        };

        if let Some(extra) = parts.next() {
            bail!("Invalid game notation {notation:?}: unexpected trailing {extra:?}");
        }

        Ok(Self::new(board, side_to_move))
    }

    /// Generates the notation of this game, including the side to move.
    ///
    /// # Example
    /// ```
    /// # use newt::{Game, NOTATION_STARTPOS};
    /// assert_eq!(Game::default().to_notation(), NOTATION_STARTPOS);
    /// ```
    pub fn to_notation(&self) -> String {
        format!("{} {}", self.board.to_notation(), self.side_to_move)
    }

    /// The current board.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The side whose turn it is.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// Passes the turn to the other side without moving.
    #[inline(always)]
    pub fn toggle_side_to_move(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// All legal moves for the side to move.
    #[inline(always)]
    pub fn get_legal_moves(&self) -> MoveList {
        self.board.legal_moves(self.side_to_move)
    }

    /// Legal moves for the piece on `square`, if it belongs to the side to move.
    pub fn get_legal_moves_from(&self, square: Square) -> MoveList {
        if self.board.cell_at(square).is(self.side_to_move) {
            self.board.legal_moves_from(square)
        } else {
            MoveList::new()
        }
    }

    /// Applies `mv` and passes the turn.
    ///
    /// No checks are made on the legality of `mv`; see [`Game::validate_move`].
    #[inline(always)]
    pub fn make_move(&mut self, mv: Move) {
        self.board.make_move(mv);
        self.toggle_side_to_move();
    }

    /// Copies this game and applies `mv` to the copy.
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut copied = *self;
        copied.make_move(mv);
        copied
    }

    /// Checks that moving the piece on `from` to `to` is legal for the side to move.
    ///
    /// On success, the [`Move`] is returned. Otherwise the error explains which rule was broken.
    ///
    /// # Example
    /// ```
    /// # use newt::{Game, Square};
    /// let game = Game::default();
    /// assert!(game.validate_move(Square::new(3, 0), Square::new(2, 1)).is_ok());
    ///
    /// // Blue's piece, but it's Red's turn
    /// assert!(game.validate_move(Square::new(0, 0), Square::new(1, 0)).is_err());
    ///
    /// // Not adjacent
    /// assert!(game.validate_move(Square::new(3, 0), Square::new(1, 0)).is_err());
    /// ```
    pub fn validate_move(&self, from: Square, to: Square) -> Result<Move> {
        let side = self.side_to_move;

        match self.board.side_at(from) {
            Some(owner) if owner == side => {}
            Some(owner) => bail!("the piece on {from} belongs to {owner:#}, but it is {side:#}'s turn"),
            None => bail!("there is no piece on {from}"),
        }

        if !from.is_adjacent(to) {
            bail!("{to} is not next to {from}");
        }

        if let Some(owner) = self.board.side_at(to) {
            bail!("{to} is already occupied by {owner:#}");
        }

        Ok(Move::new(from, to))
    }

    /// Returns `true` if either side has crossed the board.
    #[inline(always)]
    pub fn is_over(&self) -> bool {
        self.board.is_terminal()
    }

    /// Places a piece of `side` on `square`.
    #[inline(always)]
    pub fn place(&mut self, side: Side, square: Square) {
        self.board.place(side, square);
    }

    /// Removes and returns the piece on `square`, if one exists.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Side> {
        self.board.take(square)
    }
}

impl Deref for Game {
    type Target = Board;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

impl Default for Game {
    /// The standard starting position, with Red to move.
    #[inline(always)]
    fn default() -> Self {
        Self::new(Board::startpos(), Side::default())
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_notation(s)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        writeln!(f)?;
        writeln!(f, "Notation: {}", self.to_notation())?;

        match self.board.winner() {
            Some(winner) => write!(f, "Game over: {winner:#} has crossed the board"),
            None => write!(f, "{:#} to move", self.side_to_move),
        }
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation())
    }
}
