/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// A game in progress, pairing a board with its side to move.
mod game;

/// Moves, move lists, and the order moves are generated in.
mod moves;

/// Node counting over the move tree, for testing move generation.
mod perft;

/// The board: cells, move generation, terminal detection, notation.
mod position;

/// Sides, cells, and squares.
mod square;

/// Board dimensions.
mod utils;

pub use game::*;
pub use moves::*;
pub use perft::*;
pub use position::*;
pub use square::*;
pub use utils::*;
