/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Number of rows (and columns) on the board.
pub const BOARD_SIZE: usize = 4;

/// Number of pieces each side starts with: one full row.
pub const PIECES_PER_SIDE: usize = BOARD_SIZE;
