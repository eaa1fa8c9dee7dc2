/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::Game;

/// Perform a perft at the specified depth, collecting only data about the number of possible positions (nodes).
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
///
/// Finished games are *not* treated specially: the move tree keeps growing past a crossed board,
/// which makes this a test of move generation alone.
#[inline(always)]
pub fn perft(game: &Game, depth: usize) -> u64 {
    perft_generic::<true, false>(game, depth)
}

/// Perform a splitperft at the specified depth, printing the number of nodes reachable after each move available at the root node.
#[inline(always)]
pub fn splitperft(game: &Game, depth: usize) -> u64 {
    perft_generic::<true, true>(game, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, this will perform a splitperft.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(game: &Game, depth: usize) -> u64 {
    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if BULK && !SPLIT && depth == 1 {
        return game.get_legal_moves().len() as u64;
    }
    // Recursion limit; return 1, since we're fathoming this node.
    else if depth == 0 {
        return 1;
    }

    game.get_legal_moves().into_iter().fold(0, |nodes, mv| {
        let new_nodes = perft_generic::<BULK, false>(&game.with_move_made(mv), depth - 1);

        if SPLIT {
            println!("{mv}\t{new_nodes}");
        }

        nodes + new_nodes
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_matches_full_count() {
        let game: Game = "4/1BR1/RR1R/BBB1 b".parse().unwrap();
        for depth in 0..=4 {
            assert_eq!(
                perft_generic::<true, false>(&game, depth),
                perft_generic::<false, false>(&game, depth),
                "depth {depth}"
            );
        }
    }

    #[test]
    fn test_split_matches_perft() {
        let game = Game::default();
        assert_eq!(splitperft(&game, 3), perft(&game, 3));
    }
}
