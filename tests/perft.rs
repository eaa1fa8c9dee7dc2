/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use newt::{perft, perft_generic, Game};

fn test_perft_nodes(depth: usize, notation: &str, expected: u64) {
    let game: Game = notation.parse().unwrap();
    let res = perft_generic::<false, false>(&game, depth);
    assert_eq!(res, expected, "PERFT({depth}) failed on {notation}");

    let bulk = perft(&game, depth);
    assert_eq!(bulk, expected, "bulk PERFT({depth}) failed on {notation}");
}

#[cfg(test)]
mod startpos_perft {
    use super::*;

    const STARTPOS: &str = "BBBB/4/4/RRRR r";

    #[test]
    fn test_startpos_perft_0() {
        test_perft_nodes(0, STARTPOS, 1);
    }
    #[test]
    fn test_startpos_perft_1() {
        test_perft_nodes(1, STARTPOS, 10);
    }
    #[test]
    fn test_startpos_perft_2() {
        test_perft_nodes(2, STARTPOS, 100);
    }
    #[test]
    fn test_startpos_perft_3() {
        test_perft_nodes(3, STARTPOS, 1192);
    }
    #[test]
    fn test_startpos_perft_4() {
        test_perft_nodes(4, STARTPOS, 13524);
    }
    #[test]
    fn test_startpos_perft_5() {
        test_perft_nodes(5, STARTPOS, 161386);
    }
}

#[cfg(test)]
mod midgame_perft {
    use super::*;

    const BLUE_TO_MOVE: &str = "4/1BR1/RR1R/BBB1 b";
    const RED_TO_MOVE: &str = "4/1BR1/RR1R/BBB1 r";

    #[test]
    fn test_midgame_blue_perft_1() {
        test_perft_nodes(1, BLUE_TO_MOVE, 8);
    }
    #[test]
    fn test_midgame_blue_perft_2() {
        test_perft_nodes(2, BLUE_TO_MOVE, 95);
    }
    #[test]
    fn test_midgame_blue_perft_3() {
        test_perft_nodes(3, BLUE_TO_MOVE, 729);
    }
    #[test]
    fn test_midgame_blue_perft_4() {
        test_perft_nodes(4, BLUE_TO_MOVE, 9167);
    }
    #[test]
    fn test_midgame_blue_perft_5() {
        test_perft_nodes(5, BLUE_TO_MOVE, 81510);
    }

    #[test]
    fn test_midgame_red_perft_1() {
        test_perft_nodes(1, RED_TO_MOVE, 11);
    }
    #[test]
    fn test_midgame_red_perft_2() {
        test_perft_nodes(2, RED_TO_MOVE, 93);
    }
    #[test]
    fn test_midgame_red_perft_3() {
        test_perft_nodes(3, RED_TO_MOVE, 1141);
    }
    #[test]
    fn test_midgame_red_perft_4() {
        test_perft_nodes(4, RED_TO_MOVE, 9397);
    }
    #[test]
    fn test_midgame_red_perft_5() {
        test_perft_nodes(5, RED_TO_MOVE, 116059);
    }
}

#[cfg(test)]
mod stuck_perft {
    use super::*;

    #[test]
    fn test_no_moves_perft() {
        for depth in 1..=3 {
            test_perft_nodes(depth, "BR2/RR2/4/4 b", 0);
        }
        test_perft_nodes(0, "BR2/RR2/4/4 b", 1);
    }
}
