/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Boards searched by the `bench` command, each with its side to move.
pub const BENCHMARK_BOARDS: [&str; 8] = [
    "BBBB/4/4/RRRR r",
    "BBBB/4/4/RRRR b",
    "4/1BR1/RR1R/BBB1 b",
    "4/1BR1/RR1R/BBB1 r",
    "1BBB/B3/3R/RRR1 r",
    "B1B1/1B1B/R1R1/1R1R b",
    "2BB/1B1R/BR2/RR2 r",
    "4/BBRR/RRBB/4 b",
];

/// Compile-time level of logging performed by a search.
///
/// Each level implies the ones below it.
pub trait LogLevel {
    /// Print everything, including each cutoff.
    const DEBUG: bool = false;

    /// Print a summary line once the search ends.
    const INFO: bool = false;
}

/// Print nothing.
#[derive(Debug, Clone, Copy)]
pub struct LogNone;
impl LogLevel for LogNone {}

/// Print the end-of-search summary.
#[derive(Debug, Clone, Copy)]
pub struct LogInfo;
impl LogLevel for LogInfo {
    const INFO: bool = true;
}

/// Print all available information.
#[derive(Debug, Clone, Copy)]
pub struct LogDebug;
impl LogLevel for LogDebug {
    const DEBUG: bool = true;
    const INFO: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Game;

    #[test]
    fn test_benchmark_boards_parse() {
        for notation in BENCHMARK_BOARDS {
            let game: Game = notation.parse().unwrap();
            assert_eq!(game.count(crate::Side::Blue), 4, "{notation}");
            assert_eq!(game.count(crate::Side::Red), 4, "{notation}");
        }
    }
}
