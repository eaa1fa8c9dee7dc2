/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, marker::PhantomData, time::Instant};

use anyhow::{bail, Result};
use arrayvec::ArrayVec;

use crate::{Board, Evaluator, Heuristic, LogLevel, LogNone, Move, Score, Side};

/// Maximum depth that can be searched.
pub const MAX_DEPTH: u8 = 32;

/// Depth searched when none is requested.
pub const DEFAULT_DEPTH: u8 = 4;

/// Represents the best sequence of moves found during a search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrincipalVariation(ArrayVec<Move, { MAX_DEPTH as usize }>);

impl PrincipalVariation {
    /// An empty PV.
    const EMPTY: Self = Self(ArrayVec::new_const());

    /// The first move of this line, if any.
    #[inline(always)]
    pub fn first(&self) -> Option<Move> {
        self.0.first().copied()
    }

    /// Number of moves in this line.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if this line has no moves.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An iterator over the moves of this line, in the order they are played.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.0.iter()
    }

    /// Clears the moves of `self`.
    #[inline(always)]
    fn clear(&mut self) {
        self.0.clear();
    }

    /// Replace the contents of `self` with `mv` followed by the contents of `other`.
    ///
    /// Lines longer than [`MAX_DEPTH`] are cut short.
    #[inline(always)]
    fn extend(&mut self, mv: Move, other: &Self) {
        self.clear();
        self.0.push(mv);
        self.0
            .extend(other.0.iter().copied().take(MAX_DEPTH as usize - 1));
    }
}

impl Default for PrincipalVariation {
    #[inline(always)]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for PrincipalVariation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let moves = self.0.iter().map(|mv| mv.to_string()).collect::<Vec<_>>();
        write!(f, "{}", moves.join(" "))
    }
}

/// Bounds within an alpha-beta search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBounds {
    /// Lower bound.
    ///
    /// Blue is guaranteed a score that is AT LEAST `alpha` elsewhere in the tree.
    pub alpha: Score,

    /// Upper bound.
    ///
    /// Red is guaranteed a score that is AT MOST `beta` elsewhere in the tree.
    pub beta: Score,
}

impl SearchBounds {
    /// Create a new [`SearchBounds`] from the provided `alpha` and `beta` values.
    #[inline(always)]
    pub const fn new(alpha: Score, beta: Score) -> Self {
        Self { alpha, beta }
    }
}

impl Default for SearchBounds {
    /// Default [`SearchBounds`] are a `(-infinity, infinity)`.
    #[inline(always)]
    fn default() -> Self {
        Self::new(Score::ALPHA, Score::BETA)
    }
}

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of plies to look ahead.
    pub depth: u8,

    /// Whether to prune with alpha-beta bounds, or walk the full minimax tree.
    pub pruning: bool,
}

impl SearchConfig {
    /// Creates a default config that searches to `depth`.
    ///
    /// Depths greater than [`MAX_DEPTH`] are an error.
    ///
    /// # Example
    /// ```
    /// # use newt::{SearchConfig, MAX_DEPTH};
    /// assert_eq!(SearchConfig::with_depth(3).unwrap().depth, 3);
    /// assert!(SearchConfig::with_depth(MAX_DEPTH + 1).is_err());
    /// ```
    pub fn with_depth(depth: u8) -> Result<Self> {
        if depth > MAX_DEPTH {
            bail!("Maximum search depth is {MAX_DEPTH}, but {depth} was requested");
        }

        Ok(Self {
            depth,
            ..Default::default()
        })
    }
}

impl Default for SearchConfig {
    #[inline(always)]
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            pruning: true,
        }
    }
}

/// The result of a search, containing the best move found, score, and search statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Backed-up value of the root position.
    pub score: Score,

    /// The root board after `bestmove` is made, or the root board itself if there was no move to make.
    pub board: Board,

    /// Best move found during the search.
    pub bestmove: Option<Move>,

    /// Number of nodes searched, including the root.
    pub nodes: u64,

    /// Number of alpha-beta cutoffs.
    pub prunes: u64,

    /// Depth the search was run at.
    pub depth: u8,

    /// Expected line of play from the root.
    pub pv: PrincipalVariation,
}

/// Executes a search on a board to a fixed depth.
///
/// `Log` controls how much is printed while searching, and `E` scores the positions at the bottom of the tree.
/// Each [`Search`] is used for exactly one call to [`Search::start`], so nothing leaks between searches.
pub struct Search<Log, E> {
    /// Number of nodes visited.
    nodes: u64,

    /// Number of cutoffs.
    prunes: u64,

    /// When this search was created.
    starttime: Instant,

    /// Configuration variables for this instance of the search.
    config: SearchConfig,

    /// Scores leaf positions.
    evaluator: E,

    /// Marker for the level of logging to print.
    log: PhantomData<Log>,
}

impl<Log: LogLevel, E: Evaluator> Search<Log, E> {
    /// Construct a new [`Search`] instance to execute.
    #[inline(always)]
    pub fn new(evaluator: E, config: SearchConfig) -> Self {
        Self {
            nodes: 0,
            prunes: 0,
            starttime: Instant::now(),
            config,
            evaluator,
            log: PhantomData,
        }
    }

    /// Start the search on `board` with `side` to move, returning a [`SearchResult`].
    ///
    /// This is the entrypoint of the search.
    /// It runs [`Search::alphabeta`] or [`Search::minimax`], depending on the config, and reports the result.
    pub fn start(mut self, board: &Board, side: Side) -> SearchResult {
        let depth = self.config.depth;
        let maximizing = side.is_maximizing();

        if Log::DEBUG {
            self.send_string(format!(
                "Starting {} search on {:?} for {side:#} at depth {depth}",
                if self.config.pruning { "alpha-beta" } else { "minimax" },
                board.to_notation(),
            ));
        }

        let mut pv = PrincipalVariation::default();
        let score = if self.config.pruning {
            self.alphabeta(board, depth, maximizing, SearchBounds::default(), &mut pv)
        } else {
            self.minimax(board, depth, maximizing, &mut pv)
        };

        let bestmove = pv.first();
        let result = SearchResult {
            score,
            board: bestmove.map_or(*board, |mv| board.with_move_made(mv)),
            bestmove,
            nodes: self.nodes,
            prunes: self.prunes,
            depth,
            pv,
        };

        if Log::INFO {
            self.send_end_of_search_info(&result);
        }

        result
    }

    /// Prints a summary of the conclusion of this search.
    fn send_end_of_search_info(&self, result: &SearchResult) {
        let elapsed = self.starttime.elapsed();

        let mut info = format!(
            "info depth {} nodes {} prunes {} score {} time {}",
            result.depth,
            result.nodes,
            result.prunes,
            result.score,
            elapsed.as_millis(),
        );

        if !result.pv.is_empty() {
            info.push_str(&format!(" pv {}", result.pv));
        }

        println!("{info}");
    }

    /// Prints an `info string` message.
    #[inline(always)]
    fn send_string<T: fmt::Display>(&self, string: T) {
        println!("info string {string}");
    }

    /// Static evaluation of `board`, with the side given by `maximizing` to move.
    #[inline(always)]
    fn eval(&self, board: &Board, maximizing: bool) -> Score {
        self.evaluator.eval(board, Side::from_maximizing(maximizing))
    }

    /// Searches `board` to `depth` with alpha-beta pruning, returning its backed-up value.
    ///
    /// Blue moves when `maximizing` is set, and Red otherwise.
    /// The best line found is written to `pv`.
    ///
    /// Bounds are fail-hard: a node returns the best score it found before cutting off,
    /// which lies at or beyond the bound that caused the cutoff.
    /// Ties keep the earliest child in move generation order.
    pub fn alphabeta(
        &mut self,
        board: &Board,
        depth: u8,
        maximizing: bool,
        mut bounds: SearchBounds,
        pv: &mut PrincipalVariation,
    ) -> Score {
        self.nodes += 1;
        pv.clear();

        if depth == 0 || board.is_terminal() {
            return self.eval(board, maximizing);
        }

        let moves = board.legal_moves(Side::from_maximizing(maximizing));

        // A side that cannot move has not lost; fall back to a static score
        if moves.is_empty() {
            return self.eval(board, maximizing);
        }

        let mut local_pv = PrincipalVariation::default();
        let mut best = if maximizing { Score::ALPHA } else { Score::BETA };

        for (i, mv) in moves.into_iter().enumerate() {
            let child = board.with_move_made(mv);
            let score = self.alphabeta(&child, depth - 1, !maximizing, bounds, &mut local_pv);

            if maximizing {
                if i == 0 || score > best {
                    best = score;
                    pv.extend(mv, &local_pv);
                }

                bounds.alpha = bounds.alpha.max(score);

                if best >= bounds.beta {
                    self.cutoff(depth, mv, best, bounds);
                    return best;
                }
            } else {
                if i == 0 || score < best {
                    best = score;
                    pv.extend(mv, &local_pv);
                }

                bounds.beta = bounds.beta.min(score);

                if best <= bounds.alpha {
                    self.cutoff(depth, mv, best, bounds);
                    return best;
                }
            }
        }

        best
    }

    /// Records a cutoff caused by `mv`.
    #[inline(always)]
    fn cutoff(&mut self, depth: u8, mv: Move, score: Score, bounds: SearchBounds) {
        self.prunes += 1;

        if Log::DEBUG {
            self.send_string(format!(
                "cutoff at depth {depth} after {mv} with score {score} in [{}, {}]",
                bounds.alpha, bounds.beta
            ));
        }
    }

    /// Searches `board` to `depth` without pruning, returning its backed-up value.
    ///
    /// Visits every node of the tree, so it is only practical at small depths.
    /// It always backs up the same value as [`Search::alphabeta`].
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u8,
        maximizing: bool,
        pv: &mut PrincipalVariation,
    ) -> Score {
        self.nodes += 1;
        pv.clear();

        if depth == 0 || board.is_terminal() {
            return self.eval(board, maximizing);
        }

        let moves = board.legal_moves(Side::from_maximizing(maximizing));
        if moves.is_empty() {
            return self.eval(board, maximizing);
        }

        let mut local_pv = PrincipalVariation::default();
        let mut best = if maximizing { Score::ALPHA } else { Score::BETA };

        for (i, mv) in moves.into_iter().enumerate() {
            let child = board.with_move_made(mv);
            let score = self.minimax(&child, depth - 1, !maximizing, &mut local_pv);

            let improves = if maximizing {
                score > best
            } else {
                score < best
            };

            if i == 0 || improves {
                best = score;
                pv.extend(mv, &local_pv);
            }
        }

        best
    }
}

/// Searches `board` to `depth` for the side given by `maximizing`, using the default heuristic.
///
/// This is a pure function of its arguments and prints nothing.
///
/// # Example
/// ```
/// # use newt::{best_move, Board, Move, Square};
/// let board: Board = "4/1BR1/RR1R/BBB1".parse().unwrap();
/// let res = best_move(&board, 1, true);
///
/// assert_eq!(res.bestmove, Some(Move::new(Square::new(1, 1), Square::new(2, 2))));
/// assert_eq!(res.score, 6.0);
/// ```
pub fn best_move(board: &Board, depth: u8, maximizing: bool) -> SearchResult {
    let config = SearchConfig {
        depth,
        ..Default::default()
    };

    Search::<LogNone, _>::new(Heuristic::default(), config)
        .start(board, Side::from_maximizing(maximizing))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{Complex, Simple, Square};

    const SAMPLE: &str = "4/1BR1/RR1R/BBB1";

    fn search<E: Evaluator>(
        board: &Board,
        side: Side,
        depth: u8,
        pruning: bool,
        evaluator: E,
    ) -> SearchResult {
        let config = SearchConfig { depth, pruning };
        Search::<LogNone, E>::new(evaluator, config).start(board, side)
    }

    #[test]
    fn test_depth_zero_is_static_eval() {
        let board: Board = SAMPLE.parse().unwrap();
        let res = search(&board, Side::Blue, 0, true, Simple);

        assert_eq!(res.score, 5.0);
        assert_eq!(res.bestmove, None);
        assert_eq!(res.board, board);
        assert_eq!(res.nodes, 1);
    }

    #[test]
    fn test_terminal_board_is_not_searched() {
        let board: Board = "RRRR/BBBB/4/4".parse().unwrap();
        assert!(board.is_terminal());

        let res = search(&board, Side::Blue, 4, true, Simple);
        assert_eq!(res.score, Simple.eval(&board, Side::Blue));
        assert_eq!(res.bestmove, None);
        assert_eq!(res.nodes, 1);
    }

    #[test]
    fn test_no_moves_is_static_eval() {
        // Blue is boxed into the corner, and nobody has crossed
        let boxed: Board = "BR2/RR2/4/4".parse().unwrap();
        assert!(boxed.legal_moves(Side::Blue).is_empty());
        assert!(!boxed.is_terminal());

        let res = search(&boxed, Side::Blue, 3, true, Simple);
        assert_eq!(res.score, Simple.eval(&boxed, Side::Blue));
        assert_eq!(res.bestmove, None);
        assert!(res.pv.is_empty());
        assert_eq!(res.board, boxed);
        assert_eq!(res.nodes, 1);

        // Red still has moves, and searches normally
        assert!(search(&boxed, Side::Red, 1, true, Simple).bestmove.is_some());
    }

    #[test]
    fn test_sample_depth_one_for_blue() {
        let board: Board = SAMPLE.parse().unwrap();
        let res = search(&board, Side::Blue, 1, true, Simple);

        let expected = Move::new(Square::new(1, 1), Square::new(2, 2));
        assert_eq!(res.bestmove, Some(expected));
        assert_eq!(res.score, 6.0);
        assert_eq!(res.board, board.with_move_made(expected));
        assert_eq!(res.nodes, 1 + 8);
    }

    #[test]
    fn test_startpos_keeps_first_of_equal_moves() {
        let board = Board::startpos();

        // Every Blue move scores 1
        for mv in board.legal_moves(Side::Blue) {
            assert_eq!(Simple.eval(&board.with_move_made(mv), Side::Red), 1.0);
        }

        let res = search(&board, Side::Blue, 1, true, Simple);
        assert_eq!(res.score, 1.0);
        assert_eq!(
            res.bestmove,
            Some(Move::new(Square::new(0, 0), Square::new(1, 1)))
        );
    }

    #[test]
    fn test_startpos_depth_two_prunes() {
        let board = Board::startpos();
        let res = search(&board, Side::Blue, 2, true, Simple);

        assert_eq!(res.score, 0.0);
        assert_eq!(
            res.bestmove,
            Some(Move::new(Square::new(0, 0), Square::new(1, 1)))
        );

        // After the first Blue move, every other Blue move is refuted by Red's first reply.
        assert_eq!(res.prunes, 9);
        assert_eq!(res.nodes, 1 + 10 + 10 + 9);
        assert_eq!(res.pv.len(), 2);
    }

    #[test]
    fn test_minimax_visits_every_node() {
        let board = Board::startpos();
        let res = search(&board, Side::Blue, 2, false, Simple);

        assert_eq!(res.score, 0.0);
        assert_eq!(res.prunes, 0);
        assert_eq!(res.nodes, 1 + 10 + 100);
    }

    #[test]
    fn test_pruning_agrees_with_minimax() {
        let boards = [SAMPLE, "BBBB/4/4/RRRR", "1BBB/B3/3R/RRR1", "2BB/1B1R/BR2/RR2"];

        for notation in boards {
            let board: Board = notation.parse().unwrap();
            for side in Side::all() {
                for depth in 0..=3 {
                    for heuristic in Heuristic::all() {
                        let pruned = search(&board, side, depth, true, heuristic);
                        let full = search(&board, side, depth, false, heuristic);

                        assert_eq!(
                            pruned.score, full.score,
                            "{notation} {side} depth {depth} {heuristic}"
                        );
                        assert_eq!(
                            pruned.bestmove, full.bestmove,
                            "{notation} {side} depth {depth} {heuristic}"
                        );
                        assert!(pruned.nodes <= full.nodes);
                    }
                }
            }
        }
    }

    #[test]
    fn test_complex_heuristic_searches() {
        let board = Board::startpos();
        let res = search(&board, Side::Red, 2, true, Complex);

        assert!(res.bestmove.is_some());
        assert!(res.score.inner().is_finite());
    }

    #[test]
    fn test_searches_are_independent() {
        let board: Board = SAMPLE.parse().unwrap();
        let first = best_move(&board, 3, false);
        let second = best_move(&board, 3, false);
        assert_eq!(first, second);
    }

    #[test]
    fn test_pv_starts_with_bestmove() {
        let board: Board = SAMPLE.parse().unwrap();
        let res = search(&board, Side::Red, 3, true, Simple);

        assert_eq!(res.pv.first(), res.bestmove);
        assert!(res.pv.len() <= 3);

        // The PV is playable
        let mut side = Side::Red;
        let mut played = board;
        for &mv in res.pv.iter() {
            assert!(played.is_legal(mv, side), "{mv} for {side}");
            played.make_move(mv);
            side = side.opponent();
        }
    }
}
