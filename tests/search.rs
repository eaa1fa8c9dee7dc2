/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use newt::{
    best_move, Board, Complex, Evaluator, Game, LogNone, Move, Search, SearchConfig, Side, Simple,
    Square, BENCHMARK_BOARDS,
};

fn sq(row: u8, col: u8) -> Square {
    Square::new(row, col)
}

/// Sum of the row indices of `side`'s pieces.
fn row_sum(board: &Board, side: Side) -> u32 {
    board.pieces_of(side).map(|sq| sq.row() as u32).sum()
}

fn ensure_pruning_agrees<E: Evaluator + Copy>(evaluator: E, max_depth: u8) {
    for notation in BENCHMARK_BOARDS {
        let game: Game = notation.parse().unwrap();

        for depth in 0..=max_depth {
            let config = SearchConfig {
                depth,
                pruning: true,
            };
            let pruned = Search::<LogNone, E>::new(evaluator, config)
                .start(game.board(), game.side_to_move());
            let config = SearchConfig {
                depth,
                pruning: false,
            };
            let full = Search::<LogNone, E>::new(evaluator, config)
                .start(game.board(), game.side_to_move());

            assert_eq!(pruned.score, full.score, "{notation} at depth {depth}");
            assert_eq!(pruned.bestmove, full.bestmove, "{notation} at depth {depth}");
            assert!(pruned.nodes <= full.nodes, "{notation} at depth {depth}");
        }
    }
}

#[test]
fn test_simple_pruning_agrees_with_minimax() {
    ensure_pruning_agrees(Simple, 4);
}

#[test]
fn test_complex_pruning_agrees_with_minimax() {
    ensure_pruning_agrees(Complex, 4);
}

#[test]
fn test_sample_board_depth_one() {
    let board: Board = "..../.BR./RR.R/BBB.".parse().unwrap();
    assert_eq!(board.legal_moves(Side::Blue).len(), 8);
    assert_eq!(board.legal_moves(Side::Red).len(), 11);

    let res = best_move(&board, 1, true);
    assert_eq!(res.bestmove, Some(Move::new(sq(1, 1), sq(2, 2))));
    assert_eq!(res.score, 6.0);
}

#[test]
fn test_blue_advances_from_startpos() {
    let board = Board::startpos();
    let res = best_move(&board, 2, true);

    assert_eq!(res.score, 0.0);
    assert_eq!(res.bestmove, Some(Move::new(sq(0, 0), sq(1, 1))));
    assert!(res.prunes > 0);
    assert!(row_sum(&res.board, Side::Blue) > row_sum(&board, Side::Blue));
}

#[test]
fn test_self_play_conserves_pieces() {
    let mut game = Game::default();

    for _ in 0..40 {
        if game.is_over() {
            break;
        }

        let res = best_move(game.board(), 3, game.side_to_move().is_maximizing());
        match res.bestmove {
            Some(mv) => {
                assert!(game.is_legal(mv, game.side_to_move()));
                game.make_move(mv);
                assert_eq!(*game.board(), res.board);
            }
            None => game.toggle_side_to_move(),
        }

        assert_eq!(game.count(Side::Blue), 4);
        assert_eq!(game.count(Side::Red), 4);
        assert_eq!(game.count_empty(), 8);
    }
}
