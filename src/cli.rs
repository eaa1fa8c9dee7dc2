/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::{builder::BoolishValueParser, error::ErrorKind, ArgAction, Parser};

use crate::{Move, Side, Square};

/// A command to be sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<ENGINE COMMAND> | <FROM> <TO>")
)]
pub enum EngineCommand {
    /// Run a benchmark with the provided parameters.
    Bench {
        /// If set, the benchmarking results will be printed in a well-formatted table.
        #[arg(short, long, default_value = "false")]
        pretty: bool,

        /// Override the default benchmark depth.
        #[arg(short, long, required = false)]
        depth: Option<u8>,
    },

    /// Turn debug output on or off.
    Debug {
        /// `on` or `off`.
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        status: bool,
    },

    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Print an evaluation of the current position.
    Eval {
        /// If set, every heuristic is printed for both sides.
        #[arg(short, long, default_value = "false")]
        pretty: bool,
    },

    /// Quit the engine.
    #[command(alias = "quit")]
    Exit,

    /// Flips the side-to-move. Equivalent to passing.
    Flip,

    /// Search the current position and play the best move found.
    Go {
        /// Override the configured search depth.
        #[arg(short, long, required = false)]
        depth: Option<u8>,
    },

    /// Play a move for the side to move, if it is legal.
    ///
    /// If auto-reply is enabled, the engine answers with a move of its own.
    /// A bare line of four numbers, like `3 0 2 1`, is also accepted as a move.
    #[command(name = "move", alias = "m")]
    MakeMove { from: Square, to: Square },

    /// Shows all legal moves in the current position, or for a specific piece.
    Moves {
        square: Option<Square>,

        /// If set, moves will be sorted by source and destination.
        ///
        /// By default, moves are listed in the order they are generated.
        #[arg(short, long, default_value = "false")]
        sort: bool,
    },

    /// Reset the board to the starting position.
    #[command(alias = "new")]
    NewGame,

    /// Display the current value of the specified option, or of all options.
    Option { name: Option<String> },

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Place a piece on the provided square.
    Place { side: Side, square: Square },

    /// Set the board from notation, like `BBBB/4/4/RRRR`, optionally followed by the side to move.
    #[command(alias = "pos")]
    Position { board: String, side: Option<Side> },

    /// Set the value of an option.
    SetOption { name: String, value: String },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Remove the piece at the provided square.
    Take { square: Square },
}

impl FromStr for EngineCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`EngineCommand`] from a string.
    ///
    /// If this fails, it will attempt to parse the string as a bare [`Move`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::try_parse_from(s.split_ascii_whitespace()) {
            Ok(cmd) => Ok(cmd),
            Err(e) => {
                // Only lines starting with a number look like bare moves
                if !s.trim_start().starts_with(|c: char| c.is_ascii_digit() || c == '(') {
                    return Err(e);
                }

                match s.parse::<Move>() {
                    Ok(mv) => Ok(Self::MakeMove {
                        from: mv.from,
                        to: mv.to,
                    }),
                    Err(mv_err) => Err(clap::Error::raw(
                        ErrorKind::InvalidValue,
                        format!("Invalid move: {mv_err:#}. Try again.\n"),
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("d".parse::<EngineCommand>().unwrap(), EngineCommand::Display);
        assert_eq!("quit".parse::<EngineCommand>().unwrap(), EngineCommand::Exit);
        assert_eq!(
            "go -d 3".parse::<EngineCommand>().unwrap(),
            EngineCommand::Go { depth: Some(3) }
        );
        assert_eq!(
            "setoption Heuristic complex".parse::<EngineCommand>().unwrap(),
            EngineCommand::SetOption {
                name: String::from("Heuristic"),
                value: String::from("complex")
            }
        );
        assert_eq!(
            "place b 1,1".parse::<EngineCommand>().unwrap(),
            EngineCommand::Place {
                side: Side::Blue,
                square: sq(1, 1)
            }
        );
        assert_eq!(
            "debug on".parse::<EngineCommand>().unwrap(),
            EngineCommand::Debug { status: true }
        );
    }

    #[test]
    fn test_parse_moves() {
        let expected = EngineCommand::MakeMove {
            from: sq(3, 0),
            to: sq(2, 1),
        };

        assert_eq!("move 3,0 2,1".parse::<EngineCommand>().unwrap(), expected);
        assert_eq!("m 30 21".parse::<EngineCommand>().unwrap(), expected);
        assert_eq!("3 0 2 1".parse::<EngineCommand>().unwrap(), expected);
        assert_eq!("3,0 2,1".parse::<EngineCommand>().unwrap(), expected);
        assert_eq!("(3, 0) (2, 1)".parse::<EngineCommand>().unwrap(), expected);
    }

    #[test]
    fn test_parse_errors() {
        assert!("fly me to the moon".parse::<EngineCommand>().is_err());
        assert!("go -d -1".parse::<EngineCommand>().is_err());
        assert!("go -d deep".parse::<EngineCommand>().is_err());
        assert!("3 0 2".parse::<EngineCommand>().is_err());
        assert!("3 -1 2 0".parse::<EngineCommand>().is_err());
        assert!("move 3,-1 2,0".parse::<EngineCommand>().is_err());

        let err = "9 0 8 0".parse::<EngineCommand>().unwrap_err();
        assert!(err.to_string().contains("Invalid move"));
    }
}
