/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    io::{self, Write},
    sync::mpsc::{channel, Receiver, Sender},
    thread,
    time::Instant,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;

use crate::{
    perft, splitperft, Board, EngineCommand, Evaluator, Game, Heuristic, LogDebug, LogInfo,
    LogLevel, LogNone, Score, Search, SearchConfig, SearchResult, Side, Simple, Square,
    BENCHMARK_BOARDS, MAX_DEPTH,
};

/// Default depth at which to run the benchmark searches.
const BENCH_DEPTH: u8 = 6;

/// The Newt engine.
///
/// Holds a [`Game`] and plays it, either move-by-move on command or as an opponent to a human.
#[derive(Debug)]
pub struct Engine {
    /// The current state of the game, as known to the engine.
    ///
    /// This is modified whenever moves are played or new positions are given,
    /// and is reset whenever the engine is told to start a new game.
    game: Game,

    /// One half of a channel, responsible for sending commands to the engine to execute.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands for the engine to execute.
    receiver: Receiver<EngineCommand>,

    /// Depth and pruning of every search the engine starts.
    config: SearchConfig,

    /// Heuristic used to score leaf positions.
    heuristic: Heuristic,

    /// Whether the engine answers every move made with the `move` command.
    auto_reply: bool,

    /// Whether to print debug information.
    debug: bool,
}

impl Engine {
    /// Constructs a new [`Engine`] instance to be executed with [`Engine::run`].
    pub fn new() -> Self {
        let (sender, receiver) = channel();

        Self {
            game: Game::default(),
            sender,
            receiver,
            config: SearchConfig::default(),
            heuristic: Heuristic::default(),
            auto_reply: true,
            debug: false,
        }
    }

    /// Returns a string of the engine's name and current version.
    #[inline(always)]
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Returns a string of all authors of this engine.
    #[inline(always)]
    pub fn authors(&self) -> String {
        // Split multiple authors by comma-space
        env!("CARGO_PKG_AUTHORS").replace(':', ", ")
    }

    /// The game the engine is currently playing.
    #[inline(always)]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Sends an [`EngineCommand`] to the engine to be executed.
    pub fn send_command(&self, command: EngineCommand) -> Result<()> {
        self.sender
            .send(command)
            .context("Failed to send a command to the engine")
    }

    /// Entrypoint of the engine.
    ///
    /// This function first spawns a new thread that handles user input from `stdin`.
    /// It then loops on commands received by the engine, executing them in the order received,
    /// until it receives [`EngineCommand::Exit`] or input runs out.
    pub fn run(&mut self) {
        println!("{} by {}", self.name(), self.authors());
        println!("Enter moves as `<FROM> <TO>`, like `3,0 2,1`, or type `help` for all commands");

        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("Input handler thread stopping after fatal error: {err:#}");
            }
        });

        // Execute commands as they are received
        while let Ok(cmd) = self.receiver.recv() {
            if matches!(cmd, EngineCommand::Exit) {
                break;
            }

            // Keep running, even on error
            if let Err(e) = self.execute(cmd) {
                eprintln!("Error: {e:#}");
            }
        }
    }

    /// Executes a single [`EngineCommand`].
    ///
    /// [`EngineCommand::Exit`] does nothing here, since exiting is up to the caller.
    pub fn execute(&mut self, cmd: EngineCommand) -> Result<()> {
        match cmd {
            EngineCommand::Bench { depth, pretty } => self.bench(depth, pretty)?,

            EngineCommand::Debug { status } => {
                self.debug = status;
                if self.debug {
                    send_string("Debug mode enabled");
                }
            }

            EngineCommand::Display => println!("{}", self.game),

            EngineCommand::Eval { pretty } => self.eval(pretty),

            EngineCommand::Exit => {}

            EngineCommand::Flip => self.game.toggle_side_to_move(),

            EngineCommand::Go { depth } => _ = self.go(depth)?,

            EngineCommand::MakeMove { from, to } => self.make_move(from, to)?,

            EngineCommand::Moves { square, sort } => self.moves(square, sort),

            EngineCommand::NewGame => self.new_game(),

            EngineCommand::Option { name } => match name {
                Some(name) => match self.get_option(&name) {
                    Some(value) => println!("Option {name:?} := {value}"),
                    None => println!("{} has no option {name:?}", self.name()),
                },
                None => {
                    for (name, value) in self.options() {
                        println!("Option {name:?} := {value}");
                    }
                }
            },

            EngineCommand::Perft { depth } => println!("{}", perft(&self.game, depth)),

            EngineCommand::Place { side, square } => {
                self.game.place(side, square);
                if self.debug {
                    send_string(format!("Placed {side:#} at {square}"));
                }
            }

            EngineCommand::Position { board, side } => self.position(&board, side)?,

            EngineCommand::SetOption { name, value } => self.set_option(&name, &value)?,

            EngineCommand::Splitperft { depth } => {
                println!("{}", splitperft(&self.game, depth))
            }

            EngineCommand::Take { square } => {
                if let Some(side) = self.game.take(square) {
                    if self.debug {
                        send_string(format!("Removed {side:#} at {square}"));
                    }
                }
            }
        };

        Ok(())
    }

    /// Executes the `move` command, playing a human's move.
    ///
    /// An illegal move is reported and the game is left untouched, so the player can try again.
    /// Otherwise, if auto-reply is on and the game isn't over, the engine answers with [`Engine::go`].
    fn make_move(&mut self, from: Square, to: Square) -> Result<()> {
        if let Some(winner) = self.game.winner() {
            println!("Game over: {winner:#} has crossed the board. Start a new one with `newgame`");
            return Ok(());
        }

        let mv = match self.game.validate_move(from, to) {
            Ok(mv) => mv,
            Err(e) => {
                println!("Invalid move: {e:#}. Try again.");
                return Ok(());
            }
        };

        self.game.make_move(mv);

        if self.auto_reply && !self.game.is_over() {
            self.go(None)?;
        } else {
            println!("{}", self.game);
        }

        Ok(())
    }

    /// Executes the `go` command, searching the current position and playing the best move found.
    ///
    /// If the side to move has no legal moves, it passes.
    pub fn go(&mut self, depth: Option<u8>) -> Result<SearchResult> {
        let config = match depth {
            Some(depth) => SearchConfig {
                pruning: self.config.pruning,
                ..SearchConfig::with_depth(depth)?
            },
            None => self.config,
        };

        let side = self.game.side_to_move();
        let res = if self.debug {
            self.search::<LogDebug>(config)
        } else {
            self.search::<LogInfo>(config)
        };

        match res.bestmove {
            Some(mv) => {
                println!("bestmove {mv}");
                self.game.make_move(mv);
            }
            None if self.game.is_over() => println!("bestmove (none)"),
            None => {
                println!("bestmove (none)");
                println!("{side:#} has no legal moves and passes");
                self.game.toggle_side_to_move();
            }
        }

        println!("{}", self.game);
        println!("Prunes: {}", res.prunes);

        Ok(res)
    }

    /// Runs a search on the current position with the engine's heuristic.
    #[inline(always)]
    fn search<Log: LogLevel>(&self, config: SearchConfig) -> SearchResult {
        Search::<Log, _>::new(self.heuristic, config)
            .start(self.game.board(), self.game.side_to_move())
    }

    /// Execute the `bench` command, running a benchmark of a fixed search on a series of positions and displaying the results.
    fn bench(&mut self, depth: Option<u8>, pretty: bool) -> Result<()> {
        // Set up the benchmarking config
        let config = SearchConfig {
            pruning: self.config.pruning,
            ..SearchConfig::with_depth(depth.unwrap_or(BENCH_DEPTH))?
        };

        let benches = BENCHMARK_BOARDS;
        let mut nodes = 0;
        let mut prunes = 0;

        // Padding for printing boards
        let width = benches.iter().map(|b| b.len()).max().unwrap_or_default();

        println!(
            "Running fixed-depth search (d={}) on {} positions",
            config.depth,
            benches.len()
        );

        let starttime = Instant::now();

        // Run a fixed search on each position
        for (i, notation) in benches.into_iter().enumerate() {
            print!("{:>2}/{:>2}: {notation:<width$} := ", i + 1, benches.len());
            // flush stdout so the node count will appear on the same line after search concludes
            io::stdout().lock().flush()?;

            let game: Game = notation.parse()?;
            let res = Search::<LogNone, _>::new(self.heuristic, config)
                .start(game.board(), game.side_to_move());

            nodes += res.nodes;
            prunes += res.prunes;
            println!("{}", res.nodes);
        }

        // Compute results
        let elapsed = starttime.elapsed();
        let nps = (nodes as f32 / elapsed.as_secs_f32()) as u64;
        let m_nps = nodes as f32 / elapsed.as_secs_f32() / 1_000_000.0;
        let ms = elapsed.as_millis();

        if pretty {
            // Display the results in a nice table
            println!();
            println!("+-- Benchmark Complete --+");
            println!("| time (ms)  {ms:<12}|");
            println!("|     nodes  {nodes:<12}|");
            println!("|    prunes  {prunes:<12}|");
            println!("|       nps  {nps:<12}|");
            println!("|      Mnps  {m_nps:<12.2}|");
            println!("+------------------------+");
        } else {
            println!("{nodes} nodes / {elapsed:?} := {nps} nps");
        }

        Ok(())
    }

    /// Executes the `eval` command, printing an evaluation of the current position.
    fn eval(&self, pretty: bool) {
        use std::cmp::Ordering::*;

        let board = self.game.board();
        let side = self.game.side_to_move();

        if !pretty {
            println!("{}", self.heuristic.eval(board, side));
            return;
        }

        println!("{:>10} {:>12} {:>12}", "", Side::Blue.name(), Side::Red.name());
        for heuristic in Heuristic::all() {
            let blue = heuristic.eval(board, Side::Blue);
            let red = heuristic.eval(board, Side::Red);
            println!(
                "{:>10} {:>12} {:>12}",
                heuristic.name(),
                format!("{blue:.4}"),
                format!("{red:.4}")
            );
        }

        let progress = Simple.eval(board, side);
        let ahead = match progress.partial_cmp(&Score::DRAW) {
            Some(Greater) => Side::Blue.name(),
            Some(Less) => Side::Red.name(),
            _ => "N/A",
        };

        println!();
        println!("Further ahead: {ahead}");
        println!(
            "Score ({}, {side:#} to move): {}",
            self.heuristic,
            self.heuristic.eval(board, side)
        );
    }

    /// Executes the `moves` command, displaying all available moves on the board, or for the given square.
    fn moves(&self, square: Option<Square>, sort: bool) {
        let mut moves = match square {
            Some(square) => self.game.get_legal_moves_from(square),
            None => self.game.get_legal_moves(),
        };

        // If there are none, print "(none)"
        if moves.is_empty() {
            println!("(none)");
            return;
        }

        if sort {
            moves.sort_by_key(|mv| (mv.from, mv.to));
        }

        let string = moves
            .iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        println!("{string}");
    }

    /// Resets the engine's internal game state.
    #[inline(always)]
    fn new_game(&mut self) {
        self.game = Game::default();
    }

    /// Set the position to the supplied board, with `side` to move (Red if not supplied).
    fn position(&mut self, board: &str, side: Option<Side>) -> Result<()> {
        let board: Board = board.parse()?;
        self.game = Game::new(board, side.unwrap_or_default());

        if self.debug {
            send_string(format!("Position set to {:?}", self.game.to_notation()));
        }

        Ok(())
    }

    /// All options and their current values.
    fn options(&self) -> impl Iterator<Item = (&'static str, String)> {
        [
            ("Depth", self.config.depth.to_string()),
            ("Heuristic", self.heuristic.to_string()),
            ("Pruning", self.config.pruning.to_string()),
            ("AutoReply", self.auto_reply.to_string()),
        ]
        .into_iter()
    }

    /// Returns the current value of the option `name`, if it exists on this engine.
    ///
    /// Names are case-insensitive.
    fn get_option(&self, name: &str) -> Option<String> {
        self.options()
            .find(|(opt, _)| opt.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Handles the `setoption` command, setting option `name` to `value`.
    ///
    /// Will return an error if `name` isn't a valid option or `value` is not a valid value for that option.
    fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        match name.to_ascii_lowercase().as_str() {
            "depth" => {
                let Ok(depth) = value.parse() else {
                    bail!("expected integer in [0, {MAX_DEPTH}]. got {value:?}");
                };

                self.config = SearchConfig {
                    pruning: self.config.pruning,
                    ..SearchConfig::with_depth(depth)?
                };
            }

            "heuristic" => {
                self.heuristic = Heuristic::from_str(value, true)
                    .map_err(|_| anyhow!("expected one of `simple` or `complex`. got {value:?}"))?;
            }

            "pruning" => self.config.pruning = parse_bool(value)?,

            "autoreply" => self.auto_reply = parse_bool(value)?,

            _ => bail!("Unrecognized option {name:?} with value {value:?}"),
        }

        if self.debug {
            send_string(format!("Option {name} set to {value}"));
        }

        Ok(())
    }
}

impl Default for Engine {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

/// Parses an option value of `true`/`false` or `on`/`off`.
fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" => Ok(true),
        "false" | "off" => Ok(false),
        _ => bail!("expected bool. got {value:?}"),
    }
}

/// Helper to print an `info string` message to `stdout`.
#[inline(always)]
fn send_string<T: fmt::Display>(info: T) {
    println!("info string {info}");
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            // Send the Exit command and exit this function
            sender
                .send(EngineCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            return Ok(());
        }

        // Trim any leading/trailing whitespace
        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<EngineCommand>() {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to engine")?,

            // If an invalid command was received, just print the error and continue running
            Err(err) => eprintln!("{err}"),
        }
    }
}
