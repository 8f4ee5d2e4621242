//! Match orchestration.
//!
//! [`GameManager`] owns the board and both agents, asks the side to move for
//! a move, validates it through the rules engine and applies it. A match
//! opens with X's removal and O's removal, then alternates jumps until the
//! side to move has none.
//!
//! Interruption is cooperative: a [`CancelToken`] is checked between turns,
//! never inside an agent's move selection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::agent::{Agent, call_move_function};
use crate::board::{Board, Move, Symbol};
use crate::error::Result;
use crate::rules::{first_moves, is_initial_move, legal_moves, play_move};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    InProgress,
    XVictory,
    OVictory,
}

impl GameState {
    fn victory(winner: Symbol) -> Self {
        match winner {
            Symbol::X => GameState::XVictory,
            Symbol::O => GameState::OVictory,
        }
    }

    pub fn winner(self) -> Option<Symbol> {
        match self {
            GameState::XVictory => Some(Symbol::X),
            GameState::OVictory => Some(Symbol::O),
            _ => None,
        }
    }

    pub fn is_over(self) -> bool {
        self.winner().is_some()
    }
}

/// Shared flag asking a running match to stop at the next turn boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// The shared flag, for signal handlers that set it directly.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

/// Wins per side over a series of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub x_wins: usize,
    pub o_wins: usize,
    /// Games cut short by an interrupt.
    pub unfinished: usize,
}

pub struct GameManager {
    rows: usize,
    cols: usize,
    x: Box<dyn Agent>,
    o: Box<dyn Agent>,
    board: Board,
    state: GameState,
    to_move: Symbol,
    history: Vec<Move>,
    verbose: bool,
}

impl GameManager {
    pub fn new(rows: usize, cols: usize, x: Box<dyn Agent>, o: Box<dyn Agent>) -> Self {
        Self {
            rows,
            cols,
            x,
            o,
            board: Board::new(rows, cols),
            state: GameState::NotStarted,
            to_move: Symbol::X,
            history: Vec::new(),
            verbose: false,
        }
    }

    /// Print the board after every applied move.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn to_move(&self) -> Symbol {
        self.to_move
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Start a fresh game: full board, X to make the opening removal.
    pub fn reset(&mut self) {
        self.board = Board::new(self.rows, self.cols);
        self.state = GameState::InProgress;
        self.to_move = Symbol::X;
        self.history.clear();
        self.check_terminal();
    }

    /// Resume from an arbitrary position with `to_move` on turn.
    pub fn set_position(&mut self, board: Board, to_move: Symbol) {
        self.rows = board.rows();
        self.cols = board.cols();
        self.board = board;
        self.to_move = to_move;
        self.history.clear();
        self.state = GameState::InProgress;
        self.check_terminal();
    }

    /// Play turns until the game ends or `cancel` is set.
    ///
    /// An interrupted game keeps its state (`InProgress`). Errors other than
    /// an agent forfeit abort the game and leave board and state as they were
    /// before the failing turn.
    pub fn play(&mut self, cancel: &CancelToken) -> Result<GameState> {
        if self.state == GameState::NotStarted {
            self.reset();
        }
        while self.state == GameState::InProgress {
            if cancel.is_cancelled() {
                info!(turns = self.history.len(), "game interrupted");
                break;
            }
            self.step()?;
        }
        if let Some(winner) = self.state.winner() {
            info!(%winner, turns = self.history.len(), "game over");
        }
        Ok(self.state)
    }

    /// Play a single turn for the side to move.
    pub fn step(&mut self) -> Result<GameState> {
        if self.state != GameState::InProgress {
            return Ok(self.state);
        }
        let symbol = self.to_move;
        let agent = match symbol {
            Symbol::X => self.x.as_mut(),
            Symbol::O => self.o.as_mut(),
        };

        let mv = match call_move_function(agent, &self.board) {
            Ok(mv) => mv,
            Err(e) if e.is_forfeit() => {
                warn!(%symbol, error = %e, "turn forfeited");
                self.state = GameState::victory(symbol.opponent());
                return Ok(self.state);
            }
            Err(e) => return Err(e),
        };

        self.board = play_move(&self.board, symbol, mv)?;
        self.history.push(mv);
        self.to_move = symbol.opponent();
        info!(%symbol, %mv, "move applied");
        if self.verbose {
            println!("{symbol} plays {mv}\n{}", self.board);
        }

        self.check_terminal();
        Ok(self.state)
    }

    /// Declare the game over when the side to move has nothing to play.
    fn check_terminal(&mut self) {
        let stuck = if is_initial_move(&self.board) {
            first_moves(&self.board, self.to_move).is_empty()
        } else {
            legal_moves(&self.board, self.to_move).is_empty()
        };
        if stuck {
            self.state = GameState::victory(self.to_move.opponent());
        }
    }

    /// Play `games` games back to back, resetting before each one.
    pub fn play_many(&mut self, games: usize, cancel: &CancelToken) -> Result<Tally> {
        let mut tally = Tally::default();
        for _ in 0..games {
            if cancel.is_cancelled() {
                break;
            }
            self.reset();
            match self.play(cancel)? {
                GameState::XVictory => tally.x_wins += 1,
                GameState::OVictory => tally.o_wins += 1,
                _ => tally.unfinished += 1,
            }
        }
        Ok(tally)
    }
}
