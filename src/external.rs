//! Agents backed by an external program.
//!
//! Each turn spawns the program once (see [`crate::protocol`] for the
//! arguments and answer format) and waits at most `timeout` for it to exit.
//! A program that runs over time is killed. The deadline also bounds reading
//! its output, so a leftover child holding the pipe open cannot stall the
//! match. Timeouts, crashes, unreadable answers and illegal moves surface as
//! forfeit errors (see [`Error::is_forfeit`]).

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::agent::Agent;
use crate::board::{Board, Move, Point, Symbol};
use crate::constants::{DEFAULT_EXTERNAL_TYPE, POLL_INTERVAL};
use crate::error::{Error, Result};
use crate::protocol::{Reply, agent_args, parse_reply};
use crate::rules::play_move;

pub struct ExternalAgent {
    program: PathBuf,
    symbol: Symbol,
    timeout: Duration,
    type_flag: String,
}

impl ExternalAgent {
    pub fn new(program: impl Into<PathBuf>, symbol: Symbol, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            symbol,
            timeout,
            type_flag: DEFAULT_EXTERNAL_TYPE.to_string(),
        }
    }

    /// Value passed to the program as its `-t` player type.
    pub fn type_flag(mut self, flag: impl Into<String>) -> Self {
        self.type_flag = flag.into();
        self
    }

    fn name(&self) -> String {
        self.program.display().to_string()
    }

    fn failed(&self, message: impl Into<String>) -> Error {
        Error::AgentFailed {
            program: self.name(),
            message: message.into(),
        }
    }

    /// Run the program once on `board` and return what it printed.
    fn invoke(&self, board: &Board) -> Result<String> {
        let args = agent_args(self.symbol, &self.type_flag, board);
        debug!(program = %self.name(), ?args, "invoking external agent");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| Error::AgentSpawn {
                program: self.name(),
                source,
            })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| self.failed("stdout was not captured"))?;
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut text = String::new();
            let _ = tx.send(stdout.read_to_string(&mut text).map(|_| text));
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                if let Err(e) = child.kill() {
                    warn!(program = %self.name(), error = %e, "failed to kill external agent");
                }
                let _ = child.wait();
                return Err(self.timed_out());
            }
            thread::sleep(POLL_INTERVAL);
        };

        if !status.success() {
            return Err(self.failed(format!("exited with {status}")));
        }
        let remaining = deadline.saturating_duration_since(Instant::now()).max(POLL_INTERVAL);
        match rx.recv_timeout(remaining) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(self.failed(format!("could not read output: {e}"))),
            Err(RecvTimeoutError::Timeout) => {
                warn!(program = %self.name(), "external agent output still open at deadline");
                Err(self.timed_out())
            }
            Err(RecvTimeoutError::Disconnected) => Err(self.failed("output reader stopped")),
        }
    }

    fn timed_out(&self) -> Error {
        Error::AgentTimedOut {
            program: self.name(),
            millis: self.timeout.as_millis(),
        }
    }

    /// Reject answers the rules engine would refuse, so they cost the turn.
    fn checked(&self, board: &Board, mv: Move) -> Result<Move> {
        play_move(board, self.symbol, mv)
            .map(|_| mv)
            .map_err(|e| self.failed(e.to_string()))
    }

    fn ask(&self, board: &Board) -> Result<Reply> {
        let text = self.invoke(board)?;
        parse_reply(&text).ok_or_else(|| self.failed(format!("unparsable answer {:?}", text.trim())))
    }

    fn ask_point(&self, board: &Board) -> Result<Point> {
        let pt = match self.ask(board)? {
            Reply::Point(pt) => pt,
            Reply::Move(mv) if mv.is_removal() => mv.from,
            Reply::Move(mv) => return Err(self.failed(format!("expected a point, got {mv}"))),
        };
        Ok(self.checked(board, Move::removal(pt))?.from)
    }
}

impl Agent for ExternalAgent {
    fn symbol(&self) -> Symbol {
        self.symbol
    }

    fn select_initial_x(&mut self, board: &Board) -> Result<Point> {
        self.ask_point(board)
    }

    fn select_initial_o(&mut self, board: &Board) -> Result<Point> {
        self.ask_point(board)
    }

    fn get_move(&mut self, board: &Board) -> Result<Move> {
        let mv = self.ask(board)?.into_move();
        self.checked(board, mv)
    }
}
