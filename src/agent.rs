//! Players: the agent interface and the built-in agents.
//!
//! - [`RandomAgent`] picks uniformly among legal choices.
//! - [`MinimaxAgent`] searches a fixed number of plies.
//! - [`HumanAgent`] asks on a text stream.
//! - [`ExternalAgent`](crate::external::ExternalAgent) runs another program.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::board::{Board, Move, Point, Symbol};
use crate::constants::{DEFAULT_DEPTH, DEFAULT_EXTERNAL_TYPE, DEFAULT_TIMEOUT};
use crate::error::{Error, Result};
use crate::eval::{Evaluator, Mobility, Placeholder};
use crate::external::ExternalAgent;
use crate::rules::{first_moves_for_o, first_moves_for_x, is_initial_move, legal_moves};
use crate::search::{minimax, search};

/// A player the game manager can ask for moves.
pub trait Agent {
    fn symbol(&self) -> Symbol;

    /// Point X removes on the opening move.
    fn select_initial_x(&mut self, board: &Board) -> Result<Point>;

    /// Point O removes on its opening move.
    fn select_initial_o(&mut self, board: &Board) -> Result<Point>;

    /// A jump for a board past the opening.
    fn get_move(&mut self, board: &Board) -> Result<Move>;
}

/// Ask `agent` for its move on `board`, using the opening methods while the
/// opening removals are still being made.
pub fn call_move_function(agent: &mut dyn Agent, board: &Board) -> Result<Move> {
    if is_initial_move(board) {
        let pt = match agent.symbol() {
            Symbol::X => agent.select_initial_x(board)?,
            Symbol::O => agent.select_initial_o(board)?,
        };
        Ok(Move::removal(pt))
    } else {
        agent.get_move(board)
    }
}

fn pick<T: Copy>(rng: &mut fastrand::Rng, choices: &[T]) -> Option<T> {
    if choices.is_empty() {
        None
    } else {
        Some(choices[rng.usize(..choices.len())])
    }
}

// =============================================================================
// Random
// =============================================================================

pub struct RandomAgent {
    symbol: Symbol,
    rng: fastrand::Rng,
}

impl RandomAgent {
    pub fn new(symbol: Symbol) -> Self {
        Self::with_rng(symbol, fastrand::Rng::new())
    }

    pub fn with_rng(symbol: Symbol, rng: fastrand::Rng) -> Self {
        Self { symbol, rng }
    }
}

impl Agent for RandomAgent {
    fn symbol(&self) -> Symbol {
        self.symbol
    }

    fn select_initial_x(&mut self, board: &Board) -> Result<Point> {
        pick(&mut self.rng, &first_moves_for_x(board)).ok_or(Error::NoLegalMoves(self.symbol))
    }

    fn select_initial_o(&mut self, board: &Board) -> Result<Point> {
        pick(&mut self.rng, &first_moves_for_o(board)).ok_or(Error::NoLegalMoves(self.symbol))
    }

    fn get_move(&mut self, board: &Board) -> Result<Move> {
        pick(&mut self.rng, &legal_moves(board, self.symbol)).ok_or(Error::NoLegalMoves(self.symbol))
    }
}

// =============================================================================
// Minimax
// =============================================================================

/// Which search formulation a [`MinimaxAgent`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Formulation {
    #[default]
    Negamax,
    Minimax,
}

/// Searches `depth` plies with its evaluator and plays the best move found.
///
/// Openings are not searched: X always removes the top-left corner and O
/// removes a random piece next to the hole.
pub struct MinimaxAgent {
    symbol: Symbol,
    depth: u32,
    evaluator: Box<dyn Evaluator>,
    formulation: Formulation,
    rng: fastrand::Rng,
}

impl MinimaxAgent {
    /// A negamax agent with the placeholder evaluator and default depth.
    pub fn new(symbol: Symbol) -> Self {
        Self::with_evaluator(symbol, DEFAULT_DEPTH, Box::new(Placeholder::new(symbol)))
    }

    pub fn with_evaluator(symbol: Symbol, depth: u32, evaluator: Box<dyn Evaluator>) -> Self {
        Self {
            symbol,
            depth,
            evaluator,
            formulation: Formulation::default(),
            rng: fastrand::Rng::new(),
        }
    }

    pub fn formulation(mut self, formulation: Formulation) -> Self {
        self.formulation = formulation;
        self
    }

    pub fn rng(mut self, rng: fastrand::Rng) -> Self {
        self.rng = rng;
        self
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

impl Agent for MinimaxAgent {
    fn symbol(&self) -> Symbol {
        self.symbol
    }

    fn select_initial_x(&mut self, _board: &Board) -> Result<Point> {
        Ok((0, 0))
    }

    fn select_initial_o(&mut self, board: &Board) -> Result<Point> {
        pick(&mut self.rng, &first_moves_for_o(board)).ok_or(Error::NoLegalMoves(self.symbol))
    }

    fn get_move(&mut self, board: &Board) -> Result<Move> {
        let result = match self.formulation {
            Formulation::Negamax => search(board, self.depth, self.symbol, self.evaluator.as_ref()),
            Formulation::Minimax => minimax(board, self.depth, self.symbol, self.evaluator.as_ref()),
        };
        result.best_move.ok_or(Error::NoLegalMoves(self.symbol))
    }
}

// =============================================================================
// Human
// =============================================================================

/// Reads `row column` answers from `input`, writing prompts to `output`.
///
/// Anything that is not a legal choice for the current turn is met with the
/// same prompt again.
pub struct HumanAgent<R, W> {
    symbol: Symbol,
    input: R,
    output: W,
}

impl HumanAgent<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(symbol: Symbol) -> Self {
        Self::new(symbol, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    pub fn new(symbol: Symbol, input: R, output: W) -> Self {
        Self {
            symbol,
            input,
            output,
        }
    }

    fn prompt_for_point(&mut self, prompt: &str) -> Result<Option<Point>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let point = match parts.as_slice() {
            [r, c] => match (r.parse(), c.parse()) {
                (Ok(r), Ok(c)) => Some((r, c)),
                _ => None,
            },
            _ => None,
        };
        Ok(point)
    }

    fn select_initial(&mut self, board: &Board, valid: &[Point]) -> Result<Point> {
        write!(self.output, "{board}")?;
        let prompt = format!(
            "Enter a valid starting location for player {} (in the format 'row column'): ",
            self.symbol.as_char().to_ascii_uppercase()
        );
        loop {
            if let Some(pt) = self.prompt_for_point(&prompt)? {
                if valid.contains(&pt) {
                    return Ok(pt);
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> Agent for HumanAgent<R, W> {
    fn symbol(&self) -> Symbol {
        self.symbol
    }

    fn select_initial_x(&mut self, board: &Board) -> Result<Point> {
        self.select_initial(board, &first_moves_for_x(board))
    }

    fn select_initial_o(&mut self, board: &Board) -> Result<Point> {
        self.select_initial(board, &first_moves_for_o(board))
    }

    fn get_move(&mut self, board: &Board) -> Result<Move> {
        let legal = legal_moves(board, self.symbol);
        if legal.is_empty() {
            return Err(Error::NoLegalMoves(self.symbol));
        }
        write!(self.output, "{board}")?;
        let name = self.symbol.as_char().to_ascii_uppercase();
        loop {
            let Some(from) =
                self.prompt_for_point(&format!("Choose a piece to move for {name} (in the format 'row column'): "))?
            else {
                continue;
            };
            if !legal.iter().any(|mv| mv.from == from) {
                continue;
            }
            let prompt = format!("Choose a destination for {name} ({}, {}) -> ", from.0, from.1);
            let Some(to) = self.prompt_for_point(&prompt)? else {
                continue;
            };
            let mv = Move::new(from, to);
            if legal.contains(&mv) {
                return Ok(mv);
            }
        }
    }
}

// =============================================================================
// Construction from configuration
// =============================================================================

/// Leaf evaluator for minimax agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EvalKind {
    #[default]
    Placeholder,
    Mobility,
}

impl EvalKind {
    pub fn build(self, owner: Symbol) -> Box<dyn Evaluator> {
        match self {
            EvalKind::Placeholder => Box::new(Placeholder::new(owner)),
            EvalKind::Mobility => Box::new(Mobility),
        }
    }
}

/// Kind of player named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentKind {
    Human,
    Random,
    Minimax,
    External(PathBuf),
}

impl AgentKind {
    /// `H`, `R` or `M` (by first letter, any case), or the path of an
    /// existing program to run as an external agent.
    pub fn parse(kind: &str, symbol: Symbol) -> Result<Self> {
        match kind.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('H') => Ok(AgentKind::Human),
            Some('R') => Ok(AgentKind::Random),
            Some('M') => Ok(AgentKind::Minimax),
            _ if !kind.is_empty() && PathBuf::from(kind).is_file() => {
                Ok(AgentKind::External(PathBuf::from(kind)))
            }
            _ => Err(Error::UnrecognizedAgentType {
                kind: kind.to_string(),
                symbol,
            }),
        }
    }
}

/// Settings shared by every agent built for a match.
#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub depth: u32,
    pub eval: EvalKind,
    pub formulation: Formulation,
    pub timeout: Duration,
    pub external_type: String,
    pub seed: Option<u64>,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            eval: EvalKind::default(),
            formulation: Formulation::default(),
            timeout: DEFAULT_TIMEOUT,
            external_type: DEFAULT_EXTERNAL_TYPE.to_string(),
            seed: None,
        }
    }
}

impl AgentOptions {
    fn rng(&self, symbol: Symbol) -> fastrand::Rng {
        match self.seed {
            Some(seed) => {
                let offset = match symbol {
                    Symbol::X => 0,
                    Symbol::O => 1,
                };
                fastrand::Rng::with_seed(seed.wrapping_add(offset))
            }
            None => fastrand::Rng::new(),
        }
    }
}

pub fn make_agent(kind: &AgentKind, symbol: Symbol, options: &AgentOptions) -> Box<dyn Agent> {
    match kind {
        AgentKind::Human => Box::new(HumanAgent::stdio(symbol)),
        AgentKind::Random => Box::new(RandomAgent::with_rng(symbol, options.rng(symbol))),
        AgentKind::Minimax => Box::new(
            MinimaxAgent::with_evaluator(symbol, options.depth, options.eval.build(symbol))
                .formulation(options.formulation)
                .rng(options.rng(symbol)),
        ),
        AgentKind::External(program) => Box::new(
            ExternalAgent::new(program.clone(), symbol, options.timeout)
                .type_flag(options.external_type.clone()),
        ),
    }
}
