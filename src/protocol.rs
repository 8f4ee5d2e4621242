//! Text protocol spoken between the game manager and external agents.
//!
//! An external agent is started once per turn with
//!
//! ```text
//! <program> -p <x|o> -t <type> -r <rows> -c <cols> <board>
//! ```
//!
//! where `<board>` is the row-major board string (`x`, `o`, `.`). It answers
//! on stdout with a single literal:
//!
//! - `(r, c)` for an opening removal
//! - `((r1, c1), (r2, c2))` for a jump
//!
//! The `turn` subcommand of this crate's binary implements the agent side.

use crate::agent::{Agent, call_move_function};
use crate::board::{Board, Move, Point, Symbol};
use crate::error::Result;

/// A parsed agent answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Point(Point),
    Move(Move),
}

impl Reply {
    pub fn into_move(self) -> Move {
        match self {
            Reply::Point(pt) => Move::removal(pt),
            Reply::Move(mv) => mv,
        }
    }
}

/// Command-line arguments for one external agent invocation.
pub fn agent_args(symbol: Symbol, kind: &str, board: &Board) -> Vec<String> {
    vec![
        "-p".to_string(),
        symbol.to_string(),
        "-t".to_string(),
        kind.to_string(),
        "-r".to_string(),
        board.rows().to_string(),
        "-c".to_string(),
        board.cols().to_string(),
        board.linearize(),
    ]
}

pub fn format_point((r, c): Point) -> String {
    format!("({r}, {c})")
}

/// Literal for a move: the point form for removals, the pair form for jumps.
pub fn format_reply(mv: Move) -> String {
    if mv.is_removal() {
        format_point(mv.from)
    } else {
        mv.to_string()
    }
}

/// Parse an agent's answer.
///
/// Only the integers matter: two make a point, four make a move. Punctuation
/// and whitespace are ignored, a minus sign or any other count is rejected.
pub fn parse_reply(text: &str) -> Option<Reply> {
    if text.contains('-') {
        return None;
    }
    let numbers: Vec<usize> = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .map(str::parse::<usize>)
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    match numbers.as_slice() {
        [r, c] => Some(Reply::Point((*r, *c))),
        [r1, c1, r2, c2] => Some(Reply::Move(Move::new((*r1, *c1), (*r2, *c2)))),
        _ => None,
    }
}

/// Play a single turn for `agent` on `board` and return the reply literal.
pub fn single_turn(agent: &mut dyn Agent, board: &Board) -> Result<String> {
    let mv = call_move_function(agent, board)?;
    Ok(format_reply(mv))
}
