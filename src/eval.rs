//! Board evaluation functions used at the leaves of the search.

use crate::board::{Board, Symbol};
use crate::rules::legal_moves;

/// Scores a board from the perspective of `symbol`; higher is better for it.
///
/// Must be deterministic and defined for every board, including ones where
/// `symbol` has no moves left.
pub trait Evaluator {
    fn evaluate(&self, board: &Board, symbol: Symbol) -> i32;
}

impl<F> Evaluator for F
where
    F: Fn(&Board, Symbol) -> i32,
{
    fn evaluate(&self, board: &Board, symbol: Symbol) -> i32 {
        self(board, symbol)
    }
}

/// Ignores the board: +1 when asked about the owner's side, -1 otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Placeholder {
    owner: Symbol,
}

impl Placeholder {
    pub fn new(owner: Symbol) -> Self {
        Self { owner }
    }
}

impl Evaluator for Placeholder {
    fn evaluate(&self, _board: &Board, symbol: Symbol) -> i32 {
        if symbol == self.owner { 1 } else { -1 }
    }
}

/// Legal-move differential: jumps available to `symbol` minus jumps
/// available to its opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mobility;

impl Evaluator for Mobility {
    fn evaluate(&self, board: &Board, symbol: Symbol) -> i32 {
        let mine = legal_moves(board, symbol).len() as i32;
        let theirs = legal_moves(board, symbol.opponent()).len() as i32;
        mine - theirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_signs() {
        let board = Board::new(4, 4);
        let eval = Placeholder::new(Symbol::O);
        assert_eq!(eval.evaluate(&board, Symbol::O), 1);
        assert_eq!(eval.evaluate(&board, Symbol::X), -1);
    }

    #[test]
    fn test_mobility_is_antisymmetric() {
        // x o . o
        // . . . x
        let board = Board::delinearize("xo.o...x", 2, 4).unwrap();
        let x = Mobility.evaluate(&board, Symbol::X);
        let o = Mobility.evaluate(&board, Symbol::O);
        assert_eq!(x, 1);
        assert_eq!(x, -o);
    }

    #[test]
    fn test_closure_evaluator() {
        let eval = |b: &Board, s: Symbol| b.count(s) as i32;
        assert_eq!(eval.evaluate(&Board::new(2, 2), Symbol::X), 2);
    }
}
