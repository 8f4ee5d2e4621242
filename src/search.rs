//! Fixed-depth adversarial search.
//!
//! The engine explores every line of play up to a ply limit; there is no
//! pruning and no time budget, so the cost of one decision grows as
//! `branching_factor ^ depth`.
//!
//! Two formulations are provided:
//! - [`search`]: negamax. Each node scores itself from the side to move and
//!   negates what its children report.
//! - [`minimax`]: explicit max/min alternation, with leaves scored from the
//!   root player's perspective.
//!
//! For an evaluator where `evaluate(b, s) == -evaluate(b, s.opponent())`
//! both return the same score and move. Ties always go to the move that
//! comes first in [`legal_moves`] order.

use tracing::debug;

use crate::board::{Board, Move, Symbol};
use crate::eval::Evaluator;
use crate::rules::{legal_moves, make_move};

/// Outcome of a search: the best score found and the move that reaches it.
///
/// `best_move` is `None` when the root is a leaf: either the depth is zero or
/// the side to move has no legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub best_move: Option<Move>,
    /// Number of nodes visited, the root included.
    pub nodes: u64,
}

/// Negamax search from `symbol`'s point of view.
pub fn search(board: &Board, depth: u32, symbol: Symbol, evaluator: &dyn Evaluator) -> SearchResult {
    let mut nodes = 0;
    let (score, best_move) = negamax(board, depth, symbol, evaluator, &mut nodes);
    debug!(depth, %symbol, score, nodes, "negamax search finished");
    SearchResult {
        score,
        best_move,
        nodes,
    }
}

fn negamax(
    board: &Board,
    depth: u32,
    symbol: Symbol,
    evaluator: &dyn Evaluator,
    nodes: &mut u64,
) -> (i32, Option<Move>) {
    *nodes += 1;

    let moves = legal_moves(board, symbol);
    if depth == 0 || moves.is_empty() {
        return (evaluator.evaluate(board, symbol), None);
    }

    let mut best: Option<(i32, Move)> = None;
    for mv in moves {
        let child = make_move(board, mv);
        let (child_score, _) = negamax(&child, depth - 1, symbol.opponent(), evaluator, nodes);
        let score = child_score.saturating_neg();
        if best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, mv));
        }
    }

    finish(best, board, symbol, evaluator)
}

/// Max/min search with `symbol` as the maximizing player.
pub fn minimax(board: &Board, depth: u32, symbol: Symbol, evaluator: &dyn Evaluator) -> SearchResult {
    let mut nodes = 0;
    let (score, best_move) = max_value(board, depth, symbol, symbol, evaluator, &mut nodes);
    debug!(depth, %symbol, score, nodes, "minimax search finished");
    SearchResult {
        score,
        best_move,
        nodes,
    }
}

fn max_value(
    board: &Board,
    depth: u32,
    to_move: Symbol,
    maximizer: Symbol,
    evaluator: &dyn Evaluator,
    nodes: &mut u64,
) -> (i32, Option<Move>) {
    *nodes += 1;

    let moves = legal_moves(board, to_move);
    if depth == 0 || moves.is_empty() {
        return (evaluator.evaluate(board, maximizer), None);
    }

    let mut best: Option<(i32, Move)> = None;
    for mv in moves {
        let child = make_move(board, mv);
        let (score, _) = min_value(&child, depth - 1, to_move.opponent(), maximizer, evaluator, nodes);
        if best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, mv));
        }
    }
    finish(best, board, maximizer, evaluator)
}

fn min_value(
    board: &Board,
    depth: u32,
    to_move: Symbol,
    maximizer: Symbol,
    evaluator: &dyn Evaluator,
    nodes: &mut u64,
) -> (i32, Option<Move>) {
    *nodes += 1;

    let moves = legal_moves(board, to_move);
    if depth == 0 || moves.is_empty() {
        return (evaluator.evaluate(board, maximizer), None);
    }

    let mut best: Option<(i32, Move)> = None;
    for mv in moves {
        let child = make_move(board, mv);
        let (score, _) = max_value(&child, depth - 1, to_move.opponent(), maximizer, evaluator, nodes);
        if best.is_none_or(|(best_score, _)| score < best_score) {
            best = Some((score, mv));
        }
    }
    finish(best, board, maximizer, evaluator)
}

fn finish(
    best: Option<(i32, Move)>,
    board: &Board,
    perspective: Symbol,
    evaluator: &dyn Evaluator,
) -> (i32, Option<Move>) {
    match best {
        Some((score, mv)) => (score, Some(mv)),
        None => (evaluator.evaluate(board, perspective), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{Mobility, Placeholder};

    fn board(rows: usize, cols: usize, s: &str) -> Board {
        Board::delinearize(s, rows, cols).unwrap()
    }

    #[test]
    fn test_depth_zero_is_leaf() {
        let b = board(1, 3, "xo.");
        let result = search(&b, 0, Symbol::X, &Placeholder::new(Symbol::X));
        assert_eq!(result.score, 1);
        assert_eq!(result.best_move, None);
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn test_terminal_board_is_leaf() {
        let b = board(1, 3, "x.o");
        let result = search(&b, 3, Symbol::X, &Placeholder::new(Symbol::O));
        assert_eq!(result.score, -1);
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn test_single_move_is_chosen() {
        let b = board(1, 3, "xo.");
        let result = search(&b, 1, Symbol::X, &Placeholder::new(Symbol::X));
        assert_eq!(result.best_move, Some(Move::new((0, 0), (0, 2))));
        // The child is scored for O (-1) and negated.
        assert_eq!(result.score, 1);
        assert_eq!(result.nodes, 2);
    }

    #[test]
    fn test_first_seen_wins_ties() {
        // Two jumps for X, both leading to equal scores.
        let b = board(1, 5, ".oxo.");
        let moves = legal_moves(&b, Symbol::X);
        assert_eq!(moves.len(), 2);
        let flat = |_: &Board, _: Symbol| 0;
        let result = search(&b, 2, Symbol::X, &flat);
        assert_eq!(result.best_move, Some(moves[0]));
    }

    #[test]
    fn test_minimax_agrees_with_negamax() {
        let mut b = Board::new(6, 6);
        b = make_move(&b, Move::removal((0, 0)));
        b = make_move(&b, Move::removal((0, 1)));
        for depth in 1..=3 {
            for symbol in [Symbol::X, Symbol::O] {
                let nega = search(&b, depth, symbol, &Mobility);
                let mini = minimax(&b, depth, symbol, &Mobility);
                assert_eq!(nega.score, mini.score, "depth {depth} {symbol}");
                assert_eq!(nega.best_move, mini.best_move, "depth {depth} {symbol}");
                assert_eq!(nega.nodes, mini.nodes);
            }
        }
    }
}
