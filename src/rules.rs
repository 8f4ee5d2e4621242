//! Konane rules: opening removals, jump generation and move application.
//!
//! All functions take the board by reference and never modify it. Moving
//! produces a new board value.
//!
//! A game opens with each side removing one of its own pieces (X first,
//! then O, next to the hole X left). After that, every turn is a jump: a
//! piece leaps orthogonally over an adjacent opponent piece into the empty
//! cell beyond, capturing it. A side with no jump on its turn loses.

use tracing::debug;

use crate::board::{Board, Move, Point, Symbol};
use crate::constants::DIRECTIONS;
use crate::error::{Error, Result};

/// True while the opening removals are still being made.
///
/// With no empty cell it is X's removal, with one it is O's.
pub fn is_initial_move(board: &Board) -> bool {
    board.empty_count() < 2
}

/// Points X may remove on the opening move: the two corners on the main
/// diagonal and the two centre cells, whichever of them hold an `x`.
pub fn first_moves_for_x(board: &Board) -> Vec<Point> {
    let (rows, cols) = (board.rows(), board.cols());
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let mut candidates = vec![(0, 0), (rows - 1, cols - 1), (rows / 2, cols / 2)];
    if let (Some(r), Some(c)) = ((rows / 2).checked_sub(1), (cols / 2).checked_sub(1)) {
        candidates.push((r, c));
    }
    candidates.retain(|&pt| board.get(pt) == Some(Symbol::X));
    candidates.sort_unstable();
    candidates.dedup();
    candidates
}

/// Points O may remove on its opening move: its pieces orthogonally adjacent
/// to the hole left by X.
pub fn first_moves_for_o(board: &Board) -> Vec<Point> {
    let Some(hole) = first_empty(board) else {
        return Vec::new();
    };
    DIRECTIONS
        .iter()
        .filter_map(|&dir| board.offset(hole, dir, 1))
        .filter(|&pt| board.get(pt) == Some(Symbol::O))
        .collect()
}

/// Opening removals available to `symbol`.
pub fn first_moves(board: &Board, symbol: Symbol) -> Vec<Point> {
    match symbol {
        Symbol::X => first_moves_for_x(board),
        Symbol::O => first_moves_for_o(board),
    }
}

fn first_empty(board: &Board) -> Option<Point> {
    (0..board.rows())
        .flat_map(|r| (0..board.cols()).map(move |c| (r, c)))
        .find(|&pt| board.is_empty_at(pt))
}

/// Every single jump available to `symbol`.
///
/// Pieces are scanned in row-major order and each is tried in the
/// directions up, down, left, right. The result is empty when `symbol`
/// cannot move.
pub fn legal_moves(board: &Board, symbol: Symbol) -> Vec<Move> {
    let opponent = symbol.opponent();
    let mut moves = Vec::new();
    for from in board.pieces(symbol) {
        for dir in DIRECTIONS {
            let Some(over) = board.offset(from, dir, 1) else {
                continue;
            };
            if board.get(over) != Some(opponent) {
                continue;
            }
            if let Some(to) = board.offset(from, dir, 2) {
                if board.is_empty_at(to) {
                    moves.push(Move::new(from, to));
                }
            }
        }
    }
    moves
}

/// Apply `mv` without checking legality.
///
/// A removal empties its point. A jump empties the origin and every cell
/// strictly between origin and destination, then places the moving piece on
/// the destination. Intended for moves taken from [`legal_moves`] or
/// [`first_moves`]; use [`play_move`] for anything else.
pub fn make_move(board: &Board, mv: Move) -> Board {
    let mut next = board.clone();
    if mv.is_removal() {
        next.set(mv.from, None);
        return next;
    }
    let piece = board.get(mv.from);
    let (dr, dc) = step(mv);
    let mut cur = mv.from;
    while cur != mv.to {
        next.set(cur, None);
        match next.offset(cur, (dr, dc), 1) {
            Some(pt) => cur = pt,
            None => break,
        }
    }
    next.set(mv.to, piece);
    next
}

fn step(mv: Move) -> (isize, isize) {
    let dr = (mv.to.0 as isize - mv.from.0 as isize).signum();
    let dc = (mv.to.1 as isize - mv.from.1 as isize).signum();
    (dr, dc)
}

/// Check that `symbol` may play `mv` on `board` and apply it.
///
/// During the opening only removals from [`first_moves`] are accepted, and
/// only on the side's own opening turn. Afterwards only moves from
/// [`legal_moves`] are accepted.
pub fn play_move(board: &Board, symbol: Symbol, mv: Move) -> Result<Board> {
    let legal = if is_initial_move(board) {
        let own_turn = match symbol {
            Symbol::X => board.empty_count() == 0,
            Symbol::O => board.empty_count() == 1,
        };
        own_turn && mv.is_removal() && first_moves(board, symbol).contains(&mv.from)
    } else {
        !mv.is_removal() && legal_moves(board, symbol).contains(&mv)
    };
    if !legal {
        debug!(%symbol, %mv, "rejected illegal move");
        return Err(Error::IllegalMove { symbol, mv });
    }
    Ok(make_move(board, mv))
}
