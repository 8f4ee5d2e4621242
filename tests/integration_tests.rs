//! Integration tests for konane
//!
//! Rules properties are checked on positions reached by seeded random games,
//! so every board under test is one a real match can produce.

use konane::agent::{Agent, MinimaxAgent, RandomAgent, call_move_function};
use konane::board::{Board, Move, Symbol};
use konane::eval::{Mobility, Placeholder};
use konane::game::{CancelToken, GameManager, GameState};
use konane::protocol::single_turn;
use konane::rules::{first_moves_for_o, first_moves_for_x, is_initial_move, legal_moves, make_move};
use konane::search::{minimax, search};

// =============================================================================
// Helper functions
// =============================================================================

/// Every position (with the side to move) along a seeded random game.
fn random_positions(rows: usize, cols: usize, seed: u64) -> Vec<(Board, Symbol)> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut board = Board::new(rows, cols);
    let mut positions = Vec::new();

    let x = first_moves_for_x(&board);
    board = make_move(&board, Move::removal(x[rng.usize(..x.len())]));
    let o = first_moves_for_o(&board);
    board = make_move(&board, Move::removal(o[rng.usize(..o.len())]));

    let mut to_move = Symbol::X;
    loop {
        positions.push((board.clone(), to_move));
        let moves = legal_moves(&board, to_move);
        if moves.is_empty() {
            break;
        }
        board = make_move(&board, moves[rng.usize(..moves.len())]);
        to_move = to_move.opponent();
    }
    positions
}

fn all_positions() -> Vec<(Board, Symbol)> {
    let mut out = Vec::new();
    for seed in 0..8 {
        out.extend(random_positions(6, 6, seed));
        out.extend(random_positions(5, 7, seed + 100));
    }
    out
}

// =============================================================================
// Rules properties
// =============================================================================

#[test]
fn test_legal_moves_start_from_own_pieces() {
    for (board, _) in all_positions() {
        for symbol in [Symbol::X, Symbol::O] {
            for mv in legal_moves(&board, symbol) {
                assert_eq!(board.get(mv.from), Some(symbol), "{mv} on\n{board}");
            }
        }
    }
}

#[test]
fn test_jumps_capture_exactly_one_piece() {
    for (board, symbol) in all_positions() {
        for mv in legal_moves(&board, symbol) {
            let after = make_move(&board, mv);
            assert_eq!(after.piece_count(), board.piece_count() - 1);
            assert_eq!(after.count(symbol), board.count(symbol));
            assert_eq!(after.count(symbol.opponent()), board.count(symbol.opponent()) - 1);
            assert_eq!(after.get(mv.to), Some(symbol));
            assert_eq!(after.get(mv.from), None);
        }
    }
}

#[test]
fn test_initial_removals_remove_one_piece() {
    let board = Board::new(8, 8);
    for pt in first_moves_for_x(&board) {
        let after = make_move(&board, Move::removal(pt));
        assert_eq!(after.piece_count(), board.piece_count() - 1);
        assert!(is_initial_move(&after));
        for o in first_moves_for_o(&after) {
            let opened = make_move(&after, Move::removal(o));
            assert_eq!(opened.piece_count(), board.piece_count() - 2);
            assert!(!is_initial_move(&opened));
        }
    }
}

#[test]
fn test_three_by_three_single_jump() {
    // x o .
    // o x x
    // x o x
    let board = Board::delinearize("xo.oxxxox", 3, 3).unwrap();
    let moves = legal_moves(&board, Symbol::X);
    assert_eq!(moves, vec![Move::new((0, 0), (0, 2))]);
    let after = make_move(&board, moves[0]);
    assert_eq!(after, Board::delinearize("..xoxxxox", 3, 3).unwrap());
}

// =============================================================================
// Search properties
// =============================================================================

#[test]
fn test_leaf_scores_are_zero_sum() {
    for (board, _) in all_positions().into_iter().step_by(7) {
        let eval = Placeholder::new(Symbol::X);
        let x = search(&board, 0, Symbol::X, &eval).score;
        let o = search(&board, 0, Symbol::O, &eval).score;
        assert_eq!(x + o, 0);
    }
}

#[test]
fn test_search_is_deterministic() {
    for (board, symbol) in random_positions(6, 6, 3).into_iter().take(6) {
        let first = search(&board, 3, symbol, &Mobility);
        let second = search(&board, 3, symbol, &Mobility);
        assert_eq!(first, second);
    }
}

#[test]
fn test_search_move_is_legal() {
    for (board, symbol) in random_positions(6, 6, 9) {
        let result = search(&board, 2, symbol, &Mobility);
        let legal = legal_moves(&board, symbol);
        match result.best_move {
            Some(mv) => assert!(legal.contains(&mv)),
            None => assert!(legal.is_empty()),
        }
    }
}

#[test]
fn test_search_on_terminal_board() {
    let board = Board::delinearize("x.o.", 1, 4).unwrap();
    let eval = Placeholder::new(Symbol::X);
    let result = search(&board, 3, Symbol::O, &eval);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, -1);
}

#[test]
fn test_depth_one_prefers_better_move() {
    // . o x o .
    // Left lands on (0, 0), right lands on (0, 4); only the right corner scores.
    let board = Board::delinearize(".oxo.", 1, 5).unwrap();
    let corner = |b: &Board, s: Symbol| {
        let v = if b.get((0, 4)).is_some() { 5 } else { 0 };
        if s == Symbol::X { v } else { -v }
    };
    let result = search(&board, 1, Symbol::X, &corner);
    assert_eq!(result.best_move, Some(Move::new((0, 2), (0, 4))));
    assert_eq!(result.score, 5);
}

#[test]
fn test_depth_one_tie_goes_to_first_move() {
    let board = Board::delinearize(".oxo.", 1, 5).unwrap();
    let flat = |_: &Board, _: Symbol| 7;
    let result = search(&board, 1, Symbol::X, &flat);
    assert_eq!(result.best_move, Some(legal_moves(&board, Symbol::X)[0]));
    assert_eq!(result.score, -7);
}

#[test]
fn test_formulations_agree_on_game_positions() {
    for (board, symbol) in random_positions(5, 5, 21).into_iter().take(5) {
        let nega = search(&board, 2, symbol, &Mobility);
        let mini = minimax(&board, 2, symbol, &Mobility);
        assert_eq!((nega.score, nega.best_move), (mini.score, mini.best_move));
    }
}

// =============================================================================
// Agents and the match loop
// =============================================================================

#[test]
fn test_minimax_opening_is_fixed() {
    let mut x = MinimaxAgent::new(Symbol::X);
    let board = Board::new(8, 8);
    assert_eq!(single_turn(&mut x, &board).unwrap(), "(0, 0)");
}

#[test]
fn test_minimax_o_opening_is_adjacent() {
    let mut o = MinimaxAgent::new(Symbol::O).rng(fastrand::Rng::with_seed(5));
    let board = make_move(&Board::new(8, 8), Move::removal((4, 4)));
    let mv = call_move_function(&mut o, &board).unwrap();
    assert!(first_moves_for_o(&board).contains(&mv.from));
}

#[test]
fn test_minimax_game_replays_from_history() {
    let x: Box<dyn Agent> = Box::new(MinimaxAgent::with_evaluator(Symbol::X, 2, Box::new(Mobility)));
    let o: Box<dyn Agent> = Box::new(RandomAgent::with_rng(Symbol::O, fastrand::Rng::with_seed(1)));
    let mut gm = GameManager::new(6, 6, x, o);
    let state = gm.play(&CancelToken::new()).unwrap();
    assert!(state.is_over());

    // Replaying the history through the rules reproduces the final board.
    let mut board = Board::new(6, 6);
    for mv in gm.history() {
        board = make_move(&board, *mv);
    }
    assert_eq!(&board, gm.board());
}

#[test]
fn test_interrupt_between_turns() {
    struct Interrupting {
        inner: RandomAgent,
        cancel: CancelToken,
    }

    impl Agent for Interrupting {
        fn symbol(&self) -> Symbol {
            self.inner.symbol()
        }
        fn select_initial_x(&mut self, board: &Board) -> konane::Result<(usize, usize)> {
            self.inner.select_initial_x(board)
        }
        fn select_initial_o(&mut self, board: &Board) -> konane::Result<(usize, usize)> {
            self.inner.select_initial_o(board)
        }
        fn get_move(&mut self, board: &Board) -> konane::Result<Move> {
            self.cancel.cancel();
            self.inner.get_move(board)
        }
    }

    let cancel = CancelToken::new();
    let x = Box::new(Interrupting {
        inner: RandomAgent::with_rng(Symbol::X, fastrand::Rng::with_seed(8)),
        cancel: cancel.clone(),
    });
    let o = Box::new(RandomAgent::with_rng(Symbol::O, fastrand::Rng::with_seed(9)));
    let mut gm = GameManager::new(6, 6, x, o);
    let state = gm.play(&cancel).unwrap();

    // X's first jump is applied, then the loop stops before O moves.
    assert_eq!(state, GameState::InProgress);
    assert_eq!(gm.history().len(), 3);
    assert_eq!(gm.to_move(), Symbol::O);
    assert_eq!(gm.board().piece_count(), 36 - 3);
}
