//! Konane: a two-player jumping game with random, human, search-based and
//! external-program players.
//!
//! ## Modules
//!
//! - [`constants`] - Default parameters and cell characters
//! - [`board`] - Board, points, moves and the board text encoding
//! - [`rules`] - Opening removals, jump generation, move application
//! - [`eval`] - Leaf evaluation functions
//! - [`search`] - Fixed-depth negamax / minimax search
//! - [`agent`] - The agent interface and built-in agents
//! - [`external`] - Agents that run another program each turn
//! - [`protocol`] - Argument and answer format for external agents
//! - [`game`] - Match loop with cooperative interruption
//!
//! ## Example
//!
//! ```
//! use konane::agent::{MinimaxAgent, RandomAgent};
//! use konane::board::Symbol;
//! use konane::game::{CancelToken, GameManager};
//!
//! let mut gm = GameManager::new(
//!     6,
//!     6,
//!     Box::new(MinimaxAgent::new(Symbol::X)),
//!     Box::new(RandomAgent::new(Symbol::O)),
//! );
//! let state = gm.play(&CancelToken::new()).unwrap();
//! assert!(state.is_over());
//! ```

pub mod agent;
pub mod board;
pub mod constants;
pub mod error;
pub mod eval;
pub mod external;
pub mod game;
pub mod protocol;
pub mod rules;
pub mod search;

pub use error::{Error, Result};
