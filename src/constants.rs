//! Default parameters and fixed characters used across the engine.
//!
//! Board dimensions, search depth and external-agent timeouts are runtime
//! configuration (see the CLI); the values here are only the defaults.

use std::time::Duration;

// =============================================================================
// Board Geometry
// =============================================================================

/// Default number of rows on a fresh board.
pub const DEFAULT_ROWS: usize = 10;

/// Default number of columns on a fresh board.
pub const DEFAULT_COLS: usize = 10;

/// Largest board accepted, in cells.
pub const MAX_CELLS: usize = 1 << 20;

/// Orthogonal jump directions as (row delta, column delta).
/// Order: up, down, left, right. Move enumeration follows this order.
pub const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// =============================================================================
// Search Parameters
// =============================================================================

/// Default search depth in plies for the minimax agent.
pub const DEFAULT_DEPTH: u32 = 3;

// =============================================================================
// External Agents
// =============================================================================

/// Default time an external agent is given to answer one turn.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How often a running external agent is polled for completion.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Player type flag handed to external programs when none is configured.
pub const DEFAULT_EXTERNAL_TYPE: &str = "M";

// =============================================================================
// Cell Characters (board text encoding)
// =============================================================================

/// Piece belonging to player X.
pub const CELL_X: char = 'x';

/// Piece belonging to player O.
pub const CELL_O: char = 'o';

/// Empty cell.
pub const CELL_EMPTY: char = '.';
