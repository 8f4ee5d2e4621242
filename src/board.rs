//! Board representation and its text encoding.
//!
//! The board is a row-major grid of cells, each either empty or holding a
//! piece of one of the two sides. Boards are plain values: the rules engine
//! always produces a new board instead of editing the caller's.

use std::fmt;
use std::str::FromStr;

use crate::constants::{CELL_EMPTY, CELL_O, CELL_X, MAX_CELLS};
use crate::error::{Error, Result};

/// One of the two sides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::X => CELL_X,
            Symbol::O => CELL_O,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "x" | "X" => Ok(Symbol::X),
            "o" | "O" => Ok(Symbol::O),
            other => Err(Error::InvalidSymbol(other.to_string())),
        }
    }
}

/// A cell coordinate as (row, column), 0-indexed.
pub type Point = (usize, usize);

/// A move from `from` to `to`.
///
/// When both points are equal the move is an initial removal: the piece at
/// that point is taken off the board. Otherwise it is a jump along a row or
/// column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Point,
    pub to: Point,
}

impl Move {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    /// The initial removal of the piece at `pt`.
    pub fn removal(pt: Point) -> Self {
        Self { from: pt, to: pt }
    }

    pub fn is_removal(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(({}, {}), ({}, {}))",
            self.from.0, self.from.1, self.to.0, self.to.1
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Symbol>>,
}

impl Board {
    /// Cells on a `rows` x `cols` board, or an error for sizes no board can have.
    pub fn cell_count(rows: usize, cols: usize) -> Result<usize> {
        rows.checked_mul(cols)
            .filter(|&n| n > 0 && n <= MAX_CELLS)
            .ok_or(Error::InvalidDimensions { rows, cols })
    }

    /// A full board in the starting checkerboard population.
    ///
    /// `x` occupies every cell whose coordinates sum to an even number, so
    /// the top-left corner always holds an `x`. Dimensions from user input
    /// should go through [`Board::cell_count`] first.
    pub fn new(rows: usize, cols: usize) -> Self {
        let cells = (0..rows * cols)
            .map(|i| {
                let (r, c) = (i / cols, i % cols);
                Some(if (r + c) % 2 == 0 { Symbol::X } else { Symbol::O })
            })
            .collect();
        Self { rows, cols, cells }
    }

    /// A board with every cell empty.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn idx(&self, (r, c): Point) -> usize {
        r * self.cols + c
    }

    pub fn in_bounds(&self, (r, c): Point) -> bool {
        r < self.rows && c < self.cols
    }

    /// Contents of a cell; `None` for empty or out-of-bounds cells.
    pub fn get(&self, pt: Point) -> Option<Symbol> {
        if !self.in_bounds(pt) {
            return None;
        }
        self.cells[self.idx(pt)]
    }

    pub fn is_empty_at(&self, pt: Point) -> bool {
        self.in_bounds(pt) && self.get(pt).is_none()
    }

    /// Overwrite a cell. Out-of-bounds points are ignored.
    pub fn set(&mut self, pt: Point, value: Option<Symbol>) {
        if self.in_bounds(pt) {
            let i = self.idx(pt);
            self.cells[i] = value;
        }
    }

    /// The point `steps` cells away from `pt` in direction `(dr, dc)`, if on the board.
    pub fn offset(&self, (r, c): Point, (dr, dc): (isize, isize), steps: isize) -> Option<Point> {
        let nr = r.checked_add_signed(dr * steps)?;
        let nc = c.checked_add_signed(dc * steps)?;
        self.in_bounds((nr, nc)).then_some((nr, nc))
    }

    /// All points holding a piece of `symbol`, in row-major order.
    pub fn pieces(&self, symbol: Symbol) -> impl Iterator<Item = Point> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, cell)| **cell == Some(symbol))
            .map(move |(i, _)| (i / cols, i % cols))
    }

    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells.iter().filter(|c| **c == Some(symbol)).count()
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.len() - self.piece_count()
    }

    /// Encode the board as a row-major string of cell characters.
    pub fn linearize(&self) -> String {
        self.cells.iter().map(|c| cell_char(*c)).collect()
    }

    /// Decode a row-major string of cell characters into a `rows` x `cols` board.
    pub fn delinearize(s: &str, rows: usize, cols: usize) -> Result<Self> {
        let expected = Self::cell_count(rows, cols)?;
        let got = s.chars().count();
        if got != expected {
            return Err(Error::InvalidBoardLength {
                rows,
                cols,
                expected,
                got,
            });
        }
        let cells = s
            .chars()
            .enumerate()
            .map(|(position, character)| match character {
                CELL_X => Ok(Some(Symbol::X)),
                CELL_O => Ok(Some(Symbol::O)),
                CELL_EMPTY => Ok(None),
                _ => Err(Error::InvalidCellCharacter {
                    character,
                    position,
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows, cols, cells })
    }
}

fn cell_char(cell: Option<Symbol>) -> char {
    cell.map_or(CELL_EMPTY, Symbol::as_char)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for c in 0..self.cols {
            write!(f, " {}", c % 10)?;
        }
        writeln!(f)?;
        for r in 0..self.rows {
            write!(f, "{:>2}", r)?;
            for c in 0..self.cols {
                write!(f, " {}", cell_char(self.get((r, c))))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
