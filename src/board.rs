//! Board, color, and move types shared by the rules and the search.
//!
//! A [`Board`] is an immutable square grid. Nothing in the engine mutates a
//! board after construction: rules produce fresh boards, and the search hands
//! ownership of each child board down the recursion.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{
    CELL_DARK, CELL_EMPTY, CELL_LIGHT, GLYPH_DARK, GLYPH_EMPTY, GLYPH_LIGHT, MAX_SIZE,
};

/// One of the two sides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Player 1, moves first.
    Dark,
    /// Player 2.
    Light,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Color::Dark => Color::Light,
            Color::Light => Color::Dark,
        }
    }

    /// Decode a wire value (`1` or `2`).
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            CELL_DARK => Some(Color::Dark),
            CELL_LIGHT => Some(Color::Light),
            _ => None,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            Color::Dark => CELL_DARK,
            Color::Light => CELL_LIGHT,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Dark => write!(f, "dark"),
            Color::Light => write!(f, "light"),
        }
    }
}

/// A claim at (column, row). Carries no side information.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub column: usize,
    pub row: usize,
}

impl Move {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.row)
    }
}

/// Errors produced while decoding a board from its textual form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("board is empty")]
    Empty,

    #[error("board side {0} is outside 1..={max}", max = MAX_SIZE)]
    BadSize(usize),

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("invalid cell value {value:?} at row {row}")]
    BadCell { row: usize, value: String },

    #[error("unbalanced brackets in board encoding")]
    Brackets,
}

/// An immutable n x n grid. Two boards are equal iff all cells match, so the
/// board itself is the canonical cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl Board {
    /// An empty board.
    pub fn new(size: usize) -> Result<Self, ParseError> {
        if size == 0 || size > MAX_SIZE {
            return Err(ParseError::BadSize(size));
        }
        Ok(Self {
            size,
            cells: vec![None; size * size],
        })
    }

    /// The standard opening: four disks in the centre, light on the main diagonal.
    /// Odd sizes place the block just above and left of the centre.
    pub fn starting(size: usize) -> Result<Self, ParseError> {
        if size < 2 {
            return Err(ParseError::BadSize(size));
        }
        let mut board = Self::new(size)?;
        let lo = size / 2 - 1;
        let hi = size / 2;
        board.set(lo, lo, Some(Color::Light));
        board.set(hi, hi, Some(Color::Light));
        board.set(hi, lo, Some(Color::Dark));
        board.set(lo, hi, Some(Color::Dark));
        Ok(board)
    }

    /// Build a board from rows of wire values.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, ParseError> {
        if rows.is_empty() {
            return Err(ParseError::Empty);
        }
        let mut board = Self::new(rows.len())?;
        for (y, row) in rows.iter().enumerate() {
            if row.len() != board.size {
                return Err(ParseError::RaggedRow {
                    row: y,
                    found: row.len(),
                    expected: board.size,
                });
            }
            for (x, &value) in row.iter().enumerate() {
                let cell = match value {
                    CELL_EMPTY => None,
                    other => Some(Color::from_wire(other).ok_or_else(|| ParseError::BadCell {
                        row: y,
                        value: other.to_string(),
                    })?),
                };
                board.set(x, y, cell);
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    /// Cell at (column, row), or `None` when empty or off the board.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.cells[self.idx(x, y)]
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    /// Crate-internal mutation used while a fresh board is being assembled.
    pub(crate) fn set(&mut self, x: usize, y: usize, cell: Option<Color>) {
        let i = self.idx(x, y);
        self.cells[i] = cell;
    }

    /// Number of disks of `color`.
    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    /// Rows of wire values, the inverse of [`Board::from_rows`].
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size)
            .map(|row| {
                row.iter()
                    .map(|c| c.map(Color::to_wire).unwrap_or(CELL_EMPTY))
                    .collect()
            })
            .collect()
    }

    /// The manager's encoding: `[[0, 1], [2, 0]]`.
    pub fn encode(&self) -> String {
        let rows: Vec<String> = self
            .to_rows()
            .iter()
            .map(|row| {
                let cells: Vec<String> = row.iter().map(u8::to_string).collect();
                format!("[{}]", cells.join(", "))
            })
            .collect();
        format!("[{}]", rows.join(", "))
    }
}

impl FromStr for Board {
    type Err = ParseError;

    /// Parse the manager's list-of-rows encoding. Whitespace is ignored;
    /// tuples in place of lists are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '(' => '[',
                ')' => ']',
                other => other,
            })
            .collect();

        let inner = compact
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or(ParseError::Brackets)?;
        if inner.is_empty() {
            return Err(ParseError::Empty);
        }

        // Rows are `[...]` groups separated by single commas.
        let mut rows = Vec::new();
        let mut rest = inner;
        loop {
            let body = rest.strip_prefix('[').ok_or(ParseError::Brackets)?;
            let end = body.find(']').ok_or(ParseError::Brackets)?;
            let text = &body[..end];
            if text.contains('[') {
                return Err(ParseError::Brackets);
            }
            rows.push(parse_row(text, rows.len())?);
            rest = &body[end + 1..];
            if rest.is_empty() {
                break;
            }
            rest = rest.strip_prefix(',').ok_or(ParseError::Brackets)?;
        }
        Board::from_rows(&rows)
    }
}

fn parse_row(text: &str, row: usize) -> Result<Vec<u8>, ParseError> {
    text.split(',')
        .map(|cell| {
            cell.parse::<u8>().map_err(|_| ParseError::BadCell {
                row,
                value: cell.to_string(),
            })
        })
        .collect()
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                let ch = match self.get(x, y) {
                    Some(Color::Dark) => GLYPH_DARK,
                    Some(Color::Light) => GLYPH_LIGHT,
                    None => GLYPH_EMPTY,
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
