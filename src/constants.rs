//! Constants for board encoding, search bounds, and heuristic weights.
//!
//! Boards arrive from the game manager as a list of rows where each cell is
//! `0` (empty), `1` (dark, moves first) or `2` (light). The same digits are
//! used on the wire for colors in the configuration line.

// =============================================================================
// Board Encoding
// =============================================================================

/// Wire value of an empty cell.
pub const CELL_EMPTY: u8 = 0;

/// Wire value of a dark disk (player 1, moves first).
pub const CELL_DARK: u8 = 1;

/// Wire value of a light disk (player 2).
pub const CELL_LIGHT: u8 = 2;

/// Largest accepted side length. Keeps coordinates printable and bounds recursion.
pub const MAX_SIZE: usize = 26;

/// Side length of the demo board when none is given.
pub const DEFAULT_SIZE: usize = 8;

/// Character used by `Display` for an empty cell.
pub const GLYPH_EMPTY: char = '.';

/// Character used by `Display` for a dark disk.
pub const GLYPH_DARK: char = 'X';

/// Character used by `Display` for a light disk.
pub const GLYPH_LIGHT: char = 'O';

// =============================================================================
// Neighbor Offsets
// =============================================================================

/// The 8 scan directions as (column, row) steps.
/// Order: North, NE, East, SE, South, SW, West, NW
pub const DIRECTIONS: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

// =============================================================================
// Search Parameters
// =============================================================================

/// Unbounded sentinel for alpha-beta windows. Symmetric so that `-INF` is valid.
pub const INF: i32 = i32::MAX;

/// Depth limit used by the CLI when none is supplied.
pub const DEFAULT_DEPTH: u32 = 4;

/// Wire value that switches the depth limit off.
pub const UNLIMITED_DEPTH: i64 = -1;

// =============================================================================
// Heuristic Weights
// =============================================================================

/// Bonus for owning a corner.
pub const WEIGHT_CORNER: i32 = 25;

/// Penalty for a cell diagonally adjacent to an empty corner.
pub const WEIGHT_X_SQUARE: i32 = -8;

/// Penalty for a cell orthogonally adjacent to an empty corner.
pub const WEIGHT_C_SQUARE: i32 = -4;

/// Bonus for any other edge cell.
pub const WEIGHT_EDGE: i32 = 3;

/// Multiplier applied to the mobility differential.
pub const WEIGHT_MOBILITY: i32 = 5;
