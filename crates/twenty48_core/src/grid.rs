//! # The Board
//!
//! A fixed 4x4 grid of tiles. `0` is an empty cell; every other value is a
//! power of two >= 2. Rows are indexed top to bottom, columns left to right.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Side length of the board.
pub const GRID_SIZE: usize = 4;

/// Tile value that wins the game.
pub const WIN_TILE: u32 = 2048;

/// Largest tile a 4x4 board can build when fours spawn.
pub const MAX_TILE: u32 = 1 << 18;

/// A cell on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Row, 0 at the top.
    pub row: usize,
    /// Column, 0 at the left.
    pub col: usize,
}

impl Position {
    /// Creates a position. The caller guarantees both indices are below `GRID_SIZE`.
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Creates a position, rejecting indices outside the board.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfBounds`] if either index is >= `GRID_SIZE`.
    pub fn try_new(row: usize, col: usize) -> CoreResult<Self> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Ok(Self { row, col })
        } else {
            Err(CoreError::OutOfBounds { row, col })
        }
    }

    /// Row-major index in `0..16`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.row * GRID_SIZE + self.col
    }

    /// Inverse of [`Position::index`].
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self {
            row: index / GRID_SIZE,
            col: index % GRID_SIZE,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A direction to slide the tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Slide toward column 0.
    Left,
    /// Slide toward column 3.
    Right,
    /// Slide toward row 0.
    Up,
    /// Slide toward row 3.
    Down,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Parses a key name into a direction.
    ///
    /// Accepts the arrow key names (`Left`, `ArrowLeft`, ...), WASD and the
    /// vi keys (`h j k l`). Anything else is not a direction and yields `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        let key = key.strip_prefix("Arrow").unwrap_or(key);
        match key.to_ascii_lowercase().as_str() {
            "left" | "a" | "h" => Some(Self::Left),
            "right" | "d" | "l" => Some(Self::Right),
            "up" | "w" | "k" => Some(Self::Up),
            "down" | "s" | "j" => Some(Self::Down),
            _ => None,
        }
    }

    /// Returns true for the directions that read lines back to front.
    #[inline]
    #[must_use]
    pub const fn is_reversed(self) -> bool {
        matches!(self, Self::Right | Self::Down)
    }

    /// Returns true for the directions that operate on rows.
    #[inline]
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Cells of line `index` in the order tiles travel through them,
    /// destination first.
    ///
    /// For Left/Right the line is row `index`; for Up/Down it is column `index`.
    #[must_use]
    pub const fn line(self, index: usize) -> [Position; GRID_SIZE] {
        let mut cells = [Position::new(0, 0); GRID_SIZE];
        let mut k = 0;
        while k < GRID_SIZE {
            let along = if self.is_reversed() { GRID_SIZE - 1 - k } else { k };
            cells[k] = if self.is_horizontal() {
                Position::new(index, along)
            } else {
                Position::new(along, index)
            };
            k += 1;
        }
        cells
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Up => "Up",
            Self::Down => "Down",
        };
        f.write_str(name)
    }
}

/// The 4x4 board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid {
    cells: [[u32; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// A board with no tiles.
    pub const EMPTY: Self = Self {
        cells: [[0; GRID_SIZE]; GRID_SIZE],
    };

    /// Builds a grid from trusted cells (constants, test fixtures).
    ///
    /// Values are not validated; use [`Grid::try_from_rows`] for untrusted input.
    #[inline]
    #[must_use]
    pub const fn from_cells(cells: [[u32; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    /// Builds a grid from untrusted rows, such as a saved game.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidShape`] unless there are exactly 4 rows of
    /// 4 cells, and [`CoreError::InvalidTile`] for any value that is neither
    /// `0` nor a power of two between 2 and [`MAX_TILE`].
    pub fn try_from_rows<R: AsRef<[u32]>>(rows: &[R]) -> CoreResult<Self> {
        let row_lengths: Vec<usize> = rows.iter().map(|r| r.as_ref().len()).collect();
        if rows.len() != GRID_SIZE || row_lengths.iter().any(|&len| len != GRID_SIZE) {
            return Err(CoreError::InvalidShape {
                rows: rows.len(),
                row_lengths,
            });
        }

        let mut cells = [[0; GRID_SIZE]; GRID_SIZE];
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.as_ref().iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(CoreError::InvalidTile { row, col, value });
                }
                cells[row][col] = value;
            }
        }
        Ok(Self { cells })
    }

    /// Returns the raw cells, row-major.
    #[inline]
    #[must_use]
    pub const fn cells(&self) -> &[[u32; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Returns one row.
    #[inline]
    #[must_use]
    pub const fn row(&self, row: usize) -> [u32; GRID_SIZE] {
        self.cells[row]
    }

    /// Returns one column, top to bottom.
    #[must_use]
    pub fn column(&self, col: usize) -> [u32; GRID_SIZE] {
        std::array::from_fn(|row| self.cells[row][col])
    }

    /// Returns the rows as owned vectors (the saved-game layout).
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.cells.iter().map(|row| row.to_vec()).collect()
    }

    /// Value at a position.
    #[inline]
    #[must_use]
    pub const fn get(&self, pos: Position) -> u32 {
        self.cells[pos.row][pos.col]
    }

    /// Returns a copy of this grid with one cell replaced.
    #[inline]
    #[must_use]
    pub const fn with(mut self, pos: Position, value: u32) -> Self {
        self.cells[pos.row][pos.col] = value;
        self
    }

    /// Empty cells in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<Position> {
        self.positions().filter(|&pos| self.get(pos) == 0).collect()
    }

    /// Number of empty cells.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v == 0).count()
    }

    /// Number of tiles on the board.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        GRID_SIZE * GRID_SIZE - self.empty_count()
    }

    /// Returns true when no cell is empty.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|&v| v != 0)
    }

    /// Returns true when no cell holds a tile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|&v| v == 0)
    }

    /// Returns true if any cell holds `value`.
    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        self.cells.iter().flatten().any(|&v| v == value)
    }

    /// Returns true if two horizontally or vertically adjacent tiles are equal.
    ///
    /// Empty cells never count as a pair.
    #[must_use]
    pub fn has_adjacent_pair(&self) -> bool {
        let c = &self.cells;
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let v = c[row][col];
                if v == 0 {
                    continue;
                }
                if col + 1 < GRID_SIZE && c[row][col + 1] == v {
                    return true;
                }
                if row + 1 < GRID_SIZE && c[row + 1][col] == v {
                    return true;
                }
            }
        }
        false
    }

    /// Sum of every tile value.
    #[must_use]
    pub fn sum(&self) -> u64 {
        self.cells.iter().flatten().map(|&v| u64::from(v)).sum()
    }

    /// Largest tile on the board, `0` if empty.
    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Iterates every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        (0..GRID_SIZE * GRID_SIZE).map(Position::from_index)
    }

    pub(crate) fn set(&mut self, pos: Position, value: u32) {
        self.cells[pos.row][pos.col] = value;
    }
}

/// Returns true for `0` and powers of two from 2 to [`MAX_TILE`].
#[inline]
#[must_use]
pub const fn is_valid_tile(value: u32) -> bool {
    value == 0 || (value.is_power_of_two() && matches!(value, 2..=MAX_TILE))
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Grid").field(&self.cells).finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "+------+------+------+------+";
        writeln!(f, "{separator}")?;
        for row in &self.cells {
            for &value in row {
                if value == 0 {
                    write!(f, "|{:^6}", ".")?;
                } else {
                    write!(f, "|{value:^6}")?;
                }
            }
            writeln!(f, "|")?;
            writeln!(f, "{separator}")?;
        }
        Ok(())
    }
}
