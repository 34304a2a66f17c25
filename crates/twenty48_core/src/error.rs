//! # Core Error Types
//!
//! Errors raised when building boards or spawn tables from untrusted input.

use thiserror::Error;

/// Errors that can occur in the board engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The board does not have 4 rows of 4 cells.
    #[error("invalid board shape: expected 4x4, found {rows} rows (row lengths {row_lengths:?})")]
    InvalidShape {
        /// Number of rows found.
        rows: usize,
        /// Length of every row found.
        row_lengths: Vec<usize>,
    },

    /// A cell holds a value that is neither empty nor a power of two >= 2.
    #[error("invalid tile {value} at row {row}, column {col}")]
    InvalidTile {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// The rejected value.
        value: u32,
    },

    /// A position outside the 4x4 board.
    #[error("position ({row}, {col}) is outside the board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// Spawn weights that can never produce a tile.
    #[error("spawn weights must not both be zero")]
    InvalidSpawnWeights,
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
