//! # TWENTY48 Core
//!
//! Pure board logic for a 4x4 sliding-tile puzzle.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                      ONE MOVE                          │
//! ├────────────────────────────────────────────────────────┤
//! │  Grid + Direction → apply_move → MoveResult            │
//! │                                     │                  │
//! │                        changed? ────┴──> spawn_one     │
//! │                                              │         │
//! │                                    is_terminal(grid)   │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Values in, values out** - the engine takes a `Grid` and returns a new one
//! 2. **No hidden randomness** - only the spawner touches an RNG, and it is seedable
//! 3. **Bounded work** - every call inspects at most 16 cells a constant number of times
//!
//! ## Example
//!
//! ```rust
//! use twenty48_core::{apply_move, Direction, Grid};
//!
//! let grid = Grid::from_cells([
//!     [2, 2, 0, 0],
//!     [0, 0, 0, 0],
//!     [0, 0, 0, 0],
//!     [0, 0, 0, 0],
//! ]);
//! let result = apply_move(&grid, Direction::Left);
//! assert!(result.changed);
//! assert_eq!(result.score_delta, 4);
//! assert_eq!(result.grid.row(0), [4, 0, 0, 0]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod engine;
pub mod error;
pub mod grid;
pub mod spawner;

pub use engine::{apply_move, can_move, is_terminal, legal_moves, MergeEvent, MoveResult, Terminal};
pub use error::{CoreError, CoreResult};
pub use grid::{Direction, Grid, Position, GRID_SIZE, MAX_TILE, WIN_TILE};
pub use spawner::{place_fixed, spawn_one, SpawnWeights, TileSpawner};
