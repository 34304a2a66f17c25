//! # Tile Spawner
//!
//! **Weighted tile insertion with a seedable RNG.**
//!
//! After every move that changed the board, one tile appears in a uniformly
//! chosen empty cell. Its value is drawn from a fixed weighted distribution:
//!
//! ```text
//! value 2  ->  weight 6   (6/7)
//! value 4  ->  weight 1   (1/7)
//! ```
//!
//! The empty cell is picked by indexing into the list of empty cells, so the
//! cost is bounded even on a nearly full board.
//!
//! ## Determinism
//!
//! [`TileSpawner::seeded`] uses ChaCha8, so the same seed reproduces the same
//! sequence of spawns on every platform.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{CoreError, CoreResult};
use crate::grid::{Grid, Position};

/// Relative weights of the two spawnable values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnWeights {
    two: u32,
    four: u32,
}

impl SpawnWeights {
    /// The classic distribution: 2 with probability 6/7, 4 with 1/7.
    pub const CLASSIC: Self = Self { two: 6, four: 1 };

    /// Creates a weight table.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSpawnWeights`] if both weights are zero.
    pub fn new(two: u32, four: u32) -> CoreResult<Self> {
        if two == 0 && four == 0 {
            return Err(CoreError::InvalidSpawnWeights);
        }
        Ok(Self { two, four })
    }

    /// Weight of a `2` tile.
    #[inline]
    #[must_use]
    pub const fn two(&self) -> u32 {
        self.two
    }

    /// Weight of a `4` tile.
    #[inline]
    #[must_use]
    pub const fn four(&self) -> u32 {
        self.four
    }

    /// Probability of spawning a `4`.
    #[must_use]
    pub fn four_probability(&self) -> f64 {
        f64::from(self.four) / (f64::from(self.two) + f64::from(self.four))
    }

    /// Draws a tile value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let total = u64::from(self.two) + u64::from(self.four);
        if rng.gen_range(0..total) < u64::from(self.two) {
            2
        } else {
            4
        }
    }
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Picks a uniformly random empty cell, `None` on a full board.
pub fn choose_empty<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Option<Position> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }
    Some(empty[rng.gen_range(0..empty.len())])
}

/// Inserts one weighted tile into a random empty cell.
///
/// Returns the new grid and the chosen cell, or `None` if the board is full.
/// Callers only spawn after a move that changed the board, which always
/// leaves at least one empty cell.
pub fn spawn_one<R: Rng + ?Sized>(
    grid: &Grid,
    weights: &SpawnWeights,
    rng: &mut R,
) -> Option<(Grid, Position)> {
    let pos = choose_empty(grid, rng)?;
    let value = weights.sample(rng);
    Some((grid.with(pos, value), pos))
}

/// Inserts a tile of fixed `value` into a random empty cell.
///
/// Used for the seed tiles of a new game, which are always `2`.
pub fn place_fixed<R: Rng + ?Sized>(grid: &Grid, value: u32, rng: &mut R) -> Option<(Grid, Position)> {
    let pos = choose_empty(grid, rng)?;
    Some((grid.with(pos, value), pos))
}

/// Owns the RNG and weight table used by a game.
#[derive(Clone, Debug)]
pub struct TileSpawner {
    weights: SpawnWeights,
    rng: ChaCha8Rng,
}

impl TileSpawner {
    /// Value of both seed tiles of a new game.
    pub const SEED_TILE: u32 = 2;

    /// Creates a spawner seeded from operating system entropy.
    #[must_use]
    pub fn new(weights: SpawnWeights) -> Self {
        Self {
            weights,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Creates a reproducible spawner.
    #[must_use]
    pub fn seeded(weights: SpawnWeights, seed: u64) -> Self {
        Self {
            weights,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Returns the weight table.
    #[must_use]
    pub const fn weights(&self) -> SpawnWeights {
        self.weights
    }

    /// Inserts one weighted tile. See [`spawn_one`].
    pub fn spawn_one(&mut self, grid: &Grid) -> Option<(Grid, Position)> {
        spawn_one(grid, &self.weights, &mut self.rng)
    }

    /// Builds the opening board: two `2` tiles on distinct random cells.
    ///
    /// Returns the board and the two cells in placement order.
    pub fn opening(&mut self) -> (Grid, [Position; 2]) {
        let mut grid = Grid::EMPTY;
        let mut cells = [Position::new(0, 0); 2];
        for cell in &mut cells {
            // An empty board always has room for two tiles.
            if let Some((next, pos)) = place_fixed(&grid, Self::SEED_TILE, &mut self.rng) {
                grid = next;
                *cell = pos;
            }
        }
        (grid, cells)
    }
}
