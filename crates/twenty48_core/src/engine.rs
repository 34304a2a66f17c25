//! # Board Engine
//!
//! **Slide, merge, score and terminal detection.**
//!
//! Every function here is pure: the same grid and direction always give the
//! same [`MoveResult`]. No randomness, no I/O.
//!
//! ## Merge Rules
//!
//! Each line is read starting at the cell tiles slide toward:
//!
//! ```text
//! Right on [2, 0, 2, 4]
//!   read from the right:  [4, 2, 0, 2]
//!   compact:              [4, 2, 2]
//!   single pass:          4 | 2+2 -> 4
//!   pad + write back:     [0, 0, 4, 4]   merge at column 2
//! ```
//!
//! - A tile merges at most once per move; a merged tile is never re-examined.
//! - The pair closest to the destination merges first.

use crate::grid::{Direction, Grid, Position, GRID_SIZE};

/// One pair of equal tiles collapsing into a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MergeEvent {
    /// Row of the merged tile in the resulting grid.
    pub row: usize,
    /// Column of the merged tile in the resulting grid.
    pub col: usize,
    /// Value of the merged tile.
    pub value: u32,
}

impl MergeEvent {
    /// Position of the merged tile.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

/// Outcome of sliding the board in one direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveResult {
    /// The board after sliding and merging (before any spawn).
    pub grid: Grid,
    /// Every merge, in line order then destination-first order.
    pub merges: Vec<MergeEvent>,
    /// Sum of every merged value.
    pub score_delta: u64,
    /// True if any cell differs from the input.
    pub changed: bool,
}

/// Terminal state of a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Terminal {
    /// Play continues.
    #[default]
    Ongoing,
    /// The win tile is on the board.
    Won,
    /// The board is full and nothing can merge.
    Lost,
}

impl Terminal {
    /// Returns true for `Won` and `Lost`.
    #[inline]
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// A line after compaction and merging.
struct CollapsedLine {
    values: [u32; GRID_SIZE],
    /// `(slot, merged value)` for each merge, slot counted from the destination.
    merges: [(usize, u32); GRID_SIZE / 2],
    merge_count: usize,
    score: u64,
}

/// Compacts and merges one line read destination-first.
fn collapse_line(line: [u32; GRID_SIZE]) -> CollapsedLine {
    let mut compact = [0u32; GRID_SIZE];
    let mut len = 0;
    for value in line.into_iter().filter(|&v| v != 0) {
        compact[len] = value;
        len += 1;
    }

    let mut collapsed = CollapsedLine {
        values: [0; GRID_SIZE],
        merges: [(0, 0); GRID_SIZE / 2],
        merge_count: 0,
        score: 0,
    };

    let mut out = 0;
    let mut j = 0;
    while j < len {
        // Tiles past u32 range stay apart; only `Grid::from_cells` can build them.
        let merged = (j + 1 < len && compact[j] == compact[j + 1])
            .then(|| compact[j].checked_mul(2))
            .flatten();
        if let Some(merged) = merged {
            collapsed.values[out] = merged;
            collapsed.merges[collapsed.merge_count] = (out, merged);
            collapsed.merge_count += 1;
            collapsed.score += u64::from(merged);
            j += 2;
        } else {
            collapsed.values[out] = compact[j];
            j += 1;
        }
        out += 1;
    }

    collapsed
}

/// Slides every line of `grid` toward `direction`.
///
/// Pure and deterministic. A move that changes nothing reports
/// `changed == false` with no merges and a zero score delta.
#[must_use]
pub fn apply_move(grid: &Grid, direction: Direction) -> MoveResult {
    let mut next = *grid;
    let mut merges = Vec::new();
    let mut score_delta = 0;

    for index in 0..GRID_SIZE {
        let cells = direction.line(index);
        let line = cells.map(|pos| grid.get(pos));
        let collapsed = collapse_line(line);

        for (pos, value) in cells.into_iter().zip(collapsed.values) {
            next.set(pos, value);
        }
        for &(slot, value) in &collapsed.merges[..collapsed.merge_count] {
            let pos = cells[slot];
            merges.push(MergeEvent {
                row: pos.row,
                col: pos.col,
                value,
            });
        }
        score_delta += collapsed.score;
    }

    MoveResult {
        changed: next != *grid,
        grid: next,
        merges,
        score_delta,
    }
}

/// Returns true if sliding toward `direction` would change the board.
#[must_use]
pub fn can_move(grid: &Grid, direction: Direction) -> bool {
    apply_move(grid, direction).changed
}

/// Directions that would change the board.
#[must_use]
pub fn legal_moves(grid: &Grid) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&d| can_move(grid, d))
        .collect()
}

/// Classifies a board.
///
/// A board holding `win_tile` is `Won`, even when it is also full or stuck.
/// Otherwise a full board without any equal neighbours is `Lost`.
#[must_use]
pub fn is_terminal(grid: &Grid, win_tile: u32) -> Terminal {
    if grid.contains(win_tile) {
        Terminal::Won
    } else if grid.is_full() && !grid.has_adjacent_pair() {
        Terminal::Lost
    } else {
        Terminal::Ongoing
    }
}
