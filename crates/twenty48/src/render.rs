//! # Rendering Contract
//!
//! What a frontend needs to draw the game, and a plain-text frontend.
//!
//! ```text
//! ┌────────────────────────────┐
//! │ score 812      best 5120   │
//! ├──────┬──────┬──────┬───────┤
//! │  2   │  .   │  .   │  .    │   each cell: value, scaled by its
//! │  4   │  8   │  .   │  .    │   TileTransforms entry while a pulse
//! │  .   │  .   │  .   │  .    │   is in flight
//! │  .   │  .   │  .   │  2*   │   * = most recent spawn
//! └──────┴──────┴──────┴───────┘
//!   overlay (title + accent) blocks input until a new game
//! ```

use std::fmt::Write as _;
use std::io::Write;

use twenty48_core::{Grid, Position};
use twenty48_ui::TileTransforms;

use crate::error::{GameError, GameResult};
use crate::events::GameEvent;

/// Blocking message drawn over the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Overlay {
    /// Headline text.
    pub title: &'static str,
    /// Border colour, `#rrggbb`.
    pub accent: &'static str,
}

impl Overlay {
    /// Shown when the win tile appears.
    pub const WON: Self = Self {
        title: "You Win!",
        accent: "#edc22e",
    };

    /// Shown when no move is left.
    pub const LOST: Self = Self {
        title: "Game Over",
        accent: "#776e65",
    };
}

/// Everything needed to draw the board once.
#[derive(Clone, Copy, Debug)]
pub struct BoardFrame<'a> {
    /// Tiles.
    pub grid: &'a Grid,
    /// Current score.
    pub score: u64,
    /// Best score.
    pub high_score: u64,
    /// Most recent spawn, drawn highlighted.
    pub last_spawned: Option<Position>,
    /// Per-cell pulse scales.
    pub transforms: &'a TileTransforms,
}

/// A drawing surface driven by [`GameEvent`]s.
pub trait Renderer {
    /// Draws the whole board.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be written.
    fn redraw(&mut self, frame: &BoardFrame<'_>) -> GameResult<()>;

    /// Draws a blocking overlay.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be written.
    fn show_overlay(&mut self, overlay: Overlay) -> GameResult<()>;

    /// Removes the overlay.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be written.
    fn clear_overlay(&mut self) -> GameResult<()>;

    /// Shows or hides the debug controls.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be written.
    fn set_debug_panel(&mut self, visible: bool) -> GameResult<()>;
}

/// Routes one event to the matching [`Renderer`] call.
///
/// # Errors
///
/// Propagates the renderer's error.
pub fn apply_event<R: Renderer + ?Sized>(
    renderer: &mut R,
    event: &GameEvent,
    transforms: &TileTransforms,
) -> GameResult<()> {
    match event {
        GameEvent::Redraw {
            grid,
            score,
            high_score,
            last_spawned,
        } => renderer.redraw(&BoardFrame {
            grid,
            score: *score,
            high_score: *high_score,
            last_spawned: *last_spawned,
            transforms,
        }),
        GameEvent::OverlayShown(overlay) => renderer.show_overlay(*overlay),
        GameEvent::OverlayCleared => renderer.clear_overlay(),
        GameEvent::DebugPanel { visible } => renderer.set_debug_panel(*visible),
    }
}

/// Draws the board as text.
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
    overlay: Option<Overlay>,
    debug_panel: bool,
}

impl<W: Write> TextRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            overlay: None,
            debug_panel: false,
        }
    }

    /// The overlay currently drawn.
    #[must_use]
    pub const fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    /// Returns true if the debug controls are drawn.
    #[must_use]
    pub const fn debug_panel(&self) -> bool {
        self.debug_panel
    }

    /// Consumes the renderer and returns its output.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) -> GameResult<()> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|source| GameError::Io {
                path: "<terminal>".into(),
                source,
            })
    }
}

/// Text for one cell: the value, `.` when empty, `*` after the latest spawn,
/// `+` while swelling and `-` while still growing in.
fn cell_text(value: u32, is_new: bool, scale: f32) -> String {
    if value == 0 {
        return ".".to_owned();
    }
    let marker = if is_new {
        "*"
    } else if scale > 1.0 + f32::EPSILON {
        "+"
    } else if scale < 1.0 - f32::EPSILON {
        "-"
    } else {
        ""
    };
    format!("{value}{marker}")
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn redraw(&mut self, frame: &BoardFrame<'_>) -> GameResult<()> {
        let mut text = String::new();
        writeln!(text, "score {:<8} best {}", frame.score, frame.high_score)?;
        for row in 0..twenty48_core::GRID_SIZE {
            for col in 0..twenty48_core::GRID_SIZE {
                let pos = Position::new(row, col);
                let cell = cell_text(
                    frame.grid.get(pos),
                    frame.last_spawned == Some(pos),
                    frame.transforms.scale(pos),
                );
                write!(text, "{cell:>6}")?;
            }
            text.push('\n');
        }
        if let Some(overlay) = self.overlay {
            writeln!(text, "== {} ==", overlay.title)?;
        }
        self.emit(&text)
    }

    fn show_overlay(&mut self, overlay: Overlay) -> GameResult<()> {
        self.overlay = Some(overlay);
        self.emit(&format!("== {} == (n for a new game)\n", overlay.title))
    }

    fn clear_overlay(&mut self) -> GameResult<()> {
        self.overlay = None;
        Ok(())
    }

    fn set_debug_panel(&mut self, visible: bool) -> GameResult<()> {
        self.debug_panel = visible;
        if visible {
            self.emit("[debug] win: force a win | lose: force a loss\n")
        } else {
            self.emit("[debug] hidden\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(grid: &Grid, last: Option<Position>, transforms: &TileTransforms) -> String {
        let mut renderer = TextRenderer::new(Vec::new());
        renderer
            .redraw(&BoardFrame {
                grid,
                score: 12,
                high_score: 40,
                last_spawned: last,
                transforms,
            })
            .unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_text_board_layout() {
        let grid = Grid::from_cells([[2, 0, 0, 0], [0, 4, 0, 0], [0, 0, 0, 0], [0, 0, 0, 2048]]);
        let text = render(&grid, Some(Position::new(1, 1)), &TileTransforms::new());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("score 12"));
        assert!(lines[0].ends_with("best 40"));
        assert_eq!(lines[1].split_whitespace().collect::<Vec<_>>(), ["2", ".", ".", "."]);
        assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), [".", "4*", ".", "."]);
        assert_eq!(lines[4].split_whitespace().last(), Some("2048"));
    }

    #[test]
    fn test_pulsing_cells_are_marked() {
        let grid = Grid::from_cells([[8, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut transforms = TileTransforms::new();
        transforms.set_scale(Position::new(0, 0), 1.2).unwrap();
        transforms.set_scale(Position::new(0, 1), 0.5).unwrap();

        let text = render(&grid, None, &transforms);
        let first_row: Vec<&str> = text.lines().nth(1).unwrap().split_whitespace().collect();
        assert_eq!(first_row, ["8+", "2-", ".", "."]);
    }

    #[test]
    fn test_events_route_to_renderer() {
        let mut renderer = TextRenderer::new(Vec::new());
        let transforms = TileTransforms::new();

        apply_event(&mut renderer, &GameEvent::OverlayShown(Overlay::LOST), &transforms).unwrap();
        assert_eq!(renderer.overlay(), Some(Overlay::LOST));

        apply_event(&mut renderer, &GameEvent::DebugPanel { visible: true }, &transforms).unwrap();
        assert!(renderer.debug_panel());

        apply_event(&mut renderer, &GameEvent::OverlayCleared, &transforms).unwrap();
        assert_eq!(renderer.overlay(), None);

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("Game Over"));
    }
}
