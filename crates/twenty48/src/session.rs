//! # Game Session
//!
//! Owns one game: the board, the scores, the terminal latch and the pulses
//! that decorate each move.
//!
//! ## Move Pipeline
//!
//! ```text
//! handle_move(dir)
//!   │
//!   ├─ overlay up? ───────────────> Ignored
//!   │
//!   ├─ apply_move(grid, dir)
//!   │     changed: commit grid, add score, spawn one tile,
//!   │              redraw, merge pulses, spawn pulse
//!   │
//!   ├─ high_score = max(high_score, score)
//!   ├─ is_terminal(grid) ─ Won/Lost ─> latch + overlay
//!   └─ save (failure logged, move kept)
//! ```
//!
//! ## Phases
//!
//! ```text
//!            terminal check
//! Playing ───────────────────> Won | Lost
//!    ^                              │
//!    └──── new_game / debug force ──┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use twenty48_core::{
    apply_move, is_terminal, legal_moves, Direction, Grid, MergeEvent, Position, Terminal,
    TileSpawner,
};
use twenty48_ui::{
    submit_pulse, AnimationFailure, AnimationScheduler, Clock, PulseSpec, SharedTransforms,
    SystemClock, TickReport, TileTransforms,
};

use crate::config::GameConfig;
use crate::error::GameResult;
use crate::events::{EventSender, GameEvent};
use crate::input::Command;
use crate::persistence::{PersistedState, StateStore};
use crate::render::Overlay;

/// Board used by [`GameSession::force_loss`]: full, with no equal neighbours.
pub const FORCED_LOSS_BOARD: [[u32; 4]; 4] = [
    [2, 4, 8, 16],
    [32, 64, 128, 256],
    [512, 1024, 2, 4],
    [8, 16, 32, 64],
];

/// Cell that receives the win tile in [`GameSession::force_win`].
pub const FORCED_WIN_CELL: Position = Position::new(3, 3);

/// Where a game stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Moves are accepted.
    #[default]
    Playing,
    /// The win tile appeared. Moves are ignored until a new game.
    Won,
    /// No move is left. Moves are ignored until a new game.
    Lost,
}

impl Phase {
    /// Returns true once the game has ended.
    #[inline]
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Playing)
    }

    /// Overlay for this phase, if any.
    #[must_use]
    pub const fn overlay(self) -> Option<Overlay> {
        match self {
            Self::Playing => None,
            Self::Won => Some(Overlay::WON),
            Self::Lost => Some(Overlay::LOST),
        }
    }
}

impl From<Terminal> for Phase {
    fn from(terminal: Terminal) -> Self {
        match terminal {
            Terminal::Ongoing => Self::Playing,
            Terminal::Won => Self::Won,
            Terminal::Lost => Self::Lost,
        }
    }
}

/// What a move did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The game is over; the move was not applied.
    Ignored,
    /// Nothing could slide that way.
    Unchanged,
    /// Tiles moved.
    Moved {
        /// Points gained.
        score_delta: u64,
        /// Merges, in final-board coordinates.
        merges: Vec<MergeEvent>,
        /// Where the new tile landed.
        spawned: Option<Position>,
    },
}

/// How start-up went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The saved game was resumed.
    Resumed,
    /// Nothing to resume; a new game started.
    Started,
    /// The saved game could not be used; a new game started.
    Recovered,
}

/// A single game of 2048.
pub struct GameSession<S: StateStore> {
    grid: Grid,
    score: u64,
    high_score: u64,
    last_spawned: Option<Position>,
    phase: Phase,
    debug_visible: bool,
    win_tile: u32,
    spawner: TileSpawner,
    store: S,
    events: EventSender,
    scheduler: AnimationScheduler,
    transforms: SharedTransforms,
    spawn_pulse: PulseSpec,
    merge_pulse: PulseSpec,
}

impl<S: StateStore> GameSession<S> {
    /// Creates a session with an empty board.
    ///
    /// Call [`Self::restore`] or [`Self::new_game`] before playing.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(config: &GameConfig, store: S, events: EventSender) -> GameResult<Self> {
        Self::with_clock(config, store, events, Arc::new(SystemClock))
    }

    /// Creates a session whose animations run against `clock`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn with_clock(
        config: &GameConfig,
        store: S,
        events: EventSender,
        clock: Arc<dyn Clock>,
    ) -> GameResult<Self> {
        config.validate()?;
        let weights = config.spawn_weights()?;
        let spawner = match config.seed {
            Some(seed) => TileSpawner::seeded(weights, seed),
            None => TileSpawner::new(weights),
        };

        Ok(Self {
            grid: Grid::EMPTY,
            score: 0,
            high_score: 0,
            last_spawned: None,
            phase: Phase::Playing,
            debug_visible: false,
            win_tile: config.win_tile,
            spawner,
            store,
            events,
            scheduler: AnimationScheduler::with_clock(config.animation.fps, clock),
            transforms: TileTransforms::shared(),
            spawn_pulse: config.animation.spawn_pulse(),
            merge_pulse: config.animation.merge_pulse(),
        })
    }

    /// Loads the saved game, or starts a new one if there is nothing usable.
    ///
    /// A saved board that is empty or malformed starts a new game but keeps
    /// the saved high score when it could be read. A saved board that is
    /// already won or lost comes back with its overlay up.
    pub fn restore(&mut self) -> RestoreOutcome {
        let saved = match self.store.load() {
            Ok(Some(saved)) => saved,
            Ok(None) => {
                tracing::info!("no saved game, starting fresh");
                self.new_game();
                return RestoreOutcome::Started;
            }
            Err(err) => {
                tracing::warn!("could not load saved game: {err}");
                self.new_game();
                return RestoreOutcome::Recovered;
            }
        };

        self.high_score = self.high_score.max(saved.high_score);

        let grid = match saved.grid() {
            Ok(grid) if !grid.is_empty() => grid,
            Ok(_) => {
                tracing::info!("saved board is empty, starting fresh");
                self.new_game();
                return RestoreOutcome::Started;
            }
            Err(err) => {
                tracing::warn!("saved board rejected: {err}");
                self.new_game();
                return RestoreOutcome::Recovered;
            }
        };

        self.reset_board(grid, saved.score, saved.last_spawned());
        self.high_score = self.high_score.max(self.score);
        self.emit_redraw();
        self.evaluate_terminal();
        tracing::info!(
            "resumed game: score {}, best {}, phase {:?}",
            self.score,
            self.high_score,
            self.phase
        );
        RestoreOutcome::Resumed
    }

    /// Applies one move.
    pub fn handle_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.phase.is_over() {
            tracing::trace!("ignoring {direction}: game is {:?}", self.phase);
            return MoveOutcome::Ignored;
        }

        let result = apply_move(&self.grid, direction);
        let outcome = if result.changed {
            self.grid = result.grid;
            self.score += result.score_delta;

            let spawned = self.spawner.spawn_one(&self.grid).map(|(grid, pos)| {
                self.grid = grid;
                pos
            });
            if spawned.is_some() {
                self.last_spawned = spawned;
            }

            self.emit_redraw();
            for merge in &result.merges {
                submit_pulse(
                    &mut self.scheduler,
                    &self.transforms,
                    merge.position(),
                    self.merge_pulse,
                );
            }
            if let Some(pos) = spawned {
                submit_pulse(&mut self.scheduler, &self.transforms, pos, self.spawn_pulse);
            }

            MoveOutcome::Moved {
                score_delta: result.score_delta,
                merges: result.merges,
                spawned,
            }
        } else {
            tracing::debug!(
                "{direction} moves nothing; open moves: {:?}",
                legal_moves(&self.grid)
            );
            MoveOutcome::Unchanged
        };

        self.high_score = self.high_score.max(self.score);
        self.evaluate_terminal();
        self.persist();
        outcome
    }

    /// Starts over: clears the overlay and score and places two `2` tiles.
    pub fn new_game(&mut self) {
        let (grid, seeds) = self.spawner.opening();
        self.reset_board(grid, 0, Some(seeds[1]));
        self.emit_redraw();
        for pos in seeds {
            submit_pulse(&mut self.scheduler, &self.transforms, pos, self.spawn_pulse);
        }
        tracing::info!("new game started, best {}", self.high_score);
        self.persist();
    }

    /// Runs a player command.
    ///
    /// Returns `false` once the player asked to quit; the session has saved
    /// by then. Debug commands only run while the debug panel is shown.
    pub fn dispatch(&mut self, command: Command) -> bool {
        if command.is_debug() && !self.debug_visible {
            tracing::debug!("ignoring {command}: debug panel hidden");
            return true;
        }
        match command {
            Command::Move(direction) => {
                self.handle_move(direction);
            }
            Command::NewGame => self.new_game(),
            Command::ToggleDebug => {
                self.toggle_debug_panel();
            }
            Command::ForceWin => self.force_win(),
            Command::ForceLoss => self.force_loss(),
            Command::Quit => {
                if let Err(err) = self.shutdown() {
                    tracing::warn!("could not save on exit: {err}");
                }
                return false;
            }
        }
        true
    }

    /// Shows or hides the debug controls. Returns the new visibility.
    pub fn toggle_debug_panel(&mut self) -> bool {
        self.debug_visible = !self.debug_visible;
        tracing::info!(
            "debug panel {}",
            if self.debug_visible { "shown" } else { "hidden" }
        );
        self.events.send(GameEvent::DebugPanel {
            visible: self.debug_visible,
        });
        self.debug_visible
    }

    /// Debug: a board holding only the win tile, then the win overlay.
    pub fn force_win(&mut self) {
        tracing::info!("debug: forcing a win");
        let grid = Grid::EMPTY.with(FORCED_WIN_CELL, self.win_tile);
        self.reset_board(grid, 0, None);
        self.emit_redraw();
        self.latch(Terminal::Won);
    }

    /// Debug: a full board with no merge left, then the loss overlay.
    pub fn force_loss(&mut self) {
        tracing::info!("debug: forcing a loss");
        self.reset_board(Grid::from_cells(FORCED_LOSS_BOARD), 0, None);
        self.emit_redraw();
        self.evaluate_terminal();
    }

    /// Saves the game and drops any running animation.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the final save fails.
    pub fn shutdown(&mut self) -> GameResult<()> {
        self.scheduler.clear();
        self.transforms.lock().reset_all();
        self.store.save(&self.snapshot())?;
        tracing::info!("game saved on exit: score {}, best {}", self.score, self.high_score);
        Ok(())
    }

    /// The state that gets saved.
    #[must_use]
    pub fn snapshot(&self) -> PersistedState {
        PersistedState::capture(&self.grid, self.score, self.high_score, self.last_spawned)
    }

    /// Advances running pulses to the clock's current time.
    pub fn tick_animations(&mut self) -> TickReport {
        self.scheduler.advance()
    }

    /// Ticks pulses until none is left, calling `sleep` between ticks.
    pub fn run_animations_until_idle<F>(&mut self, sleep: F) -> Vec<AnimationFailure>
    where
        F: FnMut(Duration),
    {
        self.scheduler.run_until_idle(sleep)
    }

    /// Returns true while pulses are running.
    #[must_use]
    pub const fn wants_tick(&self) -> bool {
        self.scheduler.wants_tick()
    }

    /// Delay between animation ticks.
    #[must_use]
    pub const fn animation_cadence(&self) -> Duration {
        self.scheduler.cadence()
    }

    /// Current board.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Best score so far.
    #[must_use]
    pub const fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Most recent spawn.
    #[must_use]
    pub const fn last_spawned(&self) -> Option<Position> {
        self.last_spawned
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns true if the debug controls are shown.
    #[must_use]
    pub const fn debug_visible(&self) -> bool {
        self.debug_visible
    }

    /// Per-cell pulse scales for renderers.
    #[must_use]
    pub const fn transforms(&self) -> &SharedTransforms {
        &self.transforms
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Replaces the board wholesale and drops the overlay and any pulse.
    fn reset_board(&mut self, grid: Grid, score: u64, last_spawned: Option<Position>) {
        if self.phase.is_over() {
            self.phase = Phase::Playing;
            self.events.send(GameEvent::OverlayCleared);
        }
        self.scheduler.clear();
        self.transforms.lock().reset_all();
        self.grid = grid;
        self.score = score;
        self.last_spawned = last_spawned;
    }

    fn evaluate_terminal(&mut self) {
        self.latch(is_terminal(&self.grid, self.win_tile));
    }

    fn latch(&mut self, terminal: Terminal) {
        if !terminal.is_over() || self.phase.is_over() {
            return;
        }
        self.phase = Phase::from(terminal);
        tracing::info!("game over: {:?} with score {}", self.phase, self.score);
        if let Some(overlay) = self.phase.overlay() {
            self.events.send(GameEvent::OverlayShown(overlay));
        }
    }

    fn emit_redraw(&self) {
        self.events.send(GameEvent::Redraw {
            grid: self.grid,
            score: self.score,
            high_score: self.high_score,
            last_spawned: self.last_spawned,
        });
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.snapshot()) {
            tracing::warn!("could not save game: {err}");
        }
    }
}

impl<S: StateStore> std::fmt::Debug for GameSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("grid", &self.grid)
            .field("score", &self.score)
            .field("high_score", &self.high_score)
            .field("phase", &self.phase)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}
