//! # Game Driver
//!
//! Wires a session to a renderer and runs one input at a time:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │ 1. INPUT    command ──> GameSession::dispatch             │
//! │                          (grid, score, latch, save)       │
//! │ 2. EVENTS   drain bus ──> Renderer (redraw, overlay, ...) │
//! │ 3. ANIMATE  tick pulses at the cadence until idle         │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! An input is fully processed before the next one is read.

use std::time::Duration;

use twenty48_ui::AnimationFailure;

use crate::config::GameConfig;
use crate::error::GameResult;
use crate::events::{EventBus, EventReceiver};
use crate::input::Command;
use crate::persistence::StateStore;
use crate::render::{apply_event, Renderer};
use crate::session::{GameSession, RestoreOutcome};

/// Owns a session, its event receiver and a renderer.
pub struct GameDriver<S: StateStore, R: Renderer> {
    session: GameSession<S>,
    events: EventReceiver,
    renderer: R,
    inputs: u64,
}

impl<S: StateStore, R: Renderer> GameDriver<S, R> {
    /// Creates a driver with a fresh session.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(config: &GameConfig, store: S, renderer: R) -> GameResult<Self> {
        let (sender, events) = EventBus::create_pair(config.event_capacity);
        let session = GameSession::new(config, store, sender)?;
        Ok(Self::with_session(session, events, renderer))
    }

    /// Wraps an existing session. `events` must receive what the session sends.
    pub const fn with_session(session: GameSession<S>, events: EventReceiver, renderer: R) -> Self {
        Self {
            session,
            events,
            renderer,
            inputs: 0,
        }
    }

    /// Restores the saved game and draws it.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    pub fn start(&mut self) -> GameResult<RestoreOutcome> {
        let outcome = self.session.restore();
        self.render_pending()?;
        Ok(outcome)
    }

    /// Runs one command and draws its effects.
    ///
    /// Returns `false` once the player quit.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    pub fn submit(&mut self, command: Command) -> GameResult<bool> {
        self.inputs += 1;
        tracing::debug!("input {}: {command}", self.inputs);
        let running = self.session.dispatch(command);
        self.render_pending()?;
        Ok(running)
    }

    /// Sends every pending session event to the renderer.
    ///
    /// Returns how many events were drawn.
    ///
    /// # Errors
    ///
    /// Returns the first drawing error; later events stay queued.
    pub fn render_pending(&mut self) -> GameResult<usize> {
        let mut drawn = 0;
        while let Some(event) = self.events.try_recv() {
            let transforms = self.session.transforms().lock();
            apply_event(&mut self.renderer, &event, &transforms)?;
            drawn += 1;
        }
        Ok(drawn)
    }

    /// Plays running pulses to the end, calling `sleep` between ticks.
    pub fn animate<F>(&mut self, sleep: F) -> Vec<AnimationFailure>
    where
        F: FnMut(Duration),
    {
        self.session.run_animations_until_idle(sleep)
    }

    /// Saves on the way out.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the save fails.
    pub fn shutdown(&mut self) -> GameResult<()> {
        self.session.shutdown()
    }

    /// Number of commands processed.
    #[must_use]
    pub const fn inputs(&self) -> u64 {
        self.inputs
    }

    /// The session.
    #[must_use]
    pub const fn session(&self) -> &GameSession<S> {
        &self.session
    }

    /// The renderer.
    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::render::{Overlay, TextRenderer};
    use twenty48_core::Direction;

    fn driver() -> GameDriver<MemoryStore, TextRenderer<Vec<u8>>> {
        let config = GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        };
        GameDriver::new(&config, MemoryStore::new(), TextRenderer::new(Vec::new())).unwrap()
    }

    #[test]
    fn test_start_draws_the_opening_board() {
        let mut driver = driver();
        assert_eq!(driver.start().unwrap(), RestoreOutcome::Started);
        assert_eq!(driver.session().grid().tile_count(), 2);
        assert!(!driver.events.has_events());
    }

    #[test]
    fn test_commands_reach_the_renderer() {
        let mut driver = driver();
        driver.start().unwrap();

        assert!(driver.submit(Command::ForceLoss).unwrap());
        assert_eq!(driver.renderer().overlay(), None);

        assert!(driver.submit(Command::ToggleDebug).unwrap());
        assert!(driver.renderer().debug_panel());
        assert!(driver.submit(Command::ForceLoss).unwrap());
        assert_eq!(driver.renderer().overlay(), Some(Overlay::LOST));

        assert!(driver.submit(Command::Move(Direction::Left)).unwrap());
        assert_eq!(driver.render_pending().unwrap(), 0);

        assert!(driver.submit(Command::NewGame).unwrap());
        assert_eq!(driver.renderer().overlay(), None);

        assert!(!driver.submit(Command::Quit).unwrap());
        assert_eq!(driver.inputs(), 6);
    }
}
