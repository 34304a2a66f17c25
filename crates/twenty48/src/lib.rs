//! # TWENTY48
//!
//! The playable game: a session around the board engine, saved games,
//! settings and a terminal frontend.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  Command   ┌─────────────┐  GameEvent  ┌──────────┐
//! │  input   │──────────> │ GameSession │───────────> │ Renderer │
//! └──────────┘            └─────────────┘   (bus)     └──────────┘
//!                           │    │    │                    ↑
//!              twenty48_core│    │    │ pulses             │ reads
//!          (apply_move, ...)│    │    └──> AnimationScheduler ──> TileTransforms
//!                           │    └──> StateStore (JSON file)
//!                           └──> GameConfig (TOML)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use twenty48::{Command, EventBus, GameConfig, GameSession, MemoryStore, Phase};
//!
//! let config = GameConfig { seed: Some(1), ..GameConfig::default() };
//! let (sender, _receiver) = EventBus::create_pair(64);
//! let mut session = GameSession::new(&config, MemoryStore::new(), sender).unwrap();
//!
//! session.new_game();
//! assert_eq!(session.grid().tile_count(), 2);
//!
//! session.dispatch(Command::ToggleDebug);
//! session.dispatch(Command::ForceLoss);
//! assert_eq!(session.phase(), Phase::Lost);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod input;
pub mod persistence;
pub mod render;
pub mod session;

pub use config::{AnimationConfig, GameConfig, SpawnConfig};
pub use driver::GameDriver;
pub use error::{GameError, GameResult};
pub use events::{EventBus, EventReceiver, EventSender, GameEvent};
pub use input::{parse_command, Command};
pub use persistence::{JsonFileStore, MemoryStore, PersistedState, StateStore};
pub use render::{apply_event, BoardFrame, Overlay, Renderer, TextRenderer};
pub use session::{GameSession, MoveOutcome, Phase, RestoreOutcome};
