//! # TWENTY48 UI
//!
//! Time-driven animation for the board, decoupled from any drawing surface.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                   ANIMATION PIPELINE                   │
//! ├────────────────────────────────────────────────────────┤
//! │  submit_pulse → AnimationScheduler → TileTransforms    │
//! │                        ↑                    ↓          │
//! │                 external tick          renderer reads  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! The scheduler is generic: it only knows about progress callbacks. The
//! pulse module is the one place that knows callbacks scale board cells.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animation;
pub mod clock;
pub mod error;
pub mod pulse;
pub mod scheduler;

pub use animation::Easing;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AnimationError, AnimationResult};
pub use pulse::{submit_pulse, Pulse, PulseSpec, SharedTransforms, TileTransforms};
pub use scheduler::{
    AnimationFailure, AnimationId, AnimationScheduler, CompleteFn, FailureStage, ProgressFn,
    TickReport,
};
