//! # Tile Pulses
//!
//! Scale animations for individual cells.
//!
//! ```text
//! spawn:   0.3 ──────────────> 1.0          (grow into place)
//! merge:   1.0 ──> 1.3 ──> 1.0              (bounce at the halfway mark)
//! ```
//!
//! Progress callbacks write the current scale into a shared
//! [`TileTransforms`]; renderers read it when they draw a cell. A finished
//! pulse resets its cell to scale `1.0`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use twenty48_core::{Position, GRID_SIZE};

use crate::animation::Easing;
use crate::error::{AnimationError, AnimationResult};
use crate::scheduler::{AnimationId, AnimationScheduler};

/// Per-cell scale factors, `1.0` meaning "drawn at rest".
#[derive(Clone, Debug, PartialEq)]
pub struct TileTransforms {
    scales: [[f32; GRID_SIZE]; GRID_SIZE],
}

/// Transforms shared between animation callbacks and the renderer.
pub type SharedTransforms = Arc<Mutex<TileTransforms>>;

impl TileTransforms {
    /// All cells at rest.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scales: [[1.0; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Creates a shared handle.
    #[must_use]
    pub fn shared() -> SharedTransforms {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Current scale of a cell, `1.0` for cells off the board.
    #[must_use]
    pub fn scale(&self, pos: Position) -> f32 {
        self.scales
            .get(pos.row)
            .and_then(|row| row.get(pos.col))
            .copied()
            .unwrap_or(1.0)
    }

    /// Sets the scale of a cell.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::TargetGone`] if the cell is off the board.
    pub fn set_scale(&mut self, pos: Position, scale: f32) -> AnimationResult<()> {
        let cell = self
            .scales
            .get_mut(pos.row)
            .and_then(|row| row.get_mut(pos.col))
            .ok_or_else(|| AnimationError::TargetGone(format!("tile {pos}")))?;
        *cell = scale;
        Ok(())
    }

    /// Puts every cell back at rest.
    pub fn reset_all(&mut self) {
        *self = Self::new();
    }

    /// Returns true if every cell is at rest.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.scales
            .iter()
            .flatten()
            .all(|&s| (s - 1.0).abs() < f32::EPSILON)
    }
}

impl Default for TileTransforms {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape of a pulse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pulse {
    /// Grow from `from` up to `1.0`.
    Grow {
        /// Scale at progress 0.
        from: f32,
        /// Curve applied to progress.
        easing: Easing,
    },
    /// Swell to `1.0 + amplitude` at the halfway mark, then settle back to `1.0`.
    Bounce {
        /// Extra scale at the peak.
        amplitude: f32,
        /// Curve applied to each half.
        easing: Easing,
    },
}

impl Pulse {
    /// Scale at `progress` in `[0, 1]`.
    #[must_use]
    pub fn scale_at(self, progress: f32) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        match self {
            Self::Grow { from, easing } => easing.lerp(from, 1.0, progress),
            Self::Bounce { amplitude, easing } => {
                if progress < 0.5 {
                    1.0 + amplitude * easing.apply(progress * 2.0)
                } else {
                    1.0 + amplitude * (1.0 - easing.apply((progress - 0.5) * 2.0))
                }
            }
        }
    }
}

/// A pulse together with how long it runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseSpec {
    /// Shape of the pulse.
    pub pulse: Pulse,
    /// Running time.
    pub duration: Duration,
}

impl PulseSpec {
    /// New-tile pulse: grow from 0.3 over 200ms.
    pub const SPAWN: Self = Self {
        pulse: Pulse::Grow {
            from: 0.3,
            easing: Easing::Linear,
        },
        duration: Duration::from_millis(200),
    };

    /// Merged-tile pulse: swell by 0.3 and settle over 120ms.
    pub const MERGE: Self = Self {
        pulse: Pulse::Bounce {
            amplitude: 0.3,
            easing: Easing::Linear,
        },
        duration: Duration::from_millis(120),
    };
}

/// Submits a pulse on one cell.
///
/// The progress callback writes the pulse's scale into `transforms`; the
/// completion callback puts the cell back at rest.
pub fn submit_pulse(
    scheduler: &mut AnimationScheduler,
    transforms: &SharedTransforms,
    pos: Position,
    spec: PulseSpec,
) -> AnimationId {
    let progress_target = Arc::clone(transforms);
    let rest_target = Arc::clone(transforms);
    let pulse = spec.pulse;

    scheduler.submit(
        spec.duration,
        move |progress| progress_target.lock().set_scale(pos, pulse.scale_at(progress)),
        Some(Box::new(move || rest_target.lock().set_scale(pos, 1.0))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_spawn_pulse_grows_into_place() {
        let pulse = PulseSpec::SPAWN.pulse;
        assert!(close(pulse.scale_at(0.0), 0.3));
        assert!(close(pulse.scale_at(0.5), 0.65));
        assert!(close(pulse.scale_at(1.0), 1.0));
    }

    #[test]
    fn test_merge_pulse_peaks_halfway() {
        let pulse = PulseSpec::MERGE.pulse;
        assert!(close(pulse.scale_at(0.0), 1.0));
        assert!(close(pulse.scale_at(0.25), 1.15));
        assert!(close(pulse.scale_at(0.5), 1.3));
        assert!(close(pulse.scale_at(0.75), 1.15));
        assert!(close(pulse.scale_at(1.0), 1.0));
    }

    #[test]
    fn test_off_board_cell_is_a_missing_target() {
        let mut transforms = TileTransforms::new();
        let err = transforms.set_scale(Position::new(4, 0), 0.5).unwrap_err();
        assert!(matches!(err, AnimationError::TargetGone(_)));
        assert!(close(transforms.scale(Position::new(4, 0)), 1.0));
    }

    #[test]
    fn test_submitted_pulse_writes_and_resets_scale() {
        let clock = Arc::new(ManualClock::new());
        let mut scheduler = AnimationScheduler::with_clock(60, clock.clone());
        let transforms = TileTransforms::shared();
        let pos = Position::new(1, 2);

        submit_pulse(&mut scheduler, &transforms, pos, PulseSpec::SPAWN);

        scheduler.advance();
        assert!(close(transforms.lock().scale(pos), 0.3));

        clock.advance(Duration::from_millis(100));
        scheduler.advance();
        assert!(close(transforms.lock().scale(pos), 0.65));

        clock.advance(Duration::from_millis(100));
        let report = scheduler.advance();
        assert_eq!(report.completed.len(), 1);
        assert!(transforms.lock().is_at_rest());
    }

    #[test]
    fn test_pulse_on_bad_cell_is_reported_not_raised() {
        let clock = Arc::new(ManualClock::new());
        let mut scheduler = AnimationScheduler::with_clock(60, clock.clone());
        let transforms = TileTransforms::shared();

        submit_pulse(&mut scheduler, &transforms, Position::new(0, 9), PulseSpec::MERGE);
        submit_pulse(&mut scheduler, &transforms, Position::new(0, 0), PulseSpec::MERGE);

        clock.advance(Duration::from_millis(60));
        let report = scheduler.advance();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(scheduler.active_count(), 1);
        assert!(close(transforms.lock().scale(Position::new(0, 0)), 1.3));
    }
}
