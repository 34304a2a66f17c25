//! # Animation Scheduler
//!
//! **Progress-driven tweening on an external tick signal.**
//!
//! The scheduler owns a single set of active animations. Each animation is a
//! progress callback plus an optional completion callback; what the callback
//! drives (a tile's scale, a colour, a counter) is none of the scheduler's
//! business.
//!
//! ## Tick Loop
//!
//! ```text
//! submit() ──> first active animation? ──> wants_tick() = true
//!
//! driver: while wants_tick() { tick(now); sleep(cadence) }
//!
//! tick(now):
//!   for each animation:
//!     progress = clamp((now - start) / duration, 0, 1)
//!     progress_fn(progress)        error -> report, drop animation
//!     progress == 1 -> on_complete  error -> report
//!                   -> drop animation
//!   reschedule = active set not empty
//! ```
//!
//! Callback errors are isolated: they are logged, collected in the
//! [`TickReport`], and never stop the remaining animations.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};
use crate::error::{AnimationError, AnimationResult};

/// Callback receiving progress in `[0, 1]`.
pub type ProgressFn = Box<dyn FnMut(f32) -> AnimationResult<()> + Send>;

/// Callback run once when an animation reaches progress `1.0`.
pub type CompleteFn = Box<dyn FnOnce() -> AnimationResult<()> + Send>;

/// Identifies a submitted animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationId(u64);

impl AnimationId {
    /// Raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Which callback failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureStage {
    /// The progress callback.
    Progress,
    /// The completion callback.
    Completion,
}

/// A callback failure isolated during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationFailure {
    /// The animation whose callback failed.
    pub id: AnimationId,
    /// Which callback failed.
    pub stage: FailureStage,
    /// The error it returned.
    pub error: AnimationError,
}

/// What happened during one tick.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Animations that reached progress `1.0` and were removed.
    pub completed: Vec<AnimationId>,
    /// Callback failures, in the order they occurred.
    pub failures: Vec<AnimationFailure>,
    /// True if animations remain and the driver should tick again.
    pub reschedule: bool,
}

struct ActiveAnimation {
    id: AnimationId,
    start: Instant,
    duration: Duration,
    progress: ProgressFn,
    on_complete: Option<CompleteFn>,
}

impl ActiveAnimation {
    #[allow(clippy::cast_possible_truncation)]
    fn progress_at(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }
}

/// Drives a set of animations from an external tick.
pub struct AnimationScheduler {
    active: Vec<ActiveAnimation>,
    clock: Arc<dyn Clock>,
    cadence: Duration,
    next_id: u64,
    running: bool,
}

impl AnimationScheduler {
    /// Default tick rate.
    pub const DEFAULT_FPS: u32 = 60;

    /// Shortest accepted animation.
    pub const MIN_DURATION: Duration = Duration::from_millis(1);

    /// Creates a scheduler ticking at `fps` against the system clock.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self::with_clock(fps, Arc::new(SystemClock))
    }

    /// Creates a scheduler with a custom clock.
    #[must_use]
    pub fn with_clock(fps: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            active: Vec::new(),
            clock,
            cadence: Self::cadence_for_fps(fps),
            next_id: 0,
            running: false,
        }
    }

    /// Delay between ticks for a frame rate: `max(1, 1000 / fps)` milliseconds.
    #[must_use]
    pub fn cadence_for_fps(fps: u32) -> Duration {
        let millis = 1000 / u64::from(fps.max(1));
        Duration::from_millis(millis.max(1))
    }

    /// Delay the driver should wait between ticks.
    #[must_use]
    pub const fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Current time according to the scheduler's clock.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Submits an animation starting now.
    ///
    /// `duration` is floored to [`Self::MIN_DURATION`]. If this is the first
    /// active animation, the scheduler starts asking to be ticked
    /// ([`Self::wants_tick`]) until the set drains.
    pub fn submit<F>(&mut self, duration: Duration, progress: F, on_complete: Option<CompleteFn>) -> AnimationId
    where
        F: FnMut(f32) -> AnimationResult<()> + Send + 'static,
    {
        let id = AnimationId(self.next_id);
        self.next_id += 1;

        self.active.push(ActiveAnimation {
            id,
            start: self.clock.now(),
            duration: duration.max(Self::MIN_DURATION),
            progress: Box::new(progress),
            on_complete,
        });

        if !self.running {
            self.running = true;
            tracing::trace!("animation scheduler woke up");
        }
        id
    }

    /// Advances every active animation to `now`.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport::default();

        for mut anim in std::mem::take(&mut self.active) {
            let progress = anim.progress_at(now);

            if let Err(error) = (anim.progress)(progress) {
                tracing::warn!("animation {} progress callback failed: {error}", anim.id.0);
                report.failures.push(AnimationFailure {
                    id: anim.id,
                    stage: FailureStage::Progress,
                    error,
                });
                continue;
            }

            if progress < 1.0 {
                self.active.push(anim);
                continue;
            }

            if let Some(on_complete) = anim.on_complete.take() {
                if let Err(error) = on_complete() {
                    tracing::warn!("animation {} completion callback failed: {error}", anim.id.0);
                    report.failures.push(AnimationFailure {
                        id: anim.id,
                        stage: FailureStage::Completion,
                        error,
                    });
                }
            }
            report.completed.push(anim.id);
        }

        self.running = !self.active.is_empty();
        report.reschedule = self.running;
        report
    }

    /// Ticks at the clock's current time.
    pub fn advance(&mut self) -> TickReport {
        let now = self.clock.now();
        self.tick(now)
    }

    /// Ticks until idle, calling `sleep(cadence)` between ticks.
    ///
    /// Returns every failure reported along the way.
    pub fn run_until_idle<S>(&mut self, mut sleep: S) -> Vec<AnimationFailure>
    where
        S: FnMut(Duration),
    {
        let mut failures = Vec::new();
        while self.running {
            let report = self.advance();
            failures.extend(report.failures);
            if report.reschedule {
                sleep(self.cadence);
            }
        }
        failures
    }

    /// Returns true while animations are active and the driver should tick.
    #[must_use]
    pub const fn wants_tick(&self) -> bool {
        self.running
    }

    /// Number of active animations.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Returns true if no animation is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Drops every active animation without running any callback.
    ///
    /// Used when the visual elements being animated are rebuilt wholesale.
    pub fn clear(&mut self) {
        self.active.clear();
        self.running = false;
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FPS)
    }
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("active", &self.active.len())
            .field("cadence", &self.cadence)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}
