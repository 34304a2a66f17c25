//! Integration test for the animation scheduler driven the way a frontend
//! drives it: submit, then tick at the cadence until idle.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use twenty48_core::Position;
use twenty48_ui::{
    submit_pulse, AnimationError, AnimationScheduler, Easing, ManualClock, Pulse, PulseSpec,
    TileTransforms,
};

#[test]
fn test_overlapping_pulses_finish_independently() {
    let clock = Arc::new(ManualClock::new());
    let mut scheduler = AnimationScheduler::with_clock(60, clock.clone());
    let transforms = TileTransforms::shared();

    submit_pulse(&mut scheduler, &transforms, Position::new(0, 0), PulseSpec::MERGE);
    submit_pulse(&mut scheduler, &transforms, Position::new(3, 3), PulseSpec::SPAWN);
    assert!(scheduler.wants_tick());

    let mut ticks = 0;
    let mut merge_done_at = None;
    while scheduler.wants_tick() {
        let report = scheduler.advance();
        ticks += 1;
        assert!(report.failures.is_empty());
        if !report.completed.is_empty() && merge_done_at.is_none() {
            merge_done_at = Some(ticks);
            // The merge pulse is shorter; the spawn pulse is still growing.
            assert!((transforms.lock().scale(Position::new(0, 0)) - 1.0).abs() < f32::EPSILON);
            assert!(transforms.lock().scale(Position::new(3, 3)) < 1.0);
        }
        clock.advance(scheduler.cadence());
    }

    assert!(merge_done_at.is_some());
    assert!(transforms.lock().is_at_rest());
    // 200ms at a 16ms cadence.
    assert_eq!(ticks, 14);
}

#[test]
fn test_custom_callbacks_share_the_loop_with_pulses() {
    let clock = Arc::new(ManualClock::new());
    let mut scheduler = AnimationScheduler::with_clock(50, clock.clone());
    let transforms = TileTransforms::shared();
    let counter = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&counter);

    scheduler.submit(
        Duration::from_millis(100),
        move |p| {
            sink.lock().push(p);
            if p > 0.5 {
                Err(AnimationError::Callback("score label detached".into()))
            } else {
                Ok(())
            }
        },
        None,
    );
    let eased = PulseSpec {
        pulse: Pulse::Grow {
            from: 0.0,
            easing: Easing::ExponentialOut,
        },
        duration: Duration::from_millis(100),
    };
    submit_pulse(&mut scheduler, &transforms, Position::new(2, 1), eased);

    let failures = scheduler.run_until_idle(|cadence| clock.advance(cadence));

    assert_eq!(failures.len(), 1);
    // 20ms cadence: 0, 20, 40, 60 -> fails at 0.6.
    assert_eq!(counter.lock().len(), 4);
    assert!(transforms.lock().is_at_rest());
}
