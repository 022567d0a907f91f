//! Behavioural tests for time-based and speed-based transitions
//!
//! These drive the engine through its `Participant` interface with a manually
//! advanced frame clock, the same way the scheduler does.

use stagehand_animation::{
    AnimatedValue, AnimationEngine, AnimationKey, Easing, SpeedOptions, TargetId, TimeOptions,
};
use stagehand_core::{FrameClock, NumRange, Participant};

struct Harness {
    clock: FrameClock,
    engine: AnimationEngine,
}

impl Harness {
    fn new() -> Self {
        let clock = FrameClock::new();
        let engine = AnimationEngine::with_defaults(
            stagehand_animation::AnimationDefaults {
                seed: Some(42),
                ..Default::default()
            },
            clock.clone(),
        );
        Self { clock, engine }
    }

    fn tick(&mut self, dt_ms: f64) {
        let frame = self.clock.advance(dt_ms);
        self.engine.update(&frame).unwrap();
    }

    fn by_time(&self, property: &'static str, initial: f64, opts: TimeOptions) -> AnimatedValue {
        self.engine
            .by_time(AnimationKey::new(TargetId::next(), property), initial, opts)
    }

    fn by_speed(&self, property: &'static str, initial: f64, opts: SpeedOptions) -> AnimatedValue {
        self.engine
            .by_speed(AnimationKey::new(TargetId::next(), property), initial, opts)
    }
}

#[test]
fn linear_scenario_reaches_midpoint_and_end() {
    let mut h = Harness::new();
    let x = h.by_time(
        "x",
        0.0,
        TimeOptions::new().duration(100.0).easing(Easing::Linear),
    );

    x.set(10.0);
    h.tick(50.0);
    assert!((x.get() - 5.0).abs() < 1e-9);

    h.tick(50.0);
    assert_eq!(x.get(), 10.0);
    assert_eq!(x.progress(), 1.0);
}

#[test]
fn speed_scenario_halves_then_snaps_exactly() {
    let mut h = Harness::new();
    let y = h.by_speed("y", 0.0, SpeedOptions::new().speed(0.5).snap_threshold(0.01));

    y.set(10.0);
    h.tick(33.0);
    assert_eq!(y.get(), 5.0);
    h.tick(33.0);
    assert_eq!(y.get(), 7.5);

    let mut ticks = 2;
    while y.get() != 10.0 {
        h.tick(33.0);
        ticks += 1;
        assert!(ticks < 100, "speed animation never converged");
    }
    // 10 * 0.5^10 < 0.01, so the 11th tick snaps
    assert_eq!(ticks, 11);
    assert!(!y.is_animating());
}

#[test]
fn time_based_progress_is_monotonic_and_lands_exactly() {
    for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
        let mut h = Harness::new();
        let v = h.by_time("v", -3.0, TimeOptions::new().duration(250.0).easing(easing));
        v.set(17.25);

        let mut last = v.progress();
        // irregular tick spacing on purpose
        for dt in [7.0, 33.0, 1.0, 60.0, 16.0, 90.0, 45.0, 3.0] {
            h.tick(dt);
            assert!(v.progress() >= last);
            assert!((0.0..=1.0).contains(&v.progress()));
            last = v.progress();
        }
        // 255ms elapsed > 250ms duration
        assert_eq!(v.progress(), 1.0);
        assert_eq!(v.get(), 17.25, "{} overshot or fell short", easing.name());
    }
}

#[test]
fn late_tick_past_duration_lands_on_target() {
    let mut h = Harness::new();
    let v = h.by_time("v", 0.0, TimeOptions::new().duration(100.0));
    v.set(1.0);
    h.tick(10_000.0);
    assert_eq!(v.get(), 1.0);
}

#[test]
fn retarget_mid_flight_never_jumps() {
    let mut h = Harness::new();
    let v = h.by_time("v", 0.0, TimeOptions::new().duration(200.0));
    v.set(100.0);
    h.tick(60.0);

    let before = v.get();
    v.set(-50.0);
    assert_eq!(v.get(), before);
    assert_eq!(v.progress(), 0.0);

    h.tick(1.0);
    let after_one_ms = v.get();
    assert!((after_one_ms - before).abs() < 5.0);
}

#[test]
fn equal_assignment_keeps_progress_and_start_time() {
    let mut h = Harness::new();
    let key = AnimationKey::new(TargetId::next(), "v");
    let v = h
        .engine
        .by_time(key.clone(), 0.0, TimeOptions::new().duration(100.0));
    v.set(10.0);
    h.tick(30.0);

    let before = h.engine.record(&key).unwrap();
    v.set(10.0);
    let after = h.engine.record(&key).unwrap();

    assert_eq!(before.progress(), after.progress());
    match (before.mode(), after.mode()) {
        (
            stagehand_animation::AnimationMode::TimeBased(a),
            stagehand_animation::AnimationMode::TimeBased(b),
        ) => assert_eq!(a.start_time_ms, b.start_time_ms),
        _ => panic!("expected time-based records"),
    }
}

#[test]
fn speed_distance_strictly_decreases_until_snap() {
    let mut h = Harness::new();
    let v = h.by_speed("v", 3.0, SpeedOptions::new().speed(0.2).snap_threshold(0.001));
    v.set(-7.0);

    let mut distance = (v.get() - v.target()).abs();
    while distance >= 0.001 {
        h.tick(16.0);
        let next = (v.get() - v.target()).abs();
        assert!(next < distance);
        distance = next;
    }
    h.tick(16.0);
    assert_eq!(v.get(), -7.0);
}

#[test]
fn wrapped_values_stay_in_range() {
    let mut h = Harness::new();
    let range = NumRange::new(0.0, 360.0);
    let angle = h.by_time(
        "angle",
        350.0,
        TimeOptions::new()
            .duration(100.0)
            .easing(Easing::Linear)
            .wrap(range),
    );
    angle.set(370.0);

    for _ in 0..12 {
        h.tick(10.0);
        assert!(range.contains(angle.get()), "{} escaped [0, 360)", angle.get());
    }
    assert_eq!(angle.get(), 10.0);

    let phase = h.by_speed("phase", 0.5, SpeedOptions::new().speed(0.3).wrap(NumRange::new(0.0, 1.0)));
    phase.set(-0.25);
    for _ in 0..20 {
        h.tick(10.0);
        assert!((0.0..1.0).contains(&phase.get()));
    }
}

#[test]
fn delayed_start_holds_then_animates() {
    let mut h = Harness::new();
    let v = h.by_time(
        "v",
        0.0,
        TimeOptions::new().duration(100.0).delay(100.0).easing(Easing::Linear),
    );
    v.set(10.0);
    h.tick(50.0);
    assert_eq!(v.get(), 0.0);
    h.tick(100.0);
    assert_eq!(v.get(), 5.0);
}

#[test]
fn non_finite_writes_are_ignored() {
    let mut h = Harness::new();
    let key = AnimationKey::new(TargetId::next(), "v");
    let v = h.engine.by_speed(key.clone(), 0.0, SpeedOptions::new().speed(0.5));

    v.set(f64::NAN);
    h.tick(16.0);
    assert_eq!(v.get(), 0.0);
    assert!(!v.is_animating());
    assert!(!h.engine.set(&key, f64::INFINITY));

    v.set(5.0);
    for _ in 0..200 {
        h.tick(16.0);
    }
    assert_eq!(v.get(), 5.0);
    assert_eq!(v.target(), 5.0);
    assert!(!v.is_animating());

    // detached handles hold their value too
    h.engine.remove_animation(&key);
    v.set(f64::NEG_INFINITY);
    assert_eq!(v.get(), 5.0);
}
