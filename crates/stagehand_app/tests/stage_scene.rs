//! End-to-end stage tests: an application participant reacting to input and
//! driving animations, run through the headless runtime.

use stagehand_app::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Moves a marker toward wherever the pointer last went down
struct Follower {
    input: InputLatch,
    x: AnimatedValue,
    y: AnimatedValue,
    clicks: Rc<Cell<u32>>,
}

impl Participant for Follower {
    fn name(&self) -> &str {
        "follower"
    }

    fn update(&mut self, _frame: &FrameInfo) -> Result<()> {
        if let Some(p) = self.input.pointer_down_at() {
            self.x.set(p.x);
            self.y.set(p.y);
            self.clicks.set(self.clicks.get() + 1);
        }
        Ok(())
    }
}

#[test]
fn pointer_click_drives_speed_animations() {
    init_tracing();
    let mut config = StageConfig::default();
    config.surface.width = 400.0;
    config.surface.height = 300.0;
    let mut runtime = HeadlessRuntime::new(config);

    let stage = runtime.stage_mut();
    let target = TargetId::next();
    let opts = SpeedOptions::new().speed(0.5).snap_threshold(0.001);
    let x = stage.animations().by_speed(AnimationKey::new(target, "x"), 0.0, opts);
    let y = stage.animations().by_speed(AnimationKey::new(target, "y"), 0.0, opts);
    let clicks = Rc::new(Cell::new(0));
    stage.register(Follower {
        input: stage.input().clone(),
        x: x.clone(),
        y: y.clone(),
        clicks: clicks.clone(),
    });

    // one unit right and one up from the centre
    stage.input().pointer_down(Point::new(300.0, 50.0));
    runtime
        .run(HeadlessRunConfig { max_frames: 1, tick_ms: 16 }, |_, _| {})
        .unwrap();
    assert_eq!(clicks.get(), 1);
    // the follower runs after the engine, so movement starts next frame
    assert_eq!(x.get(), 0.0);
    assert_eq!(x.target(), 1.0);

    runtime
        .run(HeadlessRunConfig { max_frames: 1, tick_ms: 16 }, |_, _| {})
        .unwrap();
    assert_eq!(x.get(), 0.5);
    assert_eq!(y.get(), 0.5);

    runtime
        .run(HeadlessRunConfig { max_frames: 20, tick_ms: 16 }, |_, _| {})
        .unwrap();
    assert_eq!(x.get(), 1.0);
    assert_eq!(y.get(), 1.0);
    assert_eq!(clicks.get(), 1);
}

#[test]
fn paused_runtime_holds_animations() {
    init_tracing();
    let mut runtime = HeadlessRuntime::new(StageConfig::default());
    let radius = runtime.stage().animations().by_time(
        AnimationKey::new(TargetId::next(), "radius"),
        1.0,
        TimeOptions::new().duration(100.0).easing(Easing::Linear),
    );
    radius.set(3.0);

    runtime
        .run(HeadlessRunConfig { max_frames: 2, tick_ms: 25 }, |_, _| {})
        .unwrap();
    assert!((radius.get() - 2.0).abs() < 1e-9);

    let pause = runtime.stage().pause_handle();
    pause.pause();
    let mut paused = 0;
    runtime
        .run(HeadlessRunConfig { max_frames: 10, tick_ms: 25 }, |_, ctx| {
            if ctx.outcome == TickOutcome::Paused {
                paused += 1;
            }
        })
        .unwrap();
    assert_eq!(paused, 10);
    assert!((radius.get() - 2.0).abs() < 1e-9);

    pause.resume();
    runtime
        .run(HeadlessRunConfig { max_frames: 2, tick_ms: 25 }, |_, _| {})
        .unwrap();
    assert_eq!(radius.get(), 3.0);
    assert_eq!(runtime.stage().clock().frame_count, 4);
}

#[test]
fn scale_cancel_scenario() {
    let mut config = StageConfig::default();
    config.surface.device_pixel_ratio = 2.0;
    let mut runtime = HeadlessRuntime::new(config);
    runtime
        .run(HeadlessRunConfig::default(), |stage, _| {
            let t = stage.surface().transform();
            assert_eq!(t.scale, 1.0);
            assert_eq!(t.unit_scale, 100.0);
            assert_eq!(t.scale_cancel_ratio, 10.0);
        })
        .unwrap();
}

#[test]
fn loaded_config_shapes_the_stage() {
    let config = StageConfig::from_toml_str(
        r#"
        [scheduler]
        tick_rate = 0

        [surface]
        width = 600.0
        height = 800.0
        "#,
    )
    .unwrap();
    let runtime = HeadlessRuntime::new(config);
    let stage = runtime.stage();
    assert_eq!(stage.config().scheduler.tick_rate, 30);
    assert!(stage.surface().is_portrait());
}
