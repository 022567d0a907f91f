//! Tests for the stagehand_app frame loop

use crate::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Records every lifecycle call into a shared log
struct Recorder {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
    fail_update_on: Option<u64>,
    fail_reset_on: Option<u64>,
    live: Option<DiagnosticsLogger>,
}

impl Recorder {
    fn new(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            name,
            log: log.clone(),
            fail_update_on: None,
            fail_reset_on: None,
            live: None,
        }
    }
}

impl Participant for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn update(&mut self, frame: &FrameInfo) -> Result<()> {
        if let Some(live) = &self.live {
            live.log_live("frame", frame.frame);
        }
        if self.fail_update_on == Some(frame.frame) {
            return Err(StageError::failed("boom"));
        }
        self.log.borrow_mut().push(format!("{}.update", self.name));
        Ok(())
    }

    fn reset(&mut self, frame: &FrameInfo) -> Result<()> {
        if self.fail_reset_on == Some(frame.frame) {
            return Err(StageError::failed("boom"));
        }
        self.log.borrow_mut().push(format!("{}.reset", self.name));
        Ok(())
    }
}

fn manual_stage(config: StageConfig) -> (Stage, ManualClock) {
    let wall = ManualClock::new(0.0);
    (Stage::with_wall_clock(config, wall.clone()), wall)
}

#[test]
fn builtins_register_in_canonical_order() {
    let (mut stage, _) = manual_stage(StageConfig::default());
    stage.register(Recorder::new("app", &Rc::default()));
    assert_eq!(
        stage.scheduler().participant_names(),
        vec!["surface", "input", "animate", "app"]
    );
}

#[test]
fn all_updates_run_before_any_reset() {
    let (mut stage, wall) = manual_stage(StageConfig::default());
    let log = Rc::new(RefCell::new(Vec::new()));
    stage.register(Recorder::new("a", &log));
    stage.register(Recorder::new("b", &log));

    wall.advance(10.0);
    stage.tick().unwrap();
    assert_eq!(*log.borrow(), vec!["a.update", "b.update", "a.reset", "b.reset"]);
}

#[test]
fn failing_participant_aborts_the_tick() {
    let (mut stage, wall) = manual_stage(StageConfig::default());
    let log = Rc::new(RefCell::new(Vec::new()));
    stage.register(Recorder {
        fail_update_on: Some(2),
        ..Recorder::new("flaky", &log)
    });
    stage.register(Recorder::new("after", &log));

    wall.advance(10.0);
    stage.tick().unwrap();
    log.borrow_mut().clear();

    wall.advance(10.0);
    let err = stage.tick().unwrap_err();
    assert_eq!(err.participant(), Some("flaky"));
    assert_eq!(
        err.to_string(),
        "participant `flaky` failed during update: boom"
    );
    // nothing after the failure ran, not even resets
    assert!(log.borrow().is_empty());
}

#[test]
fn failing_reset_aborts_remaining_resets() {
    let (mut stage, wall) = manual_stage(StageConfig::default());
    let log = Rc::new(RefCell::new(Vec::new()));
    stage.register(Recorder {
        fail_reset_on: Some(1),
        ..Recorder::new("first", &log)
    });
    stage.register(Recorder::new("after", &log));

    wall.advance(10.0);
    let err = stage.tick().unwrap_err();
    assert_eq!(err.participant(), Some("first"));
    assert_eq!(
        err.to_string(),
        "participant `first` failed during reset: boom"
    );
    // every update ran, no reset after the failing one did
    assert_eq!(*log.borrow(), vec!["first.update", "after.update"]);
}

#[test]
fn aborted_frame_lines_are_not_flushed_later() {
    let mut config = StageConfig::default();
    config.diagnostics.enabled = true;
    let (mut stage, wall) = manual_stage(config);

    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = seen.clone();
    stage
        .diagnostics()
        .attach_panel(move |text: &str| sink.borrow_mut().push(text.to_string()));

    let log = Rc::new(RefCell::new(Vec::new()));
    let live = stage.diagnostics().namespace("flaky");
    stage.register(Recorder {
        fail_update_on: Some(1),
        live: Some(live),
        ..Recorder::new("flaky", &log)
    });

    wall.advance(10.0);
    assert!(stage.tick().is_err());
    assert!(seen.borrow().is_empty());
    assert!(stage.diagnostics().live_lines().is_empty());

    wall.advance(10.0);
    stage.tick().unwrap();
    let text = seen.borrow()[0].clone();
    let lines = text.split("\n---\n").nth(1).unwrap_or_default().to_string();
    assert_eq!(lines, "flaky: frame = 2.00");
}

#[test]
fn pause_freezes_simulation_without_a_resume_spike() {
    let (mut stage, wall) = manual_stage(StageConfig::default());
    let pause = stage.pause_handle();
    let x = stage.animations().by_time(
        AnimationKey::new(TargetId::next(), "x"),
        0.0,
        TimeOptions::new().duration(100.0).easing(Easing::Linear),
    );
    x.set(10.0);

    wall.advance(20.0);
    stage.tick().unwrap();
    assert!((x.get() - 2.0).abs() < 1e-9);

    pause.pause();
    for _ in 0..5 {
        wall.advance(1_000.0);
        assert_eq!(stage.tick().unwrap(), TickOutcome::Paused);
        assert_eq!(stage.clock().delta_time, 0.0);
    }
    assert!((x.get() - 2.0).abs() < 1e-9);
    assert_eq!(stage.clock().simulated_time, 20.0);

    pause.resume();
    wall.advance(30.0);
    let frame = stage.tick().unwrap().frame().unwrap();
    assert_eq!(frame.dt_ms, 30.0);
    assert_eq!(frame.time_ms, 50.0);
    assert!((x.get() - 5.0).abs() < 1e-9);
}

#[test]
fn surface_runs_before_input_conversion() {
    let mut config = StageConfig::default();
    config.surface.width = 400.0;
    config.surface.height = 300.0;
    config.surface.device_pixel_ratio = 2.0;
    let (mut stage, wall) = manual_stage(config);

    stage.surface().set_scale(200.0);
    stage.input().pointer_down(Point::new(250.0, 150.0));
    wall.advance(16.0);
    stage.tick().unwrap();

    // 50 layout px * dpr 2 / 200 px per unit
    assert_eq!(stage.input().pointer(), Point::new(0.5, 0.0));
    assert_eq!(stage.surface().scale_cancel_ratio(), 5.0);
    assert_eq!(stage.surface().backing_size(), Some((800, 600)));
}

#[test]
fn diagnostics_flush_each_frame() {
    let mut config = StageConfig::default();
    config.diagnostics.enabled = true;
    let (mut stage, wall) = manual_stage(config);

    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = seen.clone();
    stage
        .diagnostics()
        .attach_panel(move |text: &str| sink.borrow_mut().push(text.to_string()));

    wall.advance(25.0);
    stage.tick().unwrap();

    let text = seen.borrow()[0].clone();
    assert!(text.contains("app: frame = 1.00"));
    assert!(text.contains("app: dt = 25.00"));
    assert!(text.contains("surface: scale = 100.00"));
}

#[test]
fn headless_runtime_rejects_empty_budgets() {
    let mut runtime = HeadlessRuntime::new(StageConfig::default());
    let err = runtime
        .run(HeadlessRunConfig { max_frames: 0, tick_ms: 16 }, |_, _| {})
        .unwrap_err();
    assert!(err.to_string().contains("max_frames"));

    let err = runtime
        .run(HeadlessRunConfig { max_frames: 3, tick_ms: 0 }, |_, _| {})
        .unwrap_err();
    assert!(err.to_string().contains("tick_ms"));
}

#[test]
fn headless_runtime_advances_fixed_steps() {
    let mut runtime = HeadlessRuntime::new(StageConfig::default());
    let mut seen = Vec::new();
    runtime
        .run(HeadlessRunConfig { max_frames: 4, tick_ms: 25 }, |stage, ctx| {
            seen.push((ctx.frame_index, ctx.elapsed_ms, stage.clock().simulated_time));
        })
        .unwrap();
    assert_eq!(
        seen,
        vec![(0, 25, 25.0), (1, 50, 50.0), (2, 75, 75.0), (3, 100, 100.0)]
    );
}
