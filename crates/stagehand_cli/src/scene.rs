//! Demo scene: a marker orbiting the origin with a pulsing radius

use stagehand_animation::{
    AnimatedValue, AnimationEngine, AnimationKey, Easing, SpeedOptions, TargetId, TimeOptions,
};
use stagehand_app::{DiagnosticsLogger, Surface};
use stagehand_core::{FrameInfo, NumRange, Participant, Point, Result};
use std::cell::Cell;
use std::rc::Rc;

const ORBIT_STEP_DEG: f64 = 90.0;
const RADIUS_MIN: f64 = 1.0;
const RADIUS_MAX: f64 = 2.0;
const MARKER_SIZE: f64 = 0.1;
const LOG_EVERY_FRAMES: u64 = 10;

pub struct Orbit {
    angle: AnimatedValue,
    radius: AnimatedValue,
    surface: Surface,
    log: DiagnosticsLogger,
    laps: Rc<Cell<u32>>,
}

/// Read-only view of the scene that outlives its registration
#[derive(Clone)]
pub struct OrbitHandle {
    angle: AnimatedValue,
    radius: AnimatedValue,
    laps: Rc<Cell<u32>>,
}

impl OrbitHandle {
    pub fn angle(&self) -> f64 {
        self.angle.get()
    }

    pub fn radius(&self) -> f64 {
        self.radius.get()
    }

    pub fn laps(&self) -> u32 {
        self.laps.get()
    }
}

impl Orbit {
    pub fn new(engine: &AnimationEngine, surface: Surface, log: DiagnosticsLogger) -> Self {
        let target = TargetId::next();
        let angle = engine.by_speed(
            AnimationKey::new(target, "angle"),
            0.0,
            SpeedOptions::new()
                .speed(0.15)
                .snap_threshold(0.05)
                .wrap(NumRange::new(0.0, 360.0)),
        );
        let radius = engine.by_time(
            AnimationKey::new(target, "radius"),
            RADIUS_MIN,
            TimeOptions::new().duration(600.0).easing(Easing::EaseInOut),
        );
        Self {
            angle,
            radius,
            surface,
            log,
            laps: Rc::default(),
        }
    }

    /// Marker centre in logical units
    pub fn position(&self) -> Point {
        let theta = self.angle.get().to_radians();
        let r = self.radius.get();
        Point::new(r * theta.cos(), r * theta.sin())
    }

    pub fn handle(&self) -> OrbitHandle {
        OrbitHandle {
            angle: self.angle.clone(),
            radius: self.radius.clone(),
            laps: self.laps.clone(),
        }
    }
}

impl Participant for Orbit {
    fn name(&self) -> &str {
        "orbit"
    }

    fn update(&mut self, frame: &FrameInfo) -> Result<()> {
        if !self.angle.is_animating() {
            // Targets run up to 360 inclusive; the last quarter settles on 360,
            // which wraps to 0 and the next lap starts forward from there.
            let mut next = self.angle.target() + ORBIT_STEP_DEG;
            if next > 360.0 {
                next -= 360.0;
                self.laps.set(self.laps.get() + 1);
            }
            self.angle.set(next);
        }
        if !self.radius.is_animating() {
            let next = if self.radius.target() > RADIUS_MIN {
                RADIUS_MIN
            } else {
                RADIUS_MAX
            };
            self.radius.set(next);
        }

        let position = self.position();
        let device = self.surface.logical_to_device(position);
        self.log.log_live("angle", self.angle.get());
        self.log.log_live("radius", self.radius.get());
        self.log.log_live("position", position);
        self.log.log_value("laps", self.laps.get());

        if frame.frame % LOG_EVERY_FRAMES == 0 {
            tracing::info!(
                frame = frame.frame,
                time_ms = format_args!("{:.1}", frame.time_ms),
                angle = format_args!("{:.2}", self.angle.get()),
                radius = format_args!("{:.2}", self.radius.get()),
                marker = %position,
                device = %device,
                marker_size = format_args!("{:.3}", self.surface.fixed_size(MARKER_SIZE)),
                "orbit"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_app::{HeadlessRunConfig, HeadlessRuntime, StageConfig};

    #[test]
    fn orbit_keeps_angle_wrapped_and_completes_laps() {
        let mut runtime = HeadlessRuntime::new(StageConfig::default());
        let stage = runtime.stage_mut();
        let orbit = Orbit::new(
            stage.animations(),
            stage.surface().clone(),
            stage.diagnostics().namespace("orbit"),
        );
        let handle = orbit.handle();
        stage.register(orbit);

        runtime
            .run(HeadlessRunConfig { max_frames: 400, tick_ms: 33 }, |_, _| {
                assert!((0.0..360.0).contains(&handle.angle()));
                assert!((RADIUS_MIN..=RADIUS_MAX).contains(&handle.radius()));
            })
            .unwrap();
        assert!(handle.laps() >= 1);
    }
}
